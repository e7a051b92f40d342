//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `member_service.rs`).

pub mod member_service_impl;
pub mod team_service_impl;

pub use member_service_impl::{MemberServiceImpl, MemberServiceImplParameters};
pub use team_service_impl::{TeamServiceImpl, TeamServiceImplParameters};
