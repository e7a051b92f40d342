//! # Roster Service
//!
//! Application services for members and teams.

pub mod cache;
pub mod r#impl;
pub mod member_service;
pub mod team_service;

pub use cache::*;
pub use member_service::*;
pub use r#impl::{
    MemberServiceImpl, MemberServiceImplParameters, TeamServiceImpl, TeamServiceImplParameters,
};
pub use team_service::*;

#[cfg(test)]
pub(crate) mod fakes;
