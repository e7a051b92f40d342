//! # Roster Core
//!
//! Core types, traits, and error definitions for Roster.
//! This crate provides the entities, projections, typed identifiers and
//! paging primitives shared by the repository and service layers.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
