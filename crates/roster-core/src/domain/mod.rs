//! # Roster Domain
//!
//! Entities and read projections of the membership domain.

pub mod entities;
pub mod projections;

pub use entities::*;
pub use projections::*;
