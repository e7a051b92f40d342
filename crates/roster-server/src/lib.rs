//! # Roster Server Library
//!
//! Dependency injection wiring and bootstrap tasks for the Roster binary.

pub mod app;
pub mod di;
