//! SQLite repository implementations.

mod member_repository;
mod rows;
mod team_member_repository;
mod team_repository;

pub use member_repository::*;
pub use team_member_repository::*;
pub use team_repository::*;
