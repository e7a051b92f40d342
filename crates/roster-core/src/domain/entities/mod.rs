//! Domain entities.

mod member;
mod team;
mod team_member;

pub use member::*;
pub use team::*;
pub use team_member::*;
