//! # Roster Repository
//!
//! Data access for members, teams and their memberships.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn MemberRepository>   (domain interface)
//! SqliteMemberRepository           (hand-written SQL over SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! SQLite
//! ```
//!
//! Every write is an explicit call. Loaded members and teams carry their
//! membership links, read from the same `team_member` rows on both sides.

pub mod pool;
pub mod sqlite;
pub mod traits;

pub use pool::*;
pub use sqlite::*;
pub use traits::*;
