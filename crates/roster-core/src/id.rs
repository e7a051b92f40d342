//! Typed ID wrappers for domain entities.
//!
//! Identifiers are surrogate keys assigned by the store on first insert.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw store-assigned key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

surrogate_id!(
    /// A strongly-typed wrapper for member IDs.
    MemberId
);

surrogate_id!(
    /// A strongly-typed wrapper for team IDs.
    TeamId
);

surrogate_id!(
    /// A strongly-typed wrapper for team membership IDs.
    TeamMemberId
);
