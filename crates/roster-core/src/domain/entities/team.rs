//! Team entity.

use super::TeamMember;
use crate::validation::rules::printable_name;
use crate::{Entity, MemberId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A team that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewTeam {
    /// Team name. Not unique.
    #[validate(length(min = 1, max = 64), custom(function = "printable_name"))]
    pub name: String,
}

impl NewTeam {
    /// Creates a new unsaved team.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A persisted team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Store-assigned identifier.
    pub id: TeamId,

    /// Team name.
    pub name: String,

    /// Memberships of this team, ordered by link id.
    #[serde(default)]
    pub team_members: Vec<TeamMember>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Renames the team.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Records a membership link on this side of the association.
    ///
    /// Links that belong to another team are ignored.
    pub fn attach(&mut self, link: TeamMember) {
        if link.team_id == self.id && !self.team_members.iter().any(|tm| tm.id == link.id) {
            self.team_members.push(link);
        }
    }

    /// Returns the ids of the members of this team.
    #[must_use]
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.team_members.iter().map(|tm| tm.member_id).collect()
    }
}

impl Entity<TeamId> for Team {
    fn id(&self) -> &TeamId {
        &self.id
    }
}
