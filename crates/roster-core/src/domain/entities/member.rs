//! Member entity.

use super::TeamMember;
use crate::validation::rules::printable_name;
use crate::{Entity, MemberId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A member that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewMember {
    /// Display name. Not unique.
    #[validate(length(min = 1, max = 64), custom(function = "printable_name"))]
    pub member_name: String,

    /// Age in years.
    #[validate(range(min = 0, max = 200))]
    pub age: i32,
}

impl NewMember {
    /// Creates a new unsaved member.
    #[must_use]
    pub fn new(member_name: impl Into<String>, age: i32) -> Self {
        Self {
            member_name: member_name.into(),
            age,
        }
    }
}

/// A persisted member.
///
/// Field changes stay in memory until passed to an explicit update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Store-assigned identifier.
    pub id: MemberId,

    /// Display name.
    pub member_name: String,

    /// Age in years.
    pub age: i32,

    /// Team memberships owned by this member, ordered by link id.
    #[serde(default)]
    pub team_members: Vec<TeamMember>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Renames the member.
    pub fn change_name(&mut self, member_name: impl Into<String>) {
        self.member_name = member_name.into();
        self.updated_at = Utc::now();
    }

    /// Changes the member's age.
    pub fn change_age(&mut self, age: i32) {
        self.age = age;
        self.updated_at = Utc::now();
    }

    /// Records a membership link on this side of the association.
    ///
    /// Links that belong to another member are ignored.
    pub fn attach(&mut self, link: TeamMember) {
        if link.member_id == self.id && !self.team_members.iter().any(|tm| tm.id == link.id) {
            self.team_members.push(link);
        }
    }

    /// Returns the ids of the teams this member belongs to.
    #[must_use]
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.team_members.iter().map(|tm| tm.team_id).collect()
    }

    /// Checks whether this member is linked to the given team.
    #[must_use]
    pub fn is_member_of(&self, team_id: TeamId) -> bool {
        self.team_members.iter().any(|tm| tm.team_id == team_id)
    }

    /// Takes a detached, read-only copy of this member.
    #[must_use]
    pub fn snapshot(&self) -> MemberSnapshot {
        MemberSnapshot {
            id: self.id,
            member_name: self.member_name.clone(),
            age: self.age,
            team_members: self.team_members.clone(),
        }
    }
}

impl Entity<MemberId> for Member {
    fn id(&self) -> &MemberId {
        &self.id
    }
}

/// A detached copy of a member.
///
/// Setters only change this copy. There is no conversion back into
/// [`Member`], so nothing here can reach a repository write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSnapshot {
    id: MemberId,
    member_name: String,
    age: i32,
    team_members: Vec<TeamMember>,
}

impl MemberSnapshot {
    /// Returns the id of the member this snapshot was taken from.
    #[must_use]
    pub const fn id(&self) -> MemberId {
        self.id
    }

    /// Returns the member name.
    #[must_use]
    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    /// Returns the age.
    #[must_use]
    pub const fn age(&self) -> i32 {
        self.age
    }

    /// Returns the memberships as they were when the snapshot was taken.
    #[must_use]
    pub fn team_members(&self) -> &[TeamMember] {
        &self.team_members
    }

    /// Changes the name on this copy only.
    pub fn set_member_name(&mut self, member_name: impl Into<String>) {
        self.member_name = member_name.into();
    }

    /// Changes the age on this copy only.
    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }
}
