//! Read projections: partial views of members returned by queries that do
//! not load the whole entity.

use crate::{Member, MemberId, TeamId, TeamMemberId};
use serde::{Deserialize, Serialize};

/// Name-only projection of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberNameOnly {
    pub member_name: String,
}

/// Name and age projection of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberNameAndAge {
    pub member_name: String,
    pub age: i32,
}

impl MemberNameAndAge {
    /// Name and age joined by a space, e.g. `"USER1 10"`.
    #[must_use]
    pub fn name_and_age(&self) -> String {
        format!("{} {}", self.member_name, self.age)
    }
}

/// Name-only projection of a team, used inside nested projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNameOnly {
    pub name: String,
}

/// Member name with the names of every team it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedMemberProjection {
    pub member_name: String,
    pub teams: Vec<TeamNameOnly>,
}

/// Projection shape chosen by the caller at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberViewKind {
    NameOnly,
    NameAndAge,
    Nested,
}

/// A member projected into the shape named by a [`MemberViewKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberView {
    NameOnly(MemberNameOnly),
    NameAndAge(MemberNameAndAge),
    Nested(NestedMemberProjection),
}

impl MemberView {
    /// The kind this view was projected as.
    #[must_use]
    pub const fn kind(&self) -> MemberViewKind {
        match self {
            Self::NameOnly(_) => MemberViewKind::NameOnly,
            Self::NameAndAge(_) => MemberViewKind::NameAndAge,
            Self::Nested(_) => MemberViewKind::Nested,
        }
    }

    /// The projected member name, present in every shape.
    #[must_use]
    pub fn member_name(&self) -> &str {
        match self {
            Self::NameOnly(p) => &p.member_name,
            Self::NameAndAge(p) => &p.member_name,
            Self::Nested(p) => &p.member_name,
        }
    }
}

/// Flat member row used by team-scoped queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberQueryDto {
    pub id: MemberId,
    pub member_name: String,
    pub age: i32,
}

impl From<&Member> for MemberQueryDto {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            member_name: member.member_name.clone(),
            age: member.age,
        }
    }
}

/// Result shape of the raw-SQL paged projection.
///
/// Mapped by column name from `id`, `member_name` and `team_name`.
/// `team_name` is the member's earliest team, or `None` without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProjection {
    pub id: MemberId,
    pub member_name: String,
    pub team_name: Option<String>,
}

/// One membership as seen from the member, with the team already loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembershipView {
    pub team_member_id: TeamMemberId,
    pub team_id: TeamId,
    pub team_name: String,
}

/// A member loaded together with its teams in one join query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberWithTeams {
    pub id: MemberId,
    pub member_name: String,
    pub age: i32,
    pub teams: Vec<TeamMembershipView>,
}

impl MemberWithTeams {
    /// Returns the team names in membership order.
    #[must_use]
    pub fn team_names(&self) -> Vec<&str> {
        self.teams.iter().map(|t| t.team_name.as_str()).collect()
    }
}
