//! Team membership (join) entity.

use crate::{Entity, MemberId, TeamId, TeamMemberId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One membership fact: a member belongs to a team.
///
/// Both sides are required. Duplicate (member, team) pairs are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Store-assigned identifier.
    pub id: TeamMemberId,

    /// The member side of the link.
    pub member_id: MemberId,

    /// The team side of the link.
    pub team_id: TeamId,

    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    /// Checks whether this link joins the given member and team.
    #[must_use]
    pub fn links(&self, member_id: MemberId, team_id: TeamId) -> bool {
        self.member_id == member_id && self.team_id == team_id
    }
}

impl Entity<TeamMemberId> for TeamMember {
    fn id(&self) -> &TeamMemberId {
        &self.id
    }
}
