//! Team service trait definition.

use async_trait::async_trait;
use roster_core::{Interface, MemberId, NewTeam, RosterResult, Team, TeamId, TeamMember};

/// Team service trait.
#[async_trait]
pub trait TeamService: Interface + Send + Sync {
    /// Validates and stores a new team.
    async fn create_team(&self, team: NewTeam) -> RosterResult<Team>;

    /// Gets a team by ID. Absence is not an error.
    async fn find_by_id(&self, id: TeamId) -> RosterResult<Option<Team>>;

    /// Adds a member to a team.
    ///
    /// The team is checked before the member, so a missing team is reported
    /// even when the member is missing too.
    async fn add_member_to_team(
        &self,
        team_id: TeamId,
        member_id: MemberId,
    ) -> RosterResult<TeamMember>;
}
