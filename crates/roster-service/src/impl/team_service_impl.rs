//! Team service implementation.

use crate::cache::{cache_keys, CacheInterface};
use crate::team_service::TeamService;
use async_trait::async_trait;
use roster_core::{
    MemberId, NewTeam, RosterError, RosterResult, Team, TeamId, TeamMember, ValidateExt,
};
use roster_repository::{MemberRepository, TeamMemberRepository, TeamRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Team service component for Shaku DI.
///
/// Adding a member evicts that member's cached entry.
#[derive(Component)]
#[shaku(interface = TeamService)]
pub struct TeamServiceImpl {
    #[shaku(inject)]
    team_repository: Arc<dyn TeamRepository>,
    #[shaku(inject)]
    member_repository: Arc<dyn MemberRepository>,
    #[shaku(inject)]
    team_member_repository: Arc<dyn TeamMemberRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl TeamServiceImpl {
    /// Creates a new team service.
    pub fn new(
        team_repository: Arc<dyn TeamRepository>,
        member_repository: Arc<dyn MemberRepository>,
        team_member_repository: Arc<dyn TeamMemberRepository>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            team_repository,
            member_repository,
            team_member_repository,
            cache,
        }
    }
}

#[async_trait]
impl TeamService for TeamServiceImpl {
    async fn create_team(&self, team: NewTeam) -> RosterResult<Team> {
        debug!("Creating team: {}", team.name);

        team.validate_request()?;

        let saved = self.team_repository.save(&team).await?;

        info!("Team created: {}", saved.id);
        Ok(saved)
    }

    async fn find_by_id(&self, id: TeamId) -> RosterResult<Option<Team>> {
        debug!("Finding team: {}", id);
        self.team_repository.find_by_id(id).await
    }

    async fn add_member_to_team(
        &self,
        team_id: TeamId,
        member_id: MemberId,
    ) -> RosterResult<TeamMember> {
        debug!("Adding member {} to team {}", member_id, team_id);

        self.team_repository
            .find_by_id(team_id)
            .await?
            .ok_or_else(|| RosterError::not_found("Team", team_id))?;

        self.member_repository
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| RosterError::not_found("Member", member_id))?;

        let link = self.team_member_repository.save(member_id, team_id).await?;

        if let Err(e) = self.cache.delete(&cache_keys::member_by_id(member_id)).await {
            warn!("Failed to evict cached member {}: {}", member_id, e);
        }

        info!("Member {} added to team {}", member_id, team_id);
        Ok(link)
    }
}

impl std::fmt::Debug for TeamServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamServiceImpl").finish_non_exhaustive()
    }
}
