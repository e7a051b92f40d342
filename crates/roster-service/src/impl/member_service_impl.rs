//! Member service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface, DEFAULT_TTL};
use crate::member_service::MemberService;
use async_trait::async_trait;
use roster_core::{
    Member, MemberId, MemberSnapshot, NewMember, Page, PageRequest, RosterError, RosterResult,
    Sort, TeamId, TeamMember, ValidateExt,
};
use roster_repository::{MemberRepository, TeamMemberRepository, TeamRepository};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Member service component for Shaku DI.
///
/// Lookups by id go through the cache. Writes that change a member evict it.
#[derive(Component)]
#[shaku(interface = MemberService)]
pub struct MemberServiceImpl {
    #[shaku(inject)]
    member_repository: Arc<dyn MemberRepository>,
    #[shaku(inject)]
    team_repository: Arc<dyn TeamRepository>,
    #[shaku(inject)]
    team_member_repository: Arc<dyn TeamMemberRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(default = DEFAULT_TTL)]
    cache_ttl: Duration,
}

impl MemberServiceImpl {
    /// Creates a new member service.
    pub fn new(
        member_repository: Arc<dyn MemberRepository>,
        team_repository: Arc<dyn TeamRepository>,
        team_member_repository: Arc<dyn TeamMemberRepository>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            member_repository,
            team_repository,
            team_member_repository,
            cache,
            cache_ttl: DEFAULT_TTL,
        }
    }

    /// Sets how long looked-up members stay cached.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    async fn evict(&self, id: MemberId) {
        if let Err(e) = self.cache.delete(&cache_keys::member_by_id(id)).await {
            warn!("Failed to evict cached member {}: {}", id, e);
        }
    }
}

#[async_trait]
impl MemberService for MemberServiceImpl {
    async fn sign_up_member(&self, member: NewMember) -> RosterResult<Member> {
        debug!("Signing up member: {}", member.member_name);

        member.validate_request()?;

        let saved = self.member_repository.save(&member).await?;

        info!("Member signed up: {}", saved.id);
        Ok(saved)
    }

    async fn find_by_id(&self, id: MemberId) -> RosterResult<Option<Member>> {
        debug!("Finding member: {}", id);

        let cache_key = cache_keys::member_by_id(id);

        if let Some(cached) = self.cache.get::<Member>(&cache_key).await? {
            debug!("Cache hit for member: {}", id);
            return Ok(Some(cached));
        }

        let member = self.member_repository.find_by_id(id).await?;

        if let Some(member) = &member {
            let _ = self.cache.set(&cache_key, member, self.cache_ttl).await;
        }

        Ok(member)
    }

    async fn find_all_by_paging(&self, page: usize, size: usize) -> RosterResult<Page<Member>> {
        debug!("Listing members, page: {}, size: {}", page, size);

        let request = PageRequest::new(page, size).with_sort(Sort::asc("id"));
        self.member_repository.find_all_paged(request).await
    }

    async fn member_bulk_update(&self, age_threshold: i32) -> RosterResult<u64> {
        debug!("Bulk age update for members aged {} or older", age_threshold);

        let changed = self.member_repository.bulk_age_plus(age_threshold).await?;

        // The update skipped the cache, so every cached member may be stale
        let evicted = self
            .cache
            .delete_pattern(&cache_keys::member_pattern())
            .await
            .map_err(|e| RosterError::Cache(format!("Failed to invalidate members: {}", e)))?;

        info!(
            "Bulk age update changed {} members, evicted {} cache entries",
            changed, evicted
        );
        Ok(changed)
    }

    async fn find_read_only_by_member_name(
        &self,
        member_name: &str,
    ) -> RosterResult<Option<MemberSnapshot>> {
        debug!("Finding read-only member by name: {}", member_name);

        let member = self.member_repository.find_by_member_name(member_name).await?;
        Ok(member.as_ref().map(Member::snapshot))
    }

    async fn update_member(&self, member: &Member) -> RosterResult<Member> {
        debug!("Updating member: {}", member.id);

        let updated = self.member_repository.update(member).await?;
        self.evict(member.id).await;

        info!("Member updated: {}", member.id);
        Ok(updated)
    }

    async fn add_team(&self, member_id: MemberId, team_id: TeamId) -> RosterResult<TeamMember> {
        debug!("Adding team {} to member {}", team_id, member_id);

        self.member_repository
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| RosterError::not_found("Member", member_id))?;

        self.team_repository
            .find_by_id(team_id)
            .await?
            .ok_or_else(|| RosterError::not_found("Team", team_id))?;

        let link = self.team_member_repository.save(member_id, team_id).await?;
        self.evict(member_id).await;

        info!("Member {} joined team {}", member_id, team_id);
        Ok(link)
    }
}

impl std::fmt::Debug for MemberServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberServiceImpl").finish_non_exhaustive()
    }
}
