//! SQLite team membership repository implementation.

use super::rows::{to_count, TeamMemberRow};
use crate::{traits::TeamMemberRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::Utc;
use roster_core::{MemberId, RosterResult, TeamId, TeamMember, TeamMemberId};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// SQLite team membership repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = TeamMemberRepository)]
pub struct SqliteTeamMemberRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteTeamMemberRepository {
    /// Creates a new SQLite team membership repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamMemberRepository for SqliteTeamMemberRepository {
    async fn save(&self, member_id: MemberId, team_id: TeamId) -> RosterResult<TeamMember> {
        debug!("Linking member {} to team {}", member_id, team_id);

        let row = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            INSERT INTO team_member (member_id, team_id, created_at)
            VALUES (?, ?, ?)
            RETURNING id, member_id, team_id, created_at
            "#,
        )
        .bind(member_id.into_inner())
        .bind(team_id.into_inner())
        .bind(Utc::now())
        .fetch_one(self.pool.inner())
        .await?;

        info!("Membership saved: {}", row.id);
        Ok(TeamMember::from(row))
    }

    async fn find_by_id(&self, id: TeamMemberId) -> RosterResult<Option<TeamMember>> {
        debug!("Finding membership by id: {}", id);

        let row = sqlx::query_as::<_, TeamMemberRow>(
            "SELECT id, member_id, team_id, created_at FROM team_member WHERE id = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(TeamMember::from))
    }

    async fn find_by_member_id(&self, member_id: MemberId) -> RosterResult<Vec<TeamMember>> {
        debug!("Finding memberships of member: {}", member_id);

        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT id, member_id, team_id, created_at
            FROM team_member
            WHERE member_id = ?
            ORDER BY id
            "#,
        )
        .bind(member_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(TeamMember::from).collect())
    }

    async fn find_by_team_id(&self, team_id: TeamId) -> RosterResult<Vec<TeamMember>> {
        debug!("Finding memberships of team: {}", team_id);

        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT id, member_id, team_id, created_at
            FROM team_member
            WHERE team_id = ?
            ORDER BY id
            "#,
        )
        .bind(team_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(TeamMember::from).collect())
    }

    async fn delete(&self, id: TeamMemberId) -> RosterResult<bool> {
        debug!("Deleting membership: {}", id);

        let result = sqlx::query("DELETE FROM team_member WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> RosterResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team_member")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(to_count(count))
    }
}

impl std::fmt::Debug for SqliteTeamMemberRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTeamMemberRepository").finish_non_exhaustive()
    }
}
