//! SQLite team repository implementation.

use super::rows::{load_links, to_count, LinkSide, TeamRow};
use crate::{traits::TeamRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::Utc;
use roster_core::{NewTeam, RosterError, RosterResult, Team, TeamId};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// SQLite team repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = TeamRepository)]
pub struct SqliteTeamRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteTeamRepository {
    /// Creates a new SQLite team repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn into_teams(&self, rows: Vec<TeamRow>) -> RosterResult<Vec<Team>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut links = load_links(self.pool.inner(), LinkSide::Team, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let owned = links.remove(&row.id).unwrap_or_default();
                let mut team = Team::from(row);
                for link in owned {
                    team.attach(link);
                }
                team
            })
            .collect())
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn save(&self, team: &NewTeam) -> RosterResult<Team> {
        debug!("Saving new team: {}", team.name);

        let now = Utc::now();
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO team (name, created_at, updated_at)
            VALUES (?, ?, ?)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&team.name)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.inner())
        .await?;

        info!("Team saved: {}", row.id);
        Ok(Team::from(row))
    }

    async fn save_all(&self, teams: &[NewTeam]) -> RosterResult<Vec<Team>> {
        debug!("Saving {} teams in one transaction", teams.len());

        let now = Utc::now();
        let mut tx = self.pool.inner().begin().await?;
        let mut saved = Vec::with_capacity(teams.len());

        for team in teams {
            let row = sqlx::query_as::<_, TeamRow>(
                r#"
                INSERT INTO team (name, created_at, updated_at)
                VALUES (?, ?, ?)
                RETURNING id, name, created_at, updated_at
                "#,
            )
            .bind(&team.name)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(Team::from(row));
        }

        tx.commit().await?;
        info!("Saved {} teams", saved.len());
        Ok(saved)
    }

    async fn update(&self, team: &Team) -> RosterResult<Team> {
        debug!("Updating team: {}", team.id);

        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            UPDATE team
            SET name = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&team.name)
        .bind(Utc::now())
        .bind(team.id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?
        .ok_or_else(|| RosterError::not_found("Team", team.id))?;

        let mut teams = self.into_teams(vec![row]).await?;
        teams
            .pop()
            .ok_or_else(|| RosterError::internal("Updated team vanished while loading memberships"))
    }

    async fn find_by_id(&self, id: TeamId) -> RosterResult<Option<Team>> {
        debug!("Finding team by id: {}", id);

        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM team
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        match row {
            Some(row) => Ok(self.into_teams(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> RosterResult<Vec<Team>> {
        debug!("Finding all teams");

        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM team
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.inner())
        .await?;

        self.into_teams(rows).await
    }

    async fn delete(&self, id: TeamId) -> RosterResult<bool> {
        debug!("Deleting team: {}", id);

        let result = sqlx::query("DELETE FROM team WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> RosterResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(to_count(count))
    }
}

impl std::fmt::Debug for SqliteTeamRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTeamRepository").finish_non_exhaustive()
    }
}
