//! Common test infrastructure for database integration tests.

#![allow(dead_code)]

use roster_config::DatabaseConfig;
use roster_repository::{
    DatabasePool, DatabasePoolInterface, SqliteMemberRepository, SqliteTeamMemberRepository,
    SqliteTeamRepository,
};
use std::sync::Arc;

/// Test database wrapper.
///
/// Each instance owns a private in-memory SQLite database with the
/// migrations applied.
pub struct TestDatabase {
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a new, empty test database.
    pub async fn new() -> Self {
        let pool = DatabasePool::new(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to open in-memory database");

        pool.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self {
            pool: Arc::new(pool),
        }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }

    pub fn members(&self) -> SqliteMemberRepository {
        SqliteMemberRepository::new(self.pool())
    }

    pub fn teams(&self) -> SqliteTeamRepository {
        SqliteTeamRepository::new(self.pool())
    }

    pub fn team_members(&self) -> SqliteTeamMemberRepository {
        SqliteTeamMemberRepository::new(self.pool())
    }
}
