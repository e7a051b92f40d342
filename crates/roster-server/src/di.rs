//! Dependency injection module using Shaku.
//!
//! `RosterModule` wires the SQLite pool, the three repositories, the
//! in-process cache and both services into a single container.

use roster_config::{CacheConfig, DatabaseConfig};
use roster_core::{module, HasComponent, RosterResult};
use roster_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MemberRepository,
    SqliteMemberRepository, SqliteTeamMemberRepository, SqliteTeamRepository,
    TeamMemberRepository, TeamRepository,
};
use roster_service::{
    CacheInterface, MemberService, MemberServiceImpl, MemberServiceImplParameters,
    MemoryCacheService, MemoryCacheServiceParameters, TeamService, TeamServiceImpl,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Shaku Module Definitions
// ============================================================================

// Single-process module backed by SQLite:
// - Database pool and repositories
// - In-process member cache
// - Member and team services
module! {
    pub RosterModule {
        components = [
            DatabasePool,
            SqliteMemberRepository,
            SqliteTeamRepository,
            SqliteTeamMemberRepository,
            MemoryCacheService,
            MemberServiceImpl,
            TeamServiceImpl,
        ],
        providers = [],
    }
}

// ============================================================================
// Module Builders
// ============================================================================

/// Connects to the configured database and builds the module around it.
pub async fn build_roster_module(
    db_config: &DatabaseConfig,
    cache_config: &CacheConfig,
) -> RosterResult<Arc<RosterModule>> {
    let db_pool = DatabasePool::new(db_config).await?;
    Ok(build_module_with_pool(&db_pool, cache_config))
}

/// Builds the module around an already connected pool.
pub fn build_module_with_pool(
    db_pool: &DatabasePool,
    cache_config: &CacheConfig,
) -> Arc<RosterModule> {
    let module = RosterModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<MemoryCacheService>(MemoryCacheServiceParameters {
            entries: RwLock::new(HashMap::new()),
            enabled: cache_config.enabled,
        })
        .with_component_parameters::<MemberServiceImpl>(MemberServiceImplParameters {
            cache_ttl: cache_config.ttl(),
        })
        .build();

    Arc::new(module)
}

// ============================================================================
// Module Resolution Helpers
// ============================================================================

/// Trait for resolving the application services.
pub trait ServiceResolver {
    /// Resolves the member service from the module.
    fn member_service(&self) -> Arc<dyn MemberService>;

    /// Resolves the team service from the module.
    fn team_service(&self) -> Arc<dyn TeamService>;
}

impl ServiceResolver for RosterModule {
    fn member_service(&self) -> Arc<dyn MemberService> {
        self.resolve()
    }

    fn team_service(&self) -> Arc<dyn TeamService> {
        self.resolve()
    }
}

/// Trait for resolving the database pool.
pub trait DatabaseResolver {
    /// Resolves the database pool from the module.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl DatabaseResolver for RosterModule {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

/// Trait for resolving repositories.
pub trait RepositoryResolver {
    /// Resolves the member repository.
    fn member_repository(&self) -> Arc<dyn MemberRepository>;

    /// Resolves the team repository.
    fn team_repository(&self) -> Arc<dyn TeamRepository>;

    /// Resolves the membership repository.
    fn team_member_repository(&self) -> Arc<dyn TeamMemberRepository>;
}

impl RepositoryResolver for RosterModule {
    fn member_repository(&self) -> Arc<dyn MemberRepository> {
        self.resolve()
    }

    fn team_repository(&self) -> Arc<dyn TeamRepository> {
        self.resolve()
    }

    fn team_member_repository(&self) -> Arc<dyn TeamMemberRepository> {
        self.resolve()
    }
}

/// Trait for resolving cache components.
pub trait CacheResolver {
    /// Resolves the cache interface from the module.
    fn cache(&self) -> Arc<dyn CacheInterface>;
}

impl CacheResolver for RosterModule {
    fn cache(&self) -> Arc<dyn CacheInterface> {
        self.resolve()
    }
}
