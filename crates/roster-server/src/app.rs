//! Application bootstrap.

use crate::di::{
    build_roster_module, DatabaseResolver, RepositoryResolver, RosterModule, ServiceResolver,
};
use roster_config::AppConfig;
use roster_core::{NewMember, NewTeam, RosterResult};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

const DEMO_TEAMS: [&str; 2] = ["teamA", "teamB"];
const DEMO_MEMBERS: [(&str, i32); 4] = [
    ("member1", 10),
    ("member2", 20),
    ("member3", 30),
    ("member4", 40),
];

/// Row counts reported after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterStats {
    pub members: u64,
    pub teams: u64,
    pub memberships: u64,
}

impl fmt::Display for RosterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} members, {} teams, {} memberships",
            self.members, self.teams, self.memberships
        )
    }
}

/// Application builder for constructing the bootstrap run.
pub struct AppBuilder {
    config: Option<AppConfig>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Connects, migrates and wires the module.
    pub async fn build(self) -> RosterResult<App> {
        let config = self.config.unwrap_or_default();
        let module = build_roster_module(&config.database, &config.cache).await?;

        if config.database.run_migrations {
            module.database_pool().run_migrations().await?;
        } else {
            debug!("Skipping migrations");
        }

        Ok(App { config, module })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A wired application ready to run its startup tasks.
pub struct App {
    config: AppConfig,
    module: Arc<RosterModule>,
}

impl App {
    /// The DI container.
    pub fn module(&self) -> &Arc<RosterModule> {
        &self.module
    }

    /// Runs the startup tasks and returns the resulting counts.
    pub async fn run(&self) -> RosterResult<RosterStats> {
        if self.config.app.seed_demo_data {
            seed_demo_data(&self.module).await?;
        }

        let stats = collect_stats(&self.module).await?;
        info!("Store contains {}", stats);
        Ok(stats)
    }

    /// Closes the database pool.
    pub async fn shutdown(self) {
        self.module.database_pool().close().await;
    }
}

/// Seeds two teams and four members when the store holds no members.
///
/// Returns `false` when data already exists and nothing was written.
pub async fn seed_demo_data(module: &RosterModule) -> RosterResult<bool> {
    if module.member_repository().count().await? > 0 {
        info!("Store already populated, skipping demo data");
        return Ok(false);
    }

    let member_service = module.member_service();
    let team_service = module.team_service();

    let mut teams = Vec::with_capacity(DEMO_TEAMS.len());
    for name in DEMO_TEAMS {
        teams.push(team_service.create_team(NewTeam::new(name)).await?);
    }

    for (i, (name, age)) in DEMO_MEMBERS.into_iter().enumerate() {
        let member = member_service.sign_up_member(NewMember::new(name, age)).await?;
        let team = &teams[i % teams.len()];
        member_service.add_team(member.id, team.id).await?;
    }

    info!(
        "Seeded {} teams and {} members",
        DEMO_TEAMS.len(),
        DEMO_MEMBERS.len()
    );
    Ok(true)
}

/// Counts the rows of every table.
pub async fn collect_stats(module: &RosterModule) -> RosterResult<RosterStats> {
    Ok(RosterStats {
        members: module.member_repository().count().await?,
        teams: module.team_repository().count().await?,
        memberships: module.team_member_repository().count().await?,
    })
}
