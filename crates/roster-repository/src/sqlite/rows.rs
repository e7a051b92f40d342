//! Row types and helpers shared by the SQLite repositories.

use chrono::{DateTime, Utc};
use roster_core::{
    Member, MemberId, RosterError, RosterResult, Sort, Team, TeamId, TeamMember, TeamMemberId,
};
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;

/// Database row representation of a member.
#[derive(Debug, FromRow)]
pub(crate) struct MemberRow {
    pub id: i64,
    pub member_name: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member {
            id: MemberId::new(row.id),
            member_name: row.member_name,
            age: row.age,
            team_members: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row representation of a team.
#[derive(Debug, FromRow)]
pub(crate) struct TeamRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            id: TeamId::new(row.id),
            name: row.name,
            team_members: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row representation of a membership link.
#[derive(Debug, FromRow)]
pub(crate) struct TeamMemberRow {
    pub id: i64,
    pub member_id: i64,
    pub team_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        TeamMember {
            id: TeamMemberId::new(row.id),
            member_id: MemberId::new(row.member_id),
            team_id: TeamId::new(row.team_id),
            created_at: row.created_at,
        }
    }
}

/// Which side of the membership table to match on when loading links.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LinkSide {
    Member,
    Team,
}

/// Loads the membership links of many members or teams in one query,
/// grouped by owner id and ordered by link id.
pub(crate) async fn load_links(
    pool: &SqlitePool,
    side: LinkSide,
    owner_ids: &[i64],
) -> RosterResult<HashMap<i64, Vec<TeamMember>>> {
    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = match side {
        LinkSide::Member => {
            r#"
            SELECT id, member_id, team_id, created_at
            FROM team_member
            WHERE member_id IN (SELECT value FROM json_each(?))
            ORDER BY id
            "#
        }
        LinkSide::Team => {
            r#"
            SELECT id, member_id, team_id, created_at
            FROM team_member
            WHERE team_id IN (SELECT value FROM json_each(?))
            ORDER BY id
            "#
        }
    };

    let rows = sqlx::query_as::<_, TeamMemberRow>(sql)
        .bind(serde_json::to_string(owner_ids)?)
        .fetch_all(pool)
        .await?;

    let mut grouped: HashMap<i64, Vec<TeamMember>> = HashMap::new();
    for row in rows {
        let owner = match side {
            LinkSide::Member => row.member_id,
            LinkSide::Team => row.team_id,
        };
        grouped.entry(owner).or_default().push(TeamMember::from(row));
    }
    Ok(grouped)
}

/// Builds an `ORDER BY` clause from an optional sort.
///
/// Only properties in `allowed` are accepted. Ties are broken by id.
pub(crate) fn order_by(sort: Option<&Sort>, allowed: &[&str]) -> RosterResult<String> {
    let Some(sort) = sort else {
        return Ok("ORDER BY id ASC".to_string());
    };

    let property = allowed
        .iter()
        .find(|p| **p == sort.property)
        .ok_or_else(|| {
            RosterError::validation(format!("Unsupported sort property: {}", sort.property))
        })?;

    if *property == "id" {
        Ok(format!("ORDER BY id {}", sort.direction.as_sql()))
    } else {
        Ok(format!("ORDER BY {} {}, id ASC", property, sort.direction.as_sql()))
    }
}

/// Converts a stored count into `u64`.
pub(crate) fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
