//! SQLite member repository implementation.

use super::rows::{load_links, order_by, to_count, LinkSide, MemberRow};
use crate::{traits::MemberRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::Utc;
use roster_core::{
    Member, MemberId, MemberNameAndAge, MemberNameOnly, MemberProjection, MemberQueryDto,
    MemberWithTeams, NestedMemberProjection, NewMember, Page, PageRequest, RosterError,
    RosterResult, TeamId, TeamMemberId, TeamMembershipView, TeamNameOnly,
};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info};

const SORTABLE: &[&str] = &["id", "member_name", "age"];

/// SQLite member repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = MemberRepository)]
pub struct SqliteMemberRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteMemberRepository {
    /// Creates a new SQLite member repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    /// Turns rows into members and attaches their memberships.
    async fn into_members(&self, rows: Vec<MemberRow>) -> RosterResult<Vec<Member>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut links = load_links(self.pool.inner(), LinkSide::Member, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let owned = links.remove(&row.id).unwrap_or_default();
                let mut member = Member::from(row);
                for link in owned {
                    member.attach(link);
                }
                member
            })
            .collect())
    }

    async fn into_member(&self, row: Option<MemberRow>) -> RosterResult<Option<Member>> {
        match row {
            Some(row) => Ok(self.into_members(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_member_team_rows(
        &self,
        name_fragment: Option<&str>,
    ) -> RosterResult<Vec<MemberTeamRow>> {
        let rows = sqlx::query_as::<_, MemberTeamRow>(
            r#"
            SELECT m.id, m.member_name, m.age,
                   tm.id AS team_member_id, t.id AS team_id, t.name AS team_name
            FROM member m
            LEFT JOIN team_member tm ON tm.member_id = m.id
            LEFT JOIN team t ON t.id = tm.team_id
            WHERE ? IS NULL OR instr(m.member_name, ?) > 0
            ORDER BY m.id, tm.id
            "#,
        )
        .bind(name_fragment)
        .bind(name_fragment)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows)
    }
}

/// One row of a member-to-team join. The team columns are `NULL` for
/// members without a team.
#[derive(Debug, FromRow)]
struct MemberTeamRow {
    id: i64,
    member_name: String,
    age: i32,
    team_member_id: Option<i64>,
    team_id: Option<i64>,
    team_name: Option<String>,
}

impl MemberTeamRow {
    fn membership(&self) -> Option<TeamMembershipView> {
        match (self.team_member_id, self.team_id, &self.team_name) {
            (Some(link), Some(team), Some(name)) => Some(TeamMembershipView {
                team_member_id: TeamMemberId::new(link),
                team_id: TeamId::new(team),
                team_name: name.clone(),
            }),
            _ => None,
        }
    }
}

/// Folds join rows, ordered by member id, into one entry per member.
fn group_with_teams(rows: Vec<MemberTeamRow>) -> Vec<MemberWithTeams> {
    let mut members: Vec<MemberWithTeams> = Vec::new();
    for row in rows {
        let membership = row.membership();
        match members.last_mut() {
            Some(last) if last.id.into_inner() == row.id => {
                last.teams.extend(membership);
            }
            _ => members.push(MemberWithTeams {
                id: MemberId::new(row.id),
                member_name: row.member_name,
                age: row.age,
                teams: membership.into_iter().collect(),
            }),
        }
    }
    members
}

#[derive(Debug, FromRow)]
struct NameAndAgeRow {
    member_name: String,
    age: i32,
}

#[derive(Debug, FromRow)]
struct MemberQueryRow {
    id: i64,
    member_name: String,
    age: i32,
}

#[derive(Debug, FromRow)]
struct MemberProjectionRow {
    id: i64,
    member_name: String,
    team_name: Option<String>,
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn save(&self, member: &NewMember) -> RosterResult<Member> {
        debug!("Saving new member: {}", member.member_name);

        let now = Utc::now();
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            INSERT INTO member (member_name, age, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, member_name, age, created_at, updated_at
            "#,
        )
        .bind(&member.member_name)
        .bind(member.age)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.inner())
        .await?;

        info!("Member saved: {}", row.id);
        Ok(Member::from(row))
    }

    async fn save_all(&self, members: &[NewMember]) -> RosterResult<Vec<Member>> {
        debug!("Saving {} members in one transaction", members.len());

        let now = Utc::now();
        let mut tx = self.pool.inner().begin().await?;
        let mut saved = Vec::with_capacity(members.len());

        for member in members {
            let row = sqlx::query_as::<_, MemberRow>(
                r#"
                INSERT INTO member (member_name, age, created_at, updated_at)
                VALUES (?, ?, ?, ?)
                RETURNING id, member_name, age, created_at, updated_at
                "#,
            )
            .bind(&member.member_name)
            .bind(member.age)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(Member::from(row));
        }

        tx.commit().await?;
        info!("Saved {} members", saved.len());
        Ok(saved)
    }

    async fn update(&self, member: &Member) -> RosterResult<Member> {
        debug!("Updating member: {}", member.id);

        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            UPDATE member
            SET member_name = ?, age = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, member_name, age, created_at, updated_at
            "#,
        )
        .bind(&member.member_name)
        .bind(member.age)
        .bind(Utc::now())
        .bind(member.id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        self.into_member(row)
            .await?
            .ok_or_else(|| RosterError::not_found("Member", member.id))
    }

    async fn find_by_id(&self, id: MemberId) -> RosterResult<Option<Member>> {
        debug!("Finding member by id: {}", id);

        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        self.into_member(row).await
    }

    async fn find_all(&self) -> RosterResult<Vec<Member>> {
        debug!("Finding all members");

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.inner())
        .await?;

        self.into_members(rows).await
    }

    async fn find_top_100(&self) -> RosterResult<Vec<Member>> {
        debug!("Finding first 100 members");

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            ORDER BY id
            LIMIT 100
            "#,
        )
        .fetch_all(self.pool.inner())
        .await?;

        self.into_members(rows).await
    }

    async fn find_by_member_name(&self, member_name: &str) -> RosterResult<Option<Member>> {
        debug!("Finding unique member by name: {}", member_name);

        let mut members = self.find_all_by_member_name(member_name).await?;
        if members.len() > 1 {
            return Err(RosterError::NonUniqueResult(members.len()));
        }
        Ok(members.pop())
    }

    async fn find_all_by_member_name(&self, member_name: &str) -> RosterResult<Vec<Member>> {
        debug!("Finding members by name: {}", member_name);

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            WHERE member_name = ?
            ORDER BY id
            "#,
        )
        .bind(member_name)
        .fetch_all(self.pool.inner())
        .await?;

        self.into_members(rows).await
    }

    async fn find_by_member_name_starting_with(&self, prefix: &str) -> RosterResult<Vec<Member>> {
        debug!("Finding members by name prefix: {}", prefix);

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            WHERE substr(member_name, 1, length(?)) = ?
            ORDER BY id
            "#,
        )
        .bind(prefix)
        .bind(prefix)
        .fetch_all(self.pool.inner())
        .await?;

        self.into_members(rows).await
    }

    async fn find_by_member_name_containing(&self, fragment: &str) -> RosterResult<Vec<Member>> {
        debug!("Finding members by name fragment: {}", fragment);

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            WHERE instr(member_name, ?) > 0
            ORDER BY id
            "#,
        )
        .bind(fragment)
        .fetch_all(self.pool.inner())
        .await?;

        self.into_members(rows).await
    }

    async fn find_by_member_name_and_age_greater_than(
        &self,
        member_name: &str,
        age: i32,
    ) -> RosterResult<Vec<Member>> {
        debug!("Finding members by name {} older than {}", member_name, age);

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            WHERE member_name = ? AND age > ?
            ORDER BY id
            "#,
        )
        .bind(member_name)
        .bind(age)
        .fetch_all(self.pool.inner())
        .await?;

        self.into_members(rows).await
    }

    async fn find_all_by_age(&self, age: i32) -> RosterResult<Vec<Member>> {
        debug!("Finding members aged {}", age);

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            WHERE age = ?
            ORDER BY id
            "#,
        )
        .bind(age)
        .fetch_all(self.pool.inner())
        .await?;

        self.into_members(rows).await
    }

    async fn find_by_age_greater_than_equal(
        &self,
        age: i32,
        page: PageRequest,
    ) -> RosterResult<Page<Member>> {
        debug!(
            "Finding members aged {} or older, page: {}, size: {}",
            age, page.page, page.size
        );

        let order = order_by(page.sort.as_ref(), SORTABLE)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member WHERE age >= ?")
            .bind(age)
            .fetch_one(self.pool.inner())
            .await?;

        let sql = format!(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            WHERE age >= ?
            {}
            LIMIT ? OFFSET ?
            "#,
            order
        );
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(age)
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(self.pool.inner())
            .await?;

        let members = self.into_members(rows).await?;
        Ok(Page::from_request(members, &page, to_count(total)))
    }

    async fn find_all_paged(&self, page: PageRequest) -> RosterResult<Page<Member>> {
        debug!("Finding all members, page: {}, size: {}", page.page, page.size);

        let order = order_by(page.sort.as_ref(), SORTABLE)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member")
            .fetch_one(self.pool.inner())
            .await?;

        let sql = format!(
            r#"
            SELECT id, member_name, age, created_at, updated_at
            FROM member
            {}
            LIMIT ? OFFSET ?
            "#,
            order
        );
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(self.pool.inner())
            .await?;

        let members = self.into_members(rows).await?;
        Ok(Page::from_request(members, &page, to_count(total)))
    }

    async fn find_all_member_names(&self) -> RosterResult<Vec<String>> {
        debug!("Finding all member names");

        let names: Vec<String> = sqlx::query_scalar("SELECT member_name FROM member ORDER BY id")
            .fetch_all(self.pool.inner())
            .await?;

        Ok(names)
    }

    async fn find_members_by_team_id(&self, team_id: TeamId) -> RosterResult<Vec<MemberQueryDto>> {
        debug!("Finding members of team: {}", team_id);

        let rows = sqlx::query_as::<_, MemberQueryRow>(
            r#"
            SELECT DISTINCT m.id, m.member_name, m.age
            FROM member m
            JOIN team_member tm ON tm.member_id = m.id
            WHERE tm.team_id = ?
            ORDER BY m.id
            "#,
        )
        .bind(team_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MemberQueryDto {
                id: MemberId::new(row.id),
                member_name: row.member_name,
                age: row.age,
            })
            .collect())
    }

    async fn find_all_with_teams(&self) -> RosterResult<Vec<MemberWithTeams>> {
        debug!("Loading all members with their teams");

        let rows = self.find_member_team_rows(None).await?;
        Ok(group_with_teams(rows))
    }

    async fn find_with_teams_by_member_name(
        &self,
        member_name: &str,
    ) -> RosterResult<Option<MemberWithTeams>> {
        debug!("Loading member {} with teams", member_name);

        let rows = sqlx::query_as::<_, MemberTeamRow>(
            r#"
            SELECT m.id, m.member_name, m.age,
                   tm.id AS team_member_id, t.id AS team_id, t.name AS team_name
            FROM member m
            LEFT JOIN team_member tm ON tm.member_id = m.id
            LEFT JOIN team t ON t.id = tm.team_id
            WHERE m.id = (SELECT id FROM member WHERE member_name = ? ORDER BY id LIMIT 1)
            ORDER BY tm.id
            "#,
        )
        .bind(member_name)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(group_with_teams(rows).into_iter().next())
    }

    async fn find_name_only_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<MemberNameOnly>> {
        debug!("Projecting member names containing: {}", fragment);

        let names: Vec<String> = sqlx::query_scalar(
            "SELECT member_name FROM member WHERE instr(member_name, ?) > 0 ORDER BY id",
        )
        .bind(fragment)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(names
            .into_iter()
            .map(|member_name| MemberNameOnly { member_name })
            .collect())
    }

    async fn find_name_and_age_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<MemberNameAndAge>> {
        debug!("Projecting member names and ages containing: {}", fragment);

        let rows = sqlx::query_as::<_, NameAndAgeRow>(
            "SELECT member_name, age FROM member WHERE instr(member_name, ?) > 0 ORDER BY id",
        )
        .bind(fragment)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MemberNameAndAge {
                member_name: row.member_name,
                age: row.age,
            })
            .collect())
    }

    async fn find_nested_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<NestedMemberProjection>> {
        debug!("Projecting members with team names, name containing: {}", fragment);

        let rows = self.find_member_team_rows(Some(fragment)).await?;
        Ok(group_with_teams(rows)
            .into_iter()
            .map(|member| NestedMemberProjection {
                member_name: member.member_name,
                teams: member
                    .teams
                    .into_iter()
                    .map(|t| TeamNameOnly { name: t.team_name })
                    .collect(),
            })
            .collect())
    }

    async fn find_by_native_query(&self, member_name: &str) -> RosterResult<Vec<Member>> {
        debug!("Native query for member name: {}", member_name);

        let rows = sqlx::query_as::<_, MemberRow>("SELECT * FROM member WHERE member_name = ?")
            .bind(member_name)
            .fetch_all(self.pool.inner())
            .await?;

        self.into_members(rows).await
    }

    async fn find_page_by_native_projection(
        &self,
        page: PageRequest,
    ) -> RosterResult<Page<MemberProjection>> {
        debug!(
            "Native projection page: {}, size: {}",
            page.page, page.size
        );

        let order = order_by(page.sort.as_ref(), SORTABLE)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member")
            .fetch_one(self.pool.inner())
            .await?;

        let sql = format!(
            r#"
            SELECT m.id AS id,
                   m.member_name AS member_name,
                   (SELECT t.name
                    FROM team_member tm
                    JOIN team t ON t.id = tm.team_id
                    WHERE tm.member_id = m.id
                    ORDER BY tm.id
                    LIMIT 1) AS team_name
            FROM member m
            {}
            LIMIT ? OFFSET ?
            "#,
            order
        );
        let rows = sqlx::query_as::<_, MemberProjectionRow>(&sql)
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(self.pool.inner())
            .await?;

        let content = rows
            .into_iter()
            .map(|row| MemberProjection {
                id: MemberId::new(row.id),
                member_name: row.member_name,
                team_name: row.team_name,
            })
            .collect();

        Ok(Page::from_request(content, &page, to_count(total)))
    }

    async fn bulk_age_plus(&self, age: i32) -> RosterResult<u64> {
        debug!("Bulk age increment for members aged {} or older", age);

        let result = sqlx::query("UPDATE member SET age = age + 1, updated_at = ? WHERE age >= ?")
            .bind(Utc::now())
            .bind(age)
            .execute(self.pool.inner())
            .await?;

        info!("Bulk age increment changed {} members", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: MemberId) -> RosterResult<bool> {
        debug!("Deleting member: {}", id);

        let result = sqlx::query("DELETE FROM member WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> RosterResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(to_count(count))
    }
}

impl std::fmt::Debug for SqliteMemberRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteMemberRepository").finish_non_exhaustive()
    }
}
