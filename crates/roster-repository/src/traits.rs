//! Repository trait definitions.
//!
//! Lookups return absence as `None` or an empty `Vec`. Name matching is
//! case-sensitive. Unless a method says otherwise, results are ordered by id.

use async_trait::async_trait;
use roster_core::{
    Interface, Member, MemberId, MemberNameAndAge, MemberNameOnly, MemberProjection,
    MemberQueryDto, MemberView, MemberViewKind, MemberWithTeams, NestedMemberProjection,
    NewMember, NewTeam, Page, PageRequest, RosterResult, Team, TeamId, TeamMember,
    TeamMemberId,
};

/// Member repository trait.
#[async_trait]
pub trait MemberRepository: Interface + Send + Sync {
    /// Inserts a new member and returns it with its assigned id.
    async fn save(&self, member: &NewMember) -> RosterResult<Member>;

    /// Inserts all members in one transaction. Nothing is stored if any insert fails.
    async fn save_all(&self, members: &[NewMember]) -> RosterResult<Vec<Member>>;

    /// Persists the name and age of an existing member.
    ///
    /// Fails with `NotFound` if the member no longer exists.
    async fn update(&self, member: &Member) -> RosterResult<Member>;

    /// Finds a member by ID.
    async fn find_by_id(&self, id: MemberId) -> RosterResult<Option<Member>>;

    /// Finds all members.
    async fn find_all(&self) -> RosterResult<Vec<Member>>;

    /// Finds the first 100 members.
    async fn find_top_100(&self) -> RosterResult<Vec<Member>>;

    /// Finds the single member with exactly this name.
    ///
    /// Fails with `NonUniqueResult` if several members share the name.
    async fn find_by_member_name(&self, member_name: &str) -> RosterResult<Option<Member>>;

    /// Finds every member with exactly this name.
    async fn find_all_by_member_name(&self, member_name: &str) -> RosterResult<Vec<Member>>;

    /// Finds members whose name starts with `prefix`.
    async fn find_by_member_name_starting_with(&self, prefix: &str) -> RosterResult<Vec<Member>>;

    /// Finds members whose name contains `fragment`.
    async fn find_by_member_name_containing(&self, fragment: &str) -> RosterResult<Vec<Member>>;

    /// Finds members with exactly this name and an age strictly above `age`.
    async fn find_by_member_name_and_age_greater_than(
        &self,
        member_name: &str,
        age: i32,
    ) -> RosterResult<Vec<Member>>;

    /// Finds members of exactly this age.
    async fn find_all_by_age(&self, age: i32) -> RosterResult<Vec<Member>>;

    /// Finds members aged `age` or older, one page at a time.
    ///
    /// Sortable by `id`, `member_name` and `age`.
    async fn find_by_age_greater_than_equal(
        &self,
        age: i32,
        page: PageRequest,
    ) -> RosterResult<Page<Member>>;

    /// Finds all members, one page at a time.
    async fn find_all_paged(&self, page: PageRequest) -> RosterResult<Page<Member>>;

    /// Returns every member name.
    async fn find_all_member_names(&self) -> RosterResult<Vec<String>>;

    /// Finds the members linked to a team.
    async fn find_members_by_team_id(&self, team_id: TeamId) -> RosterResult<Vec<MemberQueryDto>>;

    /// Loads every member together with its teams in one join query.
    async fn find_all_with_teams(&self) -> RosterResult<Vec<MemberWithTeams>>;

    /// Loads the first member with this exact name together with its teams.
    async fn find_with_teams_by_member_name(
        &self,
        member_name: &str,
    ) -> RosterResult<Option<MemberWithTeams>>;

    /// Name-only projection of members whose name contains `fragment`.
    async fn find_name_only_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<MemberNameOnly>>;

    /// Name and age projection of members whose name contains `fragment`.
    async fn find_name_and_age_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<MemberNameAndAge>>;

    /// Member names with nested team names, for names containing `fragment`.
    async fn find_nested_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<NestedMemberProjection>>;

    /// Projects members whose name contains `fragment` into the requested shape.
    async fn find_projected_by_member_name_containing(
        &self,
        fragment: &str,
        kind: MemberViewKind,
    ) -> RosterResult<Vec<MemberView>> {
        let views = match kind {
            MemberViewKind::NameOnly => self
                .find_name_only_by_member_name_containing(fragment)
                .await?
                .into_iter()
                .map(MemberView::NameOnly)
                .collect(),
            MemberViewKind::NameAndAge => self
                .find_name_and_age_by_member_name_containing(fragment)
                .await?
                .into_iter()
                .map(MemberView::NameAndAge)
                .collect(),
            MemberViewKind::Nested => self
                .find_nested_by_member_name_containing(fragment)
                .await?
                .into_iter()
                .map(MemberView::Nested)
                .collect(),
        };
        Ok(views)
    }

    /// Finds members by exact name with hand-written SQL.
    async fn find_by_native_query(&self, member_name: &str) -> RosterResult<Vec<Member>>;

    /// Pages over members with their first team name, using hand-written SQL.
    async fn find_page_by_native_projection(
        &self,
        page: PageRequest,
    ) -> RosterResult<Page<MemberProjection>>;

    /// Adds one year to every member aged `age` or older in a single statement.
    ///
    /// Returns the number of rows changed.
    async fn bulk_age_plus(&self, age: i32) -> RosterResult<u64>;

    /// Deletes a member and its memberships.
    async fn delete(&self, id: MemberId) -> RosterResult<bool>;

    /// Counts all members.
    async fn count(&self) -> RosterResult<u64>;
}

/// Team repository trait.
#[async_trait]
pub trait TeamRepository: Interface + Send + Sync {
    /// Inserts a new team.
    async fn save(&self, team: &NewTeam) -> RosterResult<Team>;

    /// Inserts all teams in one transaction.
    async fn save_all(&self, teams: &[NewTeam]) -> RosterResult<Vec<Team>>;

    /// Persists the name of an existing team.
    async fn update(&self, team: &Team) -> RosterResult<Team>;

    /// Finds a team by ID.
    async fn find_by_id(&self, id: TeamId) -> RosterResult<Option<Team>>;

    /// Finds all teams.
    async fn find_all(&self) -> RosterResult<Vec<Team>>;

    /// Deletes a team and its memberships.
    async fn delete(&self, id: TeamId) -> RosterResult<bool>;

    /// Counts all teams.
    async fn count(&self) -> RosterResult<u64>;
}

/// Team membership repository trait.
#[async_trait]
pub trait TeamMemberRepository: Interface + Send + Sync {
    /// Links a member to a team.
    ///
    /// Fails with `ConstraintViolation` if either side does not exist.
    async fn save(&self, member_id: MemberId, team_id: TeamId) -> RosterResult<TeamMember>;

    /// Finds a membership by ID.
    async fn find_by_id(&self, id: TeamMemberId) -> RosterResult<Option<TeamMember>>;

    /// Finds the memberships of a member.
    async fn find_by_member_id(&self, member_id: MemberId) -> RosterResult<Vec<TeamMember>>;

    /// Finds the memberships of a team.
    async fn find_by_team_id(&self, team_id: TeamId) -> RosterResult<Vec<TeamMember>>;

    /// Deletes a membership.
    async fn delete(&self, id: TeamMemberId) -> RosterResult<bool>;

    /// Counts all memberships.
    async fn count(&self) -> RosterResult<u64>;
}
