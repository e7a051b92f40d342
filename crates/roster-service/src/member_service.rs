//! Member service trait definition.

use async_trait::async_trait;
use roster_core::{
    Interface, Member, MemberId, MemberSnapshot, NewMember, Page, RosterResult, TeamId, TeamMember,
};

/// Member service trait.
#[async_trait]
pub trait MemberService: Interface + Send + Sync {
    /// Validates and stores a new member.
    async fn sign_up_member(&self, member: NewMember) -> RosterResult<Member>;

    /// Gets a member by ID. Absence is not an error.
    async fn find_by_id(&self, id: MemberId) -> RosterResult<Option<Member>>;

    /// Lists members ordered by id, one page at a time.
    async fn find_all_by_paging(&self, page: usize, size: usize) -> RosterResult<Page<Member>>;

    /// Adds one year to every member aged `age_threshold` or older.
    ///
    /// Returns the number of members changed. Cached members are dropped.
    async fn member_bulk_update(&self, age_threshold: i32) -> RosterResult<u64>;

    /// Gets a detached copy of the member with this exact name.
    async fn find_read_only_by_member_name(
        &self,
        member_name: &str,
    ) -> RosterResult<Option<MemberSnapshot>>;

    /// Persists changed name and age of a member.
    async fn update_member(&self, member: &Member) -> RosterResult<Member>;

    /// Adds a member to a team from the member's side.
    async fn add_team(&self, member_id: MemberId, team_id: TeamId) -> RosterResult<TeamMember>;
}
