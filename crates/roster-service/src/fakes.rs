//! In-memory repository fakes shared by the service tests.

use async_trait::async_trait;
use chrono::Utc;
use roster_core::{
    Member, MemberId, MemberNameAndAge, MemberNameOnly, MemberProjection, MemberQueryDto,
    MemberWithTeams, NestedMemberProjection, NewMember, NewTeam, Page, PageRequest, RosterError,
    RosterResult, Team, TeamId, TeamMember, TeamMemberId, TeamMembershipView, TeamNameOnly,
};
use roster_repository::{MemberRepository, TeamMemberRepository, TeamRepository};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    members: BTreeMap<MemberId, Member>,
    teams: BTreeMap<TeamId, Team>,
    links: Vec<TeamMember>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn member(&self, member: &Member) -> Member {
        let mut member = Member {
            team_members: Vec::new(),
            ..member.clone()
        };
        for link in &self.links {
            member.attach(link.clone());
        }
        member
    }

    fn team(&self, team: &Team) -> Team {
        let mut team = Team {
            team_members: Vec::new(),
            ..team.clone()
        };
        for link in &self.links {
            team.attach(link.clone());
        }
        team
    }

    fn members_where(&self, f: impl Fn(&Member) -> bool) -> Vec<Member> {
        self.members
            .values()
            .filter(|m| f(m))
            .map(|m| self.member(m))
            .collect()
    }

    fn with_teams(&self, member: &Member) -> MemberWithTeams {
        MemberWithTeams {
            id: member.id,
            member_name: member.member_name.clone(),
            age: member.age,
            teams: self
                .links
                .iter()
                .filter(|l| l.member_id == member.id)
                .filter_map(|l| {
                    self.teams.get(&l.team_id).map(|t| TeamMembershipView {
                        team_member_id: l.id,
                        team_id: t.id,
                        team_name: t.name.clone(),
                    })
                })
                .collect(),
        }
    }
}

fn page_of<T: Clone>(items: Vec<T>, page: &PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let content = items
        .into_iter()
        .skip(page.offset())
        .take(page.limit())
        .collect();
    Page::from_request(content, page, total)
}

/// One in-memory store behind all three repository traits, so links are
/// visible from both sides like in the real schema.
#[derive(Default)]
pub(crate) struct InMemoryRoster {
    state: Mutex<State>,
    member_lookups: AtomicUsize,
}

impl InMemoryRoster {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of `MemberRepository::find_by_id` calls served.
    pub(crate) fn member_lookups(&self) -> usize {
        self.member_lookups.load(Ordering::SeqCst)
    }

    fn insert_member(state: &mut State, new: &NewMember) -> Member {
        let now = Utc::now();
        let member = Member {
            id: MemberId::new(state.next_id()),
            member_name: new.member_name.clone(),
            age: new.age,
            team_members: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.members.insert(member.id, member.clone());
        member
    }

    fn insert_team(state: &mut State, new: &NewTeam) -> Team {
        let now = Utc::now();
        let team = Team {
            id: TeamId::new(state.next_id()),
            name: new.name.clone(),
            team_members: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.teams.insert(team.id, team.clone());
        team
    }
}

#[async_trait]
impl MemberRepository for InMemoryRoster {
    async fn save(&self, member: &NewMember) -> RosterResult<Member> {
        let mut state = self.state.lock().unwrap();
        if member.age < 0 {
            return Err(RosterError::ConstraintViolation("CHECK constraint failed: age >= 0".into()));
        }
        Ok(Self::insert_member(&mut state, member))
    }

    async fn save_all(&self, members: &[NewMember]) -> RosterResult<Vec<Member>> {
        let mut state = self.state.lock().unwrap();
        if members.iter().any(|m| m.age < 0) {
            return Err(RosterError::ConstraintViolation("CHECK constraint failed: age >= 0".into()));
        }
        Ok(members.iter().map(|m| Self::insert_member(&mut state, m)).collect())
    }

    async fn update(&self, member: &Member) -> RosterResult<Member> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .members
            .get_mut(&member.id)
            .ok_or_else(|| RosterError::not_found("Member", member.id))?;
        stored.member_name = member.member_name.clone();
        stored.age = member.age;
        stored.updated_at = Utc::now();
        let stored = stored.clone();
        Ok(state.member(&stored))
    }

    async fn find_by_id(&self, id: MemberId) -> RosterResult<Option<Member>> {
        self.member_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state.members.get(&id).map(|m| state.member(m)))
    }

    async fn find_all(&self) -> RosterResult<Vec<Member>> {
        Ok(self.state.lock().unwrap().members_where(|_| true))
    }

    async fn find_top_100(&self) -> RosterResult<Vec<Member>> {
        let mut all = self.state.lock().unwrap().members_where(|_| true);
        all.truncate(100);
        Ok(all)
    }

    async fn find_by_member_name(&self, member_name: &str) -> RosterResult<Option<Member>> {
        let mut found = self.find_all_by_member_name(member_name).await?;
        if found.len() > 1 {
            return Err(RosterError::NonUniqueResult(found.len()));
        }
        Ok(found.pop())
    }

    async fn find_all_by_member_name(&self, member_name: &str) -> RosterResult<Vec<Member>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .members_where(|m| m.member_name == member_name))
    }

    async fn find_by_member_name_starting_with(&self, prefix: &str) -> RosterResult<Vec<Member>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .members_where(|m| m.member_name.starts_with(prefix)))
    }

    async fn find_by_member_name_containing(&self, fragment: &str) -> RosterResult<Vec<Member>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .members_where(|m| m.member_name.contains(fragment)))
    }

    async fn find_by_member_name_and_age_greater_than(
        &self,
        member_name: &str,
        age: i32,
    ) -> RosterResult<Vec<Member>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .members_where(|m| m.member_name == member_name && m.age > age))
    }

    async fn find_all_by_age(&self, age: i32) -> RosterResult<Vec<Member>> {
        Ok(self.state.lock().unwrap().members_where(|m| m.age == age))
    }

    async fn find_by_age_greater_than_equal(
        &self,
        age: i32,
        page: PageRequest,
    ) -> RosterResult<Page<Member>> {
        let found = self.state.lock().unwrap().members_where(|m| m.age >= age);
        Ok(page_of(found, &page))
    }

    async fn find_all_paged(&self, page: PageRequest) -> RosterResult<Page<Member>> {
        let found = self.state.lock().unwrap().members_where(|_| true);
        Ok(page_of(found, &page))
    }

    async fn find_all_member_names(&self) -> RosterResult<Vec<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .members
            .values()
            .map(|m| m.member_name.clone())
            .collect())
    }

    async fn find_members_by_team_id(&self, team_id: TeamId) -> RosterResult<Vec<MemberQueryDto>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .members_where(|m| m.is_member_of(team_id))
            .iter()
            .map(MemberQueryDto::from)
            .collect())
    }

    async fn find_all_with_teams(&self) -> RosterResult<Vec<MemberWithTeams>> {
        let state = self.state.lock().unwrap();
        Ok(state.members.values().map(|m| state.with_teams(m)).collect())
    }

    async fn find_with_teams_by_member_name(
        &self,
        member_name: &str,
    ) -> RosterResult<Option<MemberWithTeams>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .values()
            .find(|m| m.member_name == member_name)
            .map(|m| state.with_teams(m)))
    }

    async fn find_name_only_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<MemberNameOnly>> {
        let found = self.find_by_member_name_containing(fragment).await?;
        Ok(found
            .into_iter()
            .map(|m| MemberNameOnly {
                member_name: m.member_name,
            })
            .collect())
    }

    async fn find_name_and_age_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<MemberNameAndAge>> {
        let found = self.find_by_member_name_containing(fragment).await?;
        Ok(found
            .into_iter()
            .map(|m| MemberNameAndAge {
                member_name: m.member_name,
                age: m.age,
            })
            .collect())
    }

    async fn find_nested_by_member_name_containing(
        &self,
        fragment: &str,
    ) -> RosterResult<Vec<NestedMemberProjection>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .values()
            .filter(|m| m.member_name.contains(fragment))
            .map(|m| {
                let joined = state.with_teams(m);
                NestedMemberProjection {
                    member_name: joined.member_name,
                    teams: joined
                        .teams
                        .into_iter()
                        .map(|t| TeamNameOnly { name: t.team_name })
                        .collect(),
                }
            })
            .collect())
    }

    async fn find_by_native_query(&self, member_name: &str) -> RosterResult<Vec<Member>> {
        self.find_all_by_member_name(member_name).await
    }

    async fn find_page_by_native_projection(
        &self,
        page: PageRequest,
    ) -> RosterResult<Page<MemberProjection>> {
        let all = self.find_all_with_teams().await?;
        let projected = all
            .into_iter()
            .map(|m| MemberProjection {
                id: m.id,
                member_name: m.member_name,
                team_name: m.teams.into_iter().next().map(|t| t.team_name),
            })
            .collect();
        Ok(page_of(projected, &page))
    }

    async fn bulk_age_plus(&self, age: i32) -> RosterResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut changed = 0;
        for member in state.members.values_mut().filter(|m| m.age >= age) {
            member.age += 1;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(&self, id: MemberId) -> RosterResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.links.retain(|l| l.member_id != id);
        Ok(state.members.remove(&id).is_some())
    }

    async fn count(&self) -> RosterResult<u64> {
        Ok(self.state.lock().unwrap().members.len() as u64)
    }
}

#[async_trait]
impl TeamRepository for InMemoryRoster {
    async fn save(&self, team: &NewTeam) -> RosterResult<Team> {
        let mut state = self.state.lock().unwrap();
        Ok(Self::insert_team(&mut state, team))
    }

    async fn save_all(&self, teams: &[NewTeam]) -> RosterResult<Vec<Team>> {
        let mut state = self.state.lock().unwrap();
        Ok(teams.iter().map(|t| Self::insert_team(&mut state, t)).collect())
    }

    async fn update(&self, team: &Team) -> RosterResult<Team> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .teams
            .get_mut(&team.id)
            .ok_or_else(|| RosterError::not_found("Team", team.id))?;
        stored.name = team.name.clone();
        let stored = stored.clone();
        Ok(state.team(&stored))
    }

    async fn find_by_id(&self, id: TeamId) -> RosterResult<Option<Team>> {
        let state = self.state.lock().unwrap();
        Ok(state.teams.get(&id).map(|t| state.team(t)))
    }

    async fn find_all(&self) -> RosterResult<Vec<Team>> {
        let state = self.state.lock().unwrap();
        Ok(state.teams.values().map(|t| state.team(t)).collect())
    }

    async fn delete(&self, id: TeamId) -> RosterResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.links.retain(|l| l.team_id != id);
        Ok(state.teams.remove(&id).is_some())
    }

    async fn count(&self) -> RosterResult<u64> {
        Ok(self.state.lock().unwrap().teams.len() as u64)
    }
}

#[async_trait]
impl TeamMemberRepository for InMemoryRoster {
    async fn save(&self, member_id: MemberId, team_id: TeamId) -> RosterResult<TeamMember> {
        let mut state = self.state.lock().unwrap();
        if !state.members.contains_key(&member_id) || !state.teams.contains_key(&team_id) {
            return Err(RosterError::ConstraintViolation("FOREIGN KEY constraint failed".into()));
        }
        let link = TeamMember {
            id: TeamMemberId::new(state.next_id()),
            member_id,
            team_id,
            created_at: Utc::now(),
        };
        state.links.push(link.clone());
        Ok(link)
    }

    async fn find_by_id(&self, id: TeamMemberId) -> RosterResult<Option<TeamMember>> {
        let state = self.state.lock().unwrap();
        Ok(state.links.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_member_id(&self, member_id: MemberId) -> RosterResult<Vec<TeamMember>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .links
            .iter()
            .filter(|l| l.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn find_by_team_id(&self, team_id: TeamId) -> RosterResult<Vec<TeamMember>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .links
            .iter()
            .filter(|l| l.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TeamMemberId) -> RosterResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.links.len();
        state.links.retain(|l| l.id != id);
        Ok(state.links.len() < before)
    }

    async fn count(&self) -> RosterResult<u64> {
        Ok(self.state.lock().unwrap().links.len() as u64)
    }
}
