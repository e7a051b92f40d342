//! Integration tests for SqliteMemberRepository.
//!
//! These tests run against a private in-memory SQLite database.

mod common;

use common::TestDatabase;
use roster_core::{
    MemberId, MemberView, MemberViewKind, NewMember, NewTeam, PageRequest, RosterError, Sort,
};
use roster_repository::{MemberRepository, TeamMemberRepository, TeamRepository};

fn names(members: &[roster_core::Member]) -> Vec<&str> {
    members.iter().map(|m| m.member_name.as_str()).collect()
}

#[tokio::test]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let saved = repo
        .save(&NewMember::new("memberA", 10))
        .await
        .expect("Failed to save member");

    let found = repo
        .find_by_id(saved.id)
        .await
        .expect("Query failed")
        .expect("Member not found");

    assert_eq!(found, saved);
    assert!(found.team_members.is_empty());
}

#[tokio::test]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let result = repo.find_by_id(MemberId::new(999)).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_persists_name_and_age() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let mut member = repo.save(&NewMember::new("member1", 10)).await.unwrap();
    member.change_name("member2");
    member.change_age(11);

    let updated = repo.update(&member).await.unwrap();
    assert_eq!(updated.member_name, "member2");

    let found = repo.find_by_id(member.id).await.unwrap().unwrap();
    assert_eq!(found.member_name, "member2");
    assert_eq!(found.age, 11);
}

#[tokio::test]
async fn test_update_missing_member_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let mut member = repo.save(&NewMember::new("member1", 10)).await.unwrap();
    assert!(repo.delete(member.id).await.unwrap());

    member.change_age(20);
    let err = repo.update(&member).await.unwrap_err();
    assert!(err.is_not_found_for("Member"));
}

#[tokio::test]
async fn test_in_memory_change_is_not_persisted_without_update() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let mut member = repo.save(&NewMember::new("member1", 10)).await.unwrap();
    member.change_name("changed");

    let found = repo.find_by_id(member.id).await.unwrap().unwrap();
    assert_eq!(found.member_name, "member1");
}

#[tokio::test]
async fn test_prefix_and_substring_lookups() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    repo.save_all(&[
        NewMember::new("USER1", 10),
        NewMember::new("USER2", 20),
        NewMember::new("USER123", 30),
    ])
    .await
    .unwrap();

    let starting = repo.find_by_member_name_starting_with("USER1").await.unwrap();
    assert_eq!(names(&starting), vec!["USER1", "USER123"]);

    let containing = repo.find_by_member_name_containing("USER1").await.unwrap();
    assert_eq!(names(&containing), vec!["USER1", "USER123"]);

    let exact = repo.find_all_by_member_name("USER1").await.unwrap();
    assert_eq!(exact.len(), 1);

    let unique = repo.find_by_member_name("USER1").await.unwrap();
    assert_eq!(unique.unwrap().age, 10);
}

#[tokio::test]
async fn test_name_matching_is_case_sensitive() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    repo.save(&NewMember::new("USER1", 10)).await.unwrap();

    assert!(repo.find_by_member_name("user1").await.unwrap().is_none());
    assert!(repo.find_by_member_name_containing("ser").await.unwrap().is_empty());
    assert!(repo
        .find_by_member_name_starting_with("user")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_find_by_member_name_with_duplicates_is_non_unique() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    repo.save(&NewMember::new("AAA", 10)).await.unwrap();
    repo.save(&NewMember::new("AAA", 20)).await.unwrap();

    let err = repo.find_by_member_name("AAA").await.unwrap_err();
    assert!(matches!(err, RosterError::NonUniqueResult(2)));

    let all = repo.find_all_by_member_name("AAA").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_find_by_member_name_and_age_greater_than() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    repo.save(&NewMember::new("AAA", 10)).await.unwrap();
    repo.save(&NewMember::new("AAA", 20)).await.unwrap();

    let result = repo
        .find_by_member_name_and_age_greater_than("AAA", 15)
        .await
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].age, 20);

    let none = repo
        .find_by_member_name_and_age_greater_than("AAA", 20)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_find_all_by_age_and_top_100() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let batch: Vec<NewMember> = (0..105)
        .map(|i| NewMember::new(format!("member{}", i), i % 2))
        .collect();
    repo.save_all(&batch).await.unwrap();

    let top = repo.find_top_100().await.unwrap();
    assert_eq!(top.len(), 100);
    assert_eq!(top[0].member_name, "member0");
    assert!(top.windows(2).all(|w| w[0].id < w[1].id));

    let odd = repo.find_all_by_age(1).await.unwrap();
    assert_eq!(odd.len(), 52);
    assert_eq!(repo.count().await.unwrap(), 105);
}

#[tokio::test]
async fn test_paging_last_page_of_thirty_one() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let batch: Vec<NewMember> = (1..=31)
        .map(|i| NewMember::new(format!("member{}", i), 10))
        .collect();
    repo.save_all(&batch).await.unwrap();

    let page = repo.find_all_paged(PageRequest::new(3, 10)).await.unwrap();
    assert_eq!(page.total_elements(), 31);
    assert_eq!(page.total_pages(), 4);
    assert_eq!(page.size(), 10);
    assert_eq!(page.number(), 3);
    assert!(!page.is_first());
    assert!(page.is_last());
    assert!(!page.has_next());
    assert_eq!(page.len(), 1);
    assert_eq!(page.content[0].member_name, "member31");
}

#[tokio::test]
async fn test_paging_by_age_with_sort() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    repo.save_all(&[
        NewMember::new("member1", 10),
        NewMember::new("member2", 10),
        NewMember::new("member3", 10),
        NewMember::new("member4", 10),
        NewMember::new("member5", 9),
    ])
    .await
    .unwrap();

    let request = PageRequest::new(0, 3).with_sort(Sort::desc("member_name"));
    let page = repo.find_by_age_greater_than_equal(10, request).await.unwrap();

    assert_eq!(page.total_elements(), 4);
    assert_eq!(page.total_pages(), 2);
    assert!(page.is_first());
    assert!(page.has_next());
    assert_eq!(names(&page.content), vec!["member4", "member3", "member2"]);
}

#[tokio::test]
async fn test_paging_rejects_unknown_sort_property() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let request = PageRequest::new(0, 3).with_sort(Sort::asc("created_at"));
    let err = repo.find_all_paged(request).await.unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let db = TestDatabase::new().await;
    let repo = db.members();
    repo.save_all(&[NewMember::new("member1", 10), NewMember::new("member2", 20)])
        .await
        .unwrap();

    let page = repo
        .find_all_paged(PageRequest::new(usize::MAX / 2, 10))
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_elements(), 2);
    assert!(page.is_last());

    let projected = repo
        .find_page_by_native_projection(PageRequest::new(usize::MAX, 10))
        .await
        .unwrap();
    assert!(projected.is_empty());
}

#[tokio::test]
async fn test_empty_page_is_first_and_last() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let page = repo.find_all_paged(PageRequest::new(0, 10)).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_pages(), 0);
    assert!(page.is_first());
    assert!(page.is_last());
}

#[tokio::test]
async fn test_bulk_age_plus() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    repo.save_all(&[
        NewMember::new("member1", 10),
        NewMember::new("member2", 19),
        NewMember::new("member3", 20),
        NewMember::new("member4", 21),
        NewMember::new("member5", 40),
    ])
    .await
    .unwrap();

    let changed = repo.bulk_age_plus(20).await.unwrap();
    assert_eq!(changed, 3);

    let ages: Vec<i32> = repo.find_all().await.unwrap().iter().map(|m| m.age).collect();
    assert_eq!(ages, vec![10, 19, 21, 22, 41]);
}

#[tokio::test]
async fn test_bulk_age_plus_thirty_one_members() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let batch: Vec<NewMember> = (1..=31)
        .map(|i| NewMember::new(format!("member{}", i), 10))
        .collect();
    repo.save_all(&batch).await.unwrap();

    assert_eq!(repo.bulk_age_plus(10).await.unwrap(), 31);
    assert_eq!(repo.find_all_by_age(11).await.unwrap().len(), 31);
}

#[tokio::test]
async fn test_save_all_rolls_back_on_failure() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    let err = repo
        .save_all(&[
            NewMember::new("member1", 10),
            NewMember::new("member2", -1),
            NewMember::new("member3", 30),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, RosterError::ConstraintViolation(_)));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_all_member_names() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    repo.save(&NewMember::new("AAA", 10)).await.unwrap();
    repo.save(&NewMember::new("BBB", 20)).await.unwrap();

    assert_eq!(repo.find_all_member_names().await.unwrap(), vec!["AAA", "BBB"]);
}

#[tokio::test]
async fn test_members_carry_memberships_and_fetch_join() {
    let db = TestDatabase::new().await;
    let members = db.members();
    let teams = db.teams();
    let links = db.team_members();

    let team_a = teams.save(&NewTeam::new("teamA")).await.unwrap();
    let team_b = teams.save(&NewTeam::new("teamB")).await.unwrap();
    let member1 = members.save(&NewMember::new("member1", 10)).await.unwrap();
    let member2 = members.save(&NewMember::new("member2", 20)).await.unwrap();

    links.save(member1.id, team_a.id).await.unwrap();
    links.save(member1.id, team_b.id).await.unwrap();

    let loaded = members.find_by_id(member1.id).await.unwrap().unwrap();
    assert_eq!(loaded.team_ids(), vec![team_a.id, team_b.id]);

    let joined = members.find_all_with_teams().await.unwrap();
    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].team_names(), vec!["teamA", "teamB"]);
    assert!(joined[1].teams.is_empty());
    assert_eq!(joined[1].id, member2.id);

    let one = members
        .find_with_teams_by_member_name("member1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(one.teams.len(), 2);
    assert!(members
        .find_with_teams_by_member_name("nobody")
        .await
        .unwrap()
        .is_none());

    let in_team_a = members.find_members_by_team_id(team_a.id).await.unwrap();
    assert_eq!(in_team_a.len(), 1);
    assert_eq!(in_team_a[0].member_name, "member1");
}

#[tokio::test]
async fn test_projections() {
    let db = TestDatabase::new().await;
    let members = db.members();
    let teams = db.teams();
    let links = db.team_members();

    let team = teams.save(&NewTeam::new("teamA")).await.unwrap();
    let m1 = members.save(&NewMember::new("m1", 0)).await.unwrap();
    members.save(&NewMember::new("m2", 0)).await.unwrap();
    members.save(&NewMember::new("other", 0)).await.unwrap();
    links.save(m1.id, team.id).await.unwrap();

    let name_only = members.find_name_only_by_member_name_containing("m").await.unwrap();
    let found: Vec<&str> = name_only.iter().map(|p| p.member_name.as_str()).collect();
    assert_eq!(found, vec!["m1", "m2"]);

    let name_and_age = members
        .find_name_and_age_by_member_name_containing("m1")
        .await
        .unwrap();
    assert_eq!(name_and_age.len(), 1);
    assert_eq!(name_and_age[0].name_and_age(), "m1 0");

    let nested = members.find_nested_by_member_name_containing("m").await.unwrap();
    assert_eq!(nested.len(), 2);
    assert_eq!(nested[0].teams.len(), 1);
    assert_eq!(nested[0].teams[0].name, "teamA");
    assert!(nested[1].teams.is_empty());
}

#[tokio::test]
async fn test_projection_shape_chosen_at_call_time() {
    let db = TestDatabase::new().await;
    let members = db.members();
    let team = db.teams().save(&NewTeam::new("teamA")).await.unwrap();
    let m1 = members.save(&NewMember::new("m1", 10)).await.unwrap();
    members.save(&NewMember::new("other", 20)).await.unwrap();
    db.team_members().save(m1.id, team.id).await.unwrap();

    let name_only = members
        .find_projected_by_member_name_containing("m1", MemberViewKind::NameOnly)
        .await
        .unwrap();
    assert_eq!(name_only.len(), 1);
    assert_eq!(name_only[0].kind(), MemberViewKind::NameOnly);
    assert_eq!(name_only[0].member_name(), "m1");

    let with_age = members
        .find_projected_by_member_name_containing("m1", MemberViewKind::NameAndAge)
        .await
        .unwrap();
    match &with_age[0] {
        MemberView::NameAndAge(p) => assert_eq!(p.name_and_age(), "m1 10"),
        other => panic!("unexpected view: {:?}", other),
    }

    let nested = members
        .find_projected_by_member_name_containing("m1", MemberViewKind::Nested)
        .await
        .unwrap();
    match &nested[0] {
        MemberView::Nested(p) => assert_eq!(p.teams[0].name, "teamA"),
        other => panic!("unexpected view: {:?}", other),
    }

    assert!(members
        .find_projected_by_member_name_containing("zzz", MemberViewKind::Nested)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_native_query() {
    let db = TestDatabase::new().await;
    let repo = db.members();

    repo.save(&NewMember::new("m1", 0)).await.unwrap();
    repo.save(&NewMember::new("m2", 0)).await.unwrap();

    let result = repo.find_by_native_query("m1").await.unwrap();
    assert_eq!(names(&result), vec!["m1"]);
}

#[tokio::test]
async fn test_native_projection_paging() {
    let db = TestDatabase::new().await;
    let members = db.members();
    let teams = db.teams();
    let links = db.team_members();

    let team_a = teams.save(&NewTeam::new("teamA")).await.unwrap();
    let team_b = teams.save(&NewTeam::new("teamB")).await.unwrap();
    let m1 = members.save(&NewMember::new("m1", 0)).await.unwrap();
    members.save(&NewMember::new("m2", 0)).await.unwrap();
    members.save(&NewMember::new("m3", 0)).await.unwrap();
    links.save(m1.id, team_b.id).await.unwrap();
    links.save(m1.id, team_a.id).await.unwrap();

    let page = members
        .find_page_by_native_projection(PageRequest::new(0, 2))
        .await
        .unwrap();

    assert_eq!(page.total_elements(), 3);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.len(), 2);
    assert_eq!(page.content[0].member_name, "m1");
    assert_eq!(page.content[0].team_name.as_deref(), Some("teamB"));
    assert_eq!(page.content[1].team_name, None);

    let last = members
        .find_page_by_native_projection(PageRequest::new(1, 2))
        .await
        .unwrap();
    assert!(last.is_last());
    assert_eq!(last.content[0].member_name, "m3");
}

#[tokio::test]
async fn test_delete_member_removes_links_but_not_team() {
    let db = TestDatabase::new().await;
    let members = db.members();
    let teams = db.teams();
    let links = db.team_members();

    let team = teams.save(&NewTeam::new("teamA")).await.unwrap();
    let member = members.save(&NewMember::new("member1", 10)).await.unwrap();
    links.save(member.id, team.id).await.unwrap();

    assert!(members.delete(member.id).await.unwrap());
    assert!(!members.delete(member.id).await.unwrap());

    assert_eq!(links.count().await.unwrap(), 0);
    let team = teams.find_by_id(team.id).await.unwrap().unwrap();
    assert!(team.team_members.is_empty());
}
