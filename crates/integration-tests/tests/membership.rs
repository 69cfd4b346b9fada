//! Integration tests for families, joining and leaving.
//!
//! These tests require a `PostgreSQL` server reachable through
//! `DATABASE_URL`; each test runs in its own scratch database.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use sqlx::PgPool;

use shopping_planner_core::{Affiliation, FamilyRole, RandomTokens};
use shopping_planner_integration_tests::{
    ScriptedTokens, active_list_count, create_bare_family, create_user, membership_count,
    rollover,
};
use shopping_planner_server::db::families;
use shopping_planner_server::services::{ErrorKind, FamilyRegistry, JoinResolver};

// ============================================================================
// Create
// ============================================================================

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_family_makes_admin_and_opens_list(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let registry = FamilyRegistry::new(&pool, &RandomTokens, rollover());

    let (family, claim) = registry
        .create_family(ana.id, &ana.email, "  Lopez  ")
        .await
        .unwrap();

    assert_eq!(family.nickname, "Lopez");
    assert!(family.token.starts_with("FAM-"));
    assert_eq!(
        claim.affiliation,
        Affiliation::Admin {
            family_id: family.id
        }
    );
    assert_eq!(registry.get_family(ana.id).await.unwrap(), family);
    assert_eq!(active_list_count(&pool, family.id).await, 1);

    let members = registry.list_members(family.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, FamilyRole::Admin);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_family_rejects_blank_nickname(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let registry = FamilyRegistry::new(&pool, &RandomTokens, rollover());

    let err = registry
        .create_family(ana.id, &ana.email, "   ")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(membership_count(&pool, &ana).await, 0);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_family_twice_conflicts(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let registry = FamilyRegistry::new(&pool, &RandomTokens, rollover());

    registry
        .create_family(ana.id, &ana.email, "Lopez")
        .await
        .unwrap();
    let err = registry
        .create_family(ana.id, &ana.email, "Lopez Again")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(membership_count(&pool, &ana).await, 1);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_family_token_collision_is_retried(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let ben = create_user(&pool, "Ben", "ben@example.com").await;
    let tokens = ScriptedTokens::new(["FAM-AAAAAA-AAAA", "FAM-AAAAAA-AAAA", "FAM-BBBBBB-BBBB"]);
    let registry = FamilyRegistry::new(&pool, &tokens, rollover());

    let (first, _) = registry
        .create_family(ana.id, &ana.email, "Lopez")
        .await
        .unwrap();
    let (second, _) = registry
        .create_family(ben.id, &ben.email, "Smith")
        .await
        .unwrap();

    assert_eq!(first.token, "FAM-AAAAAA-AAAA");
    assert_eq!(second.token, "FAM-BBBBBB-BBBB");
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_family_token_exhaustion_rolls_back(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let ben = create_user(&pool, "Ben", "ben@example.com").await;
    let taken = create_bare_family(&pool, &ana, "Lopez").await;
    let tokens = ScriptedTokens::repeating(&taken.token, 10);
    let registry = FamilyRegistry::new(&pool, &tokens, rollover());

    let err = registry
        .create_family(ben.id, &ben.email, "Smith")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(membership_count(&pool, &ben).await, 0);
}

// ============================================================================
// Join
// ============================================================================

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_join_replaces_membership(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let ben = create_user(&pool, "Ben", "ben@example.com").await;
    let registry = FamilyRegistry::new(&pool, &RandomTokens, rollover());

    let (lopez, _) = registry
        .create_family(ana.id, &ana.email, "Lopez")
        .await
        .unwrap();
    let (smith, _) = registry
        .create_family(ben.id, &ben.email, "Smith")
        .await
        .unwrap();

    // Ana holds Smith's family token; lower case and padding are tolerated.
    let typed = format!("  {}  ", smith.token.to_lowercase());
    let claim = JoinResolver::new(&pool)
        .join_with_token(ana.id, &ana.email, &typed)
        .await
        .unwrap();

    assert_eq!(
        claim.affiliation,
        Affiliation::Member {
            family_id: smith.id
        }
    );
    assert_eq!(membership_count(&pool, &ana).await, 1);

    let membership = registry.membership(ana.id).await.unwrap().unwrap();
    assert_eq!(membership.family_id, smith.id);
    assert_eq!(membership.role, FamilyRole::Member);
    assert!(registry.list_members(lopez.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_family_token_is_reusable(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let ben = create_user(&pool, "Ben", "ben@example.com").await;
    let cal = create_user(&pool, "Cal", "cal@example.com").await;
    let registry = FamilyRegistry::new(&pool, &RandomTokens, rollover());
    let join = JoinResolver::new(&pool);

    let (family, _) = registry
        .create_family(ana.id, &ana.email, "Lopez")
        .await
        .unwrap();

    join.join_with_token(ben.id, &ben.email, &family.token)
        .await
        .unwrap();
    join.join_with_token(cal.id, &cal.email, &family.token)
        .await
        .unwrap();

    let members = registry.list_members(family.id).await.unwrap();
    let names: Vec<&str> = members.iter().map(|m| m.full_name.as_str()).collect();
    assert_eq!(names, ["Ana", "Ben", "Cal"]);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_join_with_unknown_token_keeps_membership(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let registry = FamilyRegistry::new(&pool, &RandomTokens, rollover());
    let join = JoinResolver::new(&pool);

    let (family, _) = registry
        .create_family(ana.id, &ana.email, "Lopez")
        .await
        .unwrap();

    let err = join
        .join_with_token(ana.id, &ana.email, "FAM-NOPE00-0000")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = join
        .join_with_token(ana.id, &ana.email, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let membership = registry.membership(ana.id).await.unwrap().unwrap();
    assert_eq!(membership.family_id, family.id);
    assert_eq!(membership.role, FamilyRole::Admin);
}

// ============================================================================
// Leave
// ============================================================================

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_leave_is_idempotent(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let registry = FamilyRegistry::new(&pool, &RandomTokens, rollover());

    registry
        .create_family(ana.id, &ana.email, "Lopez")
        .await
        .unwrap();

    let claim = registry.leave_family(ana.id, &ana.email).await.unwrap();
    assert_eq!(claim.affiliation, Affiliation::Unaffiliated);
    assert_eq!(membership_count(&pool, &ana).await, 0);

    let claim = registry.leave_family(ana.id, &ana.email).await.unwrap();
    assert_eq!(claim.affiliation, Affiliation::Unaffiliated);

    let err = registry.get_family(ana.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_membership_stays_single_across_transitions(pool: PgPool) {
    let ana = create_user(&pool, "Ana", "ana@example.com").await;
    let ben = create_user(&pool, "Ben", "ben@example.com").await;
    let registry = FamilyRegistry::new(&pool, &RandomTokens, rollover());
    let join = JoinResolver::new(&pool);

    let (smith, _) = registry
        .create_family(ben.id, &ben.email, "Smith")
        .await
        .unwrap();

    registry
        .create_family(ana.id, &ana.email, "Lopez")
        .await
        .unwrap();
    assert_eq!(membership_count(&pool, &ana).await, 1);

    join.join_with_token(ana.id, &ana.email, &smith.token)
        .await
        .unwrap();
    assert_eq!(membership_count(&pool, &ana).await, 1);

    // Joining the family you are already in keeps one row.
    join.join_with_token(ana.id, &ana.email, &smith.token)
        .await
        .unwrap();
    assert_eq!(membership_count(&pool, &ana).await, 1);

    registry.leave_family(ana.id, &ana.email).await.unwrap();
    assert_eq!(membership_count(&pool, &ana).await, 0);

    registry
        .create_family(ana.id, &ana.email, "Lopez II")
        .await
        .unwrap();
    assert_eq!(membership_count(&pool, &ana).await, 1);

    // Ana's moves never touched Ben.
    let membership = families::membership_for_user(&pool, ben.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(membership.family_id, smith.id);
}
