//! Connection-code lifecycle: issuing, redeeming and the invariants that
//! keep one tenant per unit.

mod common;

use common::{at, seed_owner, seed_property, seed_tenant, test_pool};
use rentdesk::db::repositories::{CodeRepository, TenancyRepository};
use rentdesk::error::AppError;
use rentdesk::rent::{RentStatus, DEFAULT_RENT_DUE_DAY};

#[tokio::test]
async fn issue_and_redeem_creates_pending_tenancy() {
    let pool = test_pool().await;
    let owner = seed_owner(&pool, "owner@example.com").await;
    let tenant = seed_tenant(&pool, "t@example.com").await;
    let property = seed_property(&pool, &owner, 4).await;

    let now = at(2025, 3, 1);
    let code = CodeRepository::issue(&pool, property.id, "101", 10000.0, now)
        .await
        .unwrap();

    assert_eq!(code.code.len(), 6);
    assert!(code.code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    assert!(!code.used);
    assert_eq!(code.expires_at, now + chrono::Duration::days(7));

    let redemption = CodeRepository::redeem(&pool, &code.code, "t@example.com", now)
        .await
        .unwrap();
    assert_eq!(redemption.property_name, "Sunrise Apartments");

    let tenancy = TenancyRepository::find(&pool, redemption.tenancy_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tenancy.user_id, tenant.id);
    assert_eq!(tenancy.unit_number, "101");
    assert_eq!(tenancy.rent_amount, 10000.0);
    assert_eq!(tenancy.rent_due_day, i64::from(DEFAULT_RENT_DUE_DAY));
    assert_eq!(tenancy.rent_status, RentStatus::Pending);
    assert_eq!(tenancy.lease_start_date, now.date_naive());
    assert!(tenancy.last_payment_date.is_none());
}

#[tokio::test]
async fn redeeming_is_case_insensitive() {
    let pool = test_pool().await;
    let owner = seed_owner(&pool, "owner@example.com").await;
    seed_tenant(&pool, "t@example.com").await;
    let property = seed_property(&pool, &owner, 4).await;

    let now = at(2025, 3, 1);
    let code = CodeRepository::issue(&pool, property.id, "101", 9000.0, now)
        .await
        .unwrap();

    CodeRepository::redeem(&pool, &code.code.to_lowercase(), "t@example.com", now)
        .await
        .unwrap();
}

#[tokio::test]
async fn redeeming_twice_fails_with_used() {
    let pool = test_pool().await;
    let owner = seed_owner(&pool, "owner@example.com").await;
    seed_tenant(&pool, "first@example.com").await;
    seed_tenant(&pool, "second@example.com").await;
    let property = seed_property(&pool, &owner, 4).await;

    let now = at(2025, 3, 1);
    let code = CodeRepository::issue(&pool, property.id, "101", 10000.0, now)
        .await
        .unwrap();

    CodeRepository::redeem(&pool, &code.code, "first@example.com", now)
        .await
        .unwrap();

    let err = CodeRepository::redeem(&pool, &code.code, "second@example.com", now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CodeUsed), "got {err:?}");

    // The losing redemption must not have created a tenancy.
    let tenancies = TenancyRepository::active_overviews(&pool).await.unwrap();
    assert_eq!(tenancies.len(), 1);
}

#[tokio::test]
async fn expired_code_is_reported_as_expired_not_used() {
    let pool = test_pool().await;
    let owner = seed_owner(&pool, "owner@example.com").await;
    seed_tenant(&pool, "t@example.com").await;
    let property = seed_property(&pool, &owner, 4).await;

    let issued_at = at(2025, 3, 1);
    let code = CodeRepository::issue(&pool, property.id, "101", 10000.0, issued_at)
        .await
        .unwrap();

    let eight_days_later = at(2025, 3, 9);
    let err = CodeRepository::redeem(&pool, &code.code, "t@example.com", eight_days_later)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CodeExpired), "got {err:?}");
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let pool = test_pool().await;
    seed_tenant(&pool, "t@example.com").await;

    let err = CodeRepository::redeem(&pool, "ZZZZZZ", "t@example.com", at(2025, 3, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn reissuing_replaces_the_previous_code() {
    let pool = test_pool().await;
    let owner = seed_owner(&pool, "owner@example.com").await;
    seed_tenant(&pool, "t@example.com").await;
    let property = seed_property(&pool, &owner, 4).await;

    let now = at(2025, 3, 1);
    let first = CodeRepository::issue(&pool, property.id, "101", 10000.0, now)
        .await
        .unwrap();
    let second = CodeRepository::issue(&pool, property.id, "101", 12000.0, now)
        .await
        .unwrap();

    // Same row, new code and rent.
    assert_eq!(first.id, second.id);
    assert_ne!(first.code, second.code);
    assert_eq!(second.rent_amount, 12000.0);

    // The old code string is gone entirely.
    let err = CodeRepository::redeem(&pool, &first.code, "t@example.com", now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    // The replacement still works.
    CodeRepository::redeem(&pool, &second.code, "t@example.com", now)
        .await
        .unwrap();
}

#[tokio::test]
async fn tenant_cannot_hold_two_active_tenancies() {
    let pool = test_pool().await;
    let owner = seed_owner(&pool, "owner@example.com").await;
    seed_tenant(&pool, "t@example.com").await;
    let property = seed_property(&pool, &owner, 4).await;

    let now = at(2025, 3, 1);
    let first = CodeRepository::issue(&pool, property.id, "101", 10000.0, now)
        .await
        .unwrap();
    CodeRepository::redeem(&pool, &first.code, "t@example.com", now)
        .await
        .unwrap();

    let second = CodeRepository::issue(&pool, property.id, "102", 11000.0, now)
        .await
        .unwrap();
    let err = CodeRepository::redeem(&pool, &second.code, "t@example.com", now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn occupied_unit_rejects_a_fresh_code() {
    let pool = test_pool().await;
    let owner = seed_owner(&pool, "owner@example.com").await;
    seed_tenant(&pool, "first@example.com").await;
    seed_tenant(&pool, "second@example.com").await;
    let property = seed_property(&pool, &owner, 4).await;

    let now = at(2025, 3, 1);
    let code = CodeRepository::issue(&pool, property.id, "101", 10000.0, now)
        .await
        .unwrap();
    CodeRepository::redeem(&pool, &code.code, "first@example.com", now)
        .await
        .unwrap();

    // Re-issuing resets the used flag, but the unit itself is taken now.
    let fresh = CodeRepository::issue(&pool, property.id, "101", 10000.0, now)
        .await
        .unwrap();
    let err = CodeRepository::redeem(&pool, &fresh.code, "second@example.com", now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn concurrent_redemptions_let_exactly_one_through() {
    let pool = test_pool().await;
    let owner = seed_owner(&pool, "owner@example.com").await;
    seed_tenant(&pool, "first@example.com").await;
    seed_tenant(&pool, "second@example.com").await;
    let property = seed_property(&pool, &owner, 4).await;

    let now = at(2025, 3, 1);
    let code = CodeRepository::issue(&pool, property.id, "101", 10000.0, now)
        .await
        .unwrap();

    let (pool_a, pool_b) = (pool.clone(), pool.clone());
    let (code_a, code_b) = (code.code.clone(), code.code.clone());
    let a = tokio::spawn(async move {
        CodeRepository::redeem(&pool_a, &code_a, "first@example.com", now).await
    });
    let b = tokio::spawn(async move {
        CodeRepository::redeem(&pool_b, &code_b, "second@example.com", now).await
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one redemption must win: {results:?}");

    let tenancies = TenancyRepository::active_overviews(&pool).await.unwrap();
    assert_eq!(tenancies.len(), 1);
}

#[tokio::test]
async fn issuing_for_missing_property_fails() {
    let pool = test_pool().await;

    let err = CodeRepository::issue(&pool, 999, "101", 10000.0, at(2025, 3, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}
