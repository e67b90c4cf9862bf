//! Shared harness for integration tests: an isolated in-memory SQLite
//! database with migrations applied and a few seeding helpers.

use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use rentdesk::db::models::{NewProperty, Property, User, UserType};
use rentdesk::db::repositories::{PropertyRepository, UserRepository};
use rentdesk::db::MIGRATOR;

pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub async fn seed_owner(pool: &SqlitePool, email: &str) -> User {
    UserRepository::create(pool, "Olive Owner", email, None, UserType::Owner, at(2025, 1, 1))
        .await
        .unwrap()
}

pub async fn seed_tenant(pool: &SqlitePool, email: &str) -> User {
    UserRepository::create(pool, "Terry Tenant", email, None, UserType::Tenant, at(2025, 1, 1))
        .await
        .unwrap()
}

pub async fn seed_property(pool: &SqlitePool, owner: &User, units: i64) -> Property {
    let data = NewProperty {
        owner_email: owner.email.clone(),
        property_name: "Sunrise Apartments".to_string(),
        address: "12 Hill Road".to_string(),
        property_type: "apartment".to_string(),
        units: Some(units),
    };
    PropertyRepository::create(pool, owner.id, &data, at(2025, 1, 1))
        .await
        .unwrap()
}
