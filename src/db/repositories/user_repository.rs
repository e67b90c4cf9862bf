use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::models::{User, UserType};
use crate::error::AppError;

pub struct UserRepository;

impl UserRepository {
    /// Identity resolution: email plus role, as the code registry and the
    /// payment recorder consume it.
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
        user_type: UserType,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = ? AND user_type = ?",
        )
        .bind(email.to_lowercase())
        .bind(user_type)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        phone: Option<&str>,
        user_type: UserType,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, phone, user_type, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(name)
        .bind(email.to_lowercase())
        .bind(phone)
        .bind(user_type)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Create-or-refresh a tenant user by email, used by direct owner
    /// assignment where the tenant may not have an account yet.
    pub async fn upsert_tenant(
        tx: &mut Transaction<'_, Sqlite>,
        name: &str,
        email: &str,
        phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, phone, user_type, created_at)
             VALUES (?, ?, ?, 'tenant', ?)
             ON CONFLICT (email)
             DO UPDATE SET name = excluded.name, phone = excluded.phone
             RETURNING *",
        )
        .bind(name)
        .bind(email.to_lowercase())
        .bind(phone)
        .bind(now)
        .fetch_one(&mut **tx)
        .await?;

        Ok(user)
    }
}
