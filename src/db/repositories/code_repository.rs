use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::models::{ConnectionCode, Redemption, User};
use crate::db::DatabaseError;
use crate::error::AppError;
use crate::rent::DEFAULT_RENT_DUE_DAY;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 6;
const CODE_TTL_DAYS: i64 = 7;

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

pub struct CodeRepository;

impl CodeRepository {
    /// Issue a connection code for a (property, unit) pair.
    ///
    /// Upsert keyed on the (property_id, unit_number) constraint: re-issuing
    /// replaces the previous code in place and resets its `used` flag, so at
    /// most one redeemable code exists per unit. A collision on the code
    /// string itself is retried.
    pub async fn issue(
        pool: &SqlitePool,
        property_id: i64,
        unit: &str,
        rent_amount: f64,
        now: DateTime<Utc>,
    ) -> Result<ConnectionCode, AppError> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM properties WHERE id = ?")
            .bind(property_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("Property {property_id} not found")));
        }

        let expires_at = now + Duration::days(CODE_TTL_DAYS);
        for _ in 0..3 {
            let code = generate_code();
            let inserted = sqlx::query_as::<_, ConnectionCode>(
                "INSERT INTO connection_codes
                     (property_id, unit_number, rent_amount, code, used, expires_at, created_at)
                 VALUES (?, ?, ?, ?, 0, ?, ?)
                 ON CONFLICT (property_id, unit_number)
                 DO UPDATE SET code = excluded.code,
                               rent_amount = excluded.rent_amount,
                               expires_at = excluded.expires_at,
                               created_at = excluded.created_at,
                               used = 0
                 RETURNING *",
            )
            .bind(property_id)
            .bind(unit)
            .bind(rent_amount)
            .bind(&code)
            .bind(expires_at)
            .bind(now)
            .fetch_one(pool)
            .await;

            match inserted {
                Ok(row) => return Ok(row),
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    debug!(code, "connection code collision, regenerating");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::Internal(
            "Could not generate a unique connection code".to_string(),
        ))
    }

    /// Redeem a code and bind the tenant to the unit.
    ///
    /// The occupancy checks, the tenancy insert and the compare-and-set on
    /// the code's `used` flag run in one transaction; the partial unique
    /// indexes on active tenancies backstop concurrent redemptions.
    pub async fn redeem(
        pool: &SqlitePool,
        code: &str,
        tenant_email: &str,
        now: DateTime<Utc>,
    ) -> Result<Redemption, AppError> {
        let normalized = code.trim().to_uppercase();
        let mut tx = pool.begin().await?;

        let found = sqlx::query_as::<_, ConnectionCode>(
            "SELECT * FROM connection_codes WHERE code = ?",
        )
        .bind(&normalized)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Code not found".to_string()))?;

        if found.used {
            return Err(AppError::CodeUsed);
        }
        if found.expires_at <= now {
            return Err(AppError::CodeExpired);
        }

        let tenant = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = ? AND user_type = 'tenant'",
        )
        .bind(tenant_email.to_lowercase())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))?;

        let connected = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM tenancies WHERE user_id = ? AND status = 'active'",
        )
        .bind(tenant.id)
        .fetch_optional(&mut *tx)
        .await?;
        if connected.is_some() {
            return Err(AppError::Conflict(
                "You are already connected to a property".to_string(),
            ));
        }

        let occupied = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM tenancies
             WHERE property_id = ? AND unit_number = ? AND status = 'active'",
        )
        .bind(found.property_id)
        .bind(&found.unit_number)
        .fetch_optional(&mut *tx)
        .await?;
        if occupied.is_some() {
            return Err(AppError::Conflict("This unit is already occupied".to_string()));
        }

        let property_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM properties WHERE id = ?",
        )
        .bind(found.property_id)
        .fetch_one(&mut *tx)
        .await?;

        let tenancy_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO tenancies
                 (user_id, property_id, unit_number, rent_amount, rent_due_day,
                  lease_start_date, rent_status, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 'pending', 'active', ?, ?)
             RETURNING id",
        )
        .bind(tenant.id)
        .bind(found.property_id)
        .bind(&found.unit_number)
        .bind(found.rent_amount)
        .bind(i64::from(DEFAULT_RENT_DUE_DAY))
        .bind(now.date_naive())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match DatabaseError::from(err) {
            DatabaseError::Duplicate => {
                AppError::Conflict("This unit is already occupied".to_string())
            }
            other => AppError::Database(other),
        })?;

        let flipped = sqlx::query(
            "UPDATE connection_codes SET used = 1 WHERE id = ? AND used = 0",
        )
        .bind(found.id)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() == 0 {
            return Err(AppError::CodeUsed);
        }

        tx.commit().await?;

        Ok(Redemption {
            tenancy_id,
            property_name,
        })
    }
}
