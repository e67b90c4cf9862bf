use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::{NewTenancy, Tenancy, TenancyOverview};
use crate::db::repositories::UserRepository;
use crate::db::DatabaseError;
use crate::error::AppError;
use crate::rent::DEFAULT_RENT_DUE_DAY;

const OVERVIEW_SELECT: &str = "SELECT t.id, t.property_id, t.unit_number, t.rent_amount, t.rent_due_day,
        t.last_payment_date, t.rent_status,
        tu.name AS tenant_name, tu.email AS tenant_email,
        p.name AS property_name, p.address AS property_address,
        ou.name AS owner_name, ou.email AS owner_email
 FROM tenancies t
 JOIN users tu ON t.user_id = tu.id
 JOIN properties p ON t.property_id = p.id
 JOIN users ou ON p.owner_id = ou.id";

pub struct TenancyRepository;

impl TenancyRepository {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Tenancy>, AppError> {
        let tenancy = sqlx::query_as::<_, Tenancy>("SELECT * FROM tenancies WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(tenancy)
    }

    pub async fn active_by_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<Tenancy>, AppError> {
        let tenancy = sqlx::query_as::<_, Tenancy>(
            "SELECT * FROM tenancies WHERE user_id = ? AND status = 'active'",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(tenancy)
    }

    /// Tenant dashboard view: the active tenancy joined with tenant,
    /// property and owner details.
    pub async fn overview_by_email(
        pool: &SqlitePool,
        tenant_email: &str,
    ) -> Result<Option<TenancyOverview>, AppError> {
        let sql = format!("{OVERVIEW_SELECT} WHERE tu.email = ? AND t.status = 'active'");
        let overview = sqlx::query_as::<_, TenancyOverview>(&sql)
            .bind(tenant_email.to_lowercase())
            .fetch_optional(pool)
            .await?;

        Ok(overview)
    }

    /// All active tenancies, as consumed by the reminder sweep.
    pub async fn active_overviews(pool: &SqlitePool) -> Result<Vec<TenancyOverview>, AppError> {
        let sql = format!("{OVERVIEW_SELECT} WHERE t.status = 'active' ORDER BY t.id");
        let overviews = sqlx::query_as::<_, TenancyOverview>(&sql)
            .fetch_all(pool)
            .await?;

        Ok(overviews)
    }

    /// Direct owner assignment: create or refresh the tenant user and bind
    /// it to the unit, subject to the same occupancy invariants as code
    /// redemption.
    pub async fn assign(
        pool: &SqlitePool,
        data: &NewTenancy,
        now: DateTime<Utc>,
    ) -> Result<Tenancy, AppError> {
        let mut tx = pool.begin().await?;

        let tenant = UserRepository::upsert_tenant(
            &mut tx,
            &data.name,
            &data.email,
            data.phone.as_deref(),
            now,
        )
        .await?;

        let occupied = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM tenancies
             WHERE property_id = ? AND unit_number = ? AND status = 'active'",
        )
        .bind(data.property_id)
        .bind(&data.unit_number)
        .fetch_optional(&mut *tx)
        .await?;
        if occupied.is_some() {
            return Err(AppError::Conflict("This unit is already occupied".to_string()));
        }

        let tenancy = sqlx::query_as::<_, Tenancy>(
            "INSERT INTO tenancies
                 (user_id, property_id, unit_number, rent_amount, rent_due_day,
                  lease_start_date, rent_status, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 'pending', 'active', ?, ?)
             RETURNING *",
        )
        .bind(tenant.id)
        .bind(data.property_id)
        .bind(&data.unit_number)
        .bind(data.rent_amount)
        .bind(data.rent_due_day.unwrap_or(i64::from(DEFAULT_RENT_DUE_DAY)))
        .bind(data.lease_start_date.unwrap_or_else(|| now.date_naive()))
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match DatabaseError::from(err) {
            DatabaseError::Duplicate => {
                AppError::Conflict("Tenant already holds an active tenancy".to_string())
            }
            other => AppError::Database(other),
        })?;

        tx.commit().await?;

        Ok(tenancy)
    }

    /// Hard delete; payments and reminders go with it via FK cascade.
    pub async fn remove(pool: &SqlitePool, tenancy_id: i64) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM tenancies WHERE id = ?")
            .bind(tenancy_id)
            .execute(pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tenancy {tenancy_id} not found")));
        }
        Ok(())
    }
}
