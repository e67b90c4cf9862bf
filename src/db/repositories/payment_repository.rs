use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::{Payment, RecordPayment, Tenancy, User};
use crate::error::AppError;

pub struct PaymentRepository;

impl PaymentRepository {
    /// Record a rent payment and mark the tenancy paid.
    ///
    /// The payment insert and the tenancy update (`last_payment_date`,
    /// `rent_status = 'paid'`) commit together. This is the only writer of
    /// the cached `paid` status.
    pub async fn record(
        pool: &SqlitePool,
        data: &RecordPayment,
        now: DateTime<Utc>,
    ) -> Result<Payment, AppError> {
        let paid_date = data.payment_date.unwrap_or_else(|| now.date_naive());
        let method = data.payment_method.as_deref().unwrap_or("cash");
        let notes = data.notes.as_deref().unwrap_or("");

        let mut tx = pool.begin().await?;

        let tenant = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = ? AND user_type = 'tenant'",
        )
        .bind(data.tenant_email.to_lowercase())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Tenant with email {} not found", data.tenant_email))
        })?;

        let tenancy = sqlx::query_as::<_, Tenancy>(
            "SELECT * FROM tenancies WHERE user_id = ? AND status = 'active'",
        )
        .bind(tenant.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Tenant is not assigned to any property".to_string())
        })?;

        let payment = sqlx::query_as::<_, Payment>(
            "INSERT INTO payments
                 (tenancy_id, amount, due_date, paid_date, method, status, notes, created_at)
             VALUES (?, ?, ?, ?, ?, 'paid', ?, ?)
             RETURNING *",
        )
        .bind(tenancy.id)
        .bind(data.amount)
        .bind(paid_date)
        .bind(paid_date)
        .bind(method)
        .bind(notes)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE tenancies
             SET last_payment_date = ?, rent_status = 'paid', updated_at = ?
             WHERE id = ?",
        )
        .bind(paid_date)
        .bind(now)
        .bind(tenancy.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(payment)
    }

    /// Payment history for a tenant; empty when not assigned to a unit.
    pub async fn history_by_email(
        pool: &SqlitePool,
        tenant_email: &str,
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT pay.* FROM payments pay
             JOIN tenancies t ON pay.tenancy_id = t.id
             JOIN users u ON t.user_id = u.id
             WHERE u.email = ?
             ORDER BY pay.paid_date DESC, pay.created_at DESC
             LIMIT 50",
        )
        .bind(tenant_email.to_lowercase())
        .fetch_all(pool)
        .await?;

        Ok(payments)
    }

    pub async fn count_for_tenancy(pool: &SqlitePool, tenancy_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments WHERE tenancy_id = ?",
        )
        .bind(tenancy_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
