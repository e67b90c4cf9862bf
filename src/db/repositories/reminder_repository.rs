use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::{Reminder, ReminderFeedItem, ReminderType};
use crate::error::AppError;

pub struct ReminderRepository;

impl ReminderRepository {
    /// Insert a sweep reminder keyed on the billing cycle.
    ///
    /// Returns `None` when a reminder for this (tenancy, cycle) already
    /// exists, which makes a re-run of the sweep within one cycle a no-op.
    pub async fn insert_for_cycle(
        pool: &SqlitePool,
        tenancy_id: i64,
        message: &str,
        cycle: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Reminder>, AppError> {
        let reminder = sqlx::query_as::<_, Reminder>(
            "INSERT INTO reminders
                 (tenancy_id, message, reminder_type, cycle, sent_at, read, created_at)
             VALUES (?, ?, 'payment', ?, ?, 0, ?)
             ON CONFLICT DO NOTHING
             RETURNING *",
        )
        .bind(tenancy_id)
        .bind(message)
        .bind(cycle)
        .bind(now)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(reminder)
    }

    /// On-demand reminder from the owner. Always inserts, regardless of the
    /// tenancy's current rent status.
    pub async fn send_manual(
        pool: &SqlitePool,
        tenancy_id: i64,
        message: &str,
        reminder_type: ReminderType,
        now: DateTime<Utc>,
    ) -> Result<Reminder, AppError> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM tenancies WHERE id = ?")
            .bind(tenancy_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("Tenancy {tenancy_id} not found")));
        }

        let reminder = sqlx::query_as::<_, Reminder>(
            "INSERT INTO reminders
                 (tenancy_id, message, reminder_type, cycle, sent_at, read, created_at)
             VALUES (?, ?, ?, NULL, ?, 0, ?)
             RETURNING *",
        )
        .bind(tenancy_id)
        .bind(message)
        .bind(reminder_type)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(reminder)
    }

    /// Tenant notification feed, newest first.
    pub async fn list_for_tenant(
        pool: &SqlitePool,
        tenant_email: &str,
    ) -> Result<Vec<ReminderFeedItem>, AppError> {
        let reminders = sqlx::query_as::<_, ReminderFeedItem>(
            "SELECT r.id, r.tenancy_id, r.message, r.reminder_type, r.sent_at, r.read,
                    p.name AS property_name, ou.name AS owner_name
             FROM reminders r
             JOIN tenancies t ON r.tenancy_id = t.id
             JOIN users tu ON t.user_id = tu.id
             JOIN properties p ON t.property_id = p.id
             JOIN users ou ON p.owner_id = ou.id
             WHERE tu.email = ?
             ORDER BY r.sent_at DESC
             LIMIT 20",
        )
        .bind(tenant_email.to_lowercase())
        .fetch_all(pool)
        .await?;

        Ok(reminders)
    }

    pub async fn mark_read(pool: &SqlitePool, reminder_id: i64) -> Result<(), AppError> {
        let updated = sqlx::query("UPDATE reminders SET read = 1 WHERE id = ?")
            .bind(reminder_id)
            .execute(pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Reminder {reminder_id} not found")));
        }
        Ok(())
    }

    pub async fn count_for_tenancy(pool: &SqlitePool, tenancy_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reminders WHERE tenancy_id = ?",
        )
        .bind(tenancy_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
