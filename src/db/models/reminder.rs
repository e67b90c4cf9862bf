use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    Payment,
    Lease,
    Maintenance,
    General,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub tenancy_id: i64,
    pub message: String,
    pub reminder_type: ReminderType,
    /// Set only by the monthly sweep; `None` for on-demand reminders.
    pub cycle: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Reminder joined with property and owner names for the tenant's
/// notification feed.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ReminderFeedItem {
    pub id: i64,
    pub tenancy_id: i64,
    pub message: String,
    pub reminder_type: ReminderType,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
    pub property_name: String,
    pub owner_name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendReminder {
    pub tenancy_id: i64,
    #[validate(length(min = 1, message = "Message must not be empty"))]
    pub message: String,
    pub reminder_type: Option<ReminderType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReminderRead {
    pub reminder_id: i64,
}
