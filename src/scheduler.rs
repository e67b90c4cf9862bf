//! Monthly reminder sweep.
//!
//! No cron parser: the next trigger instant is computed explicitly from the
//! configured day-of-month, hour and UTC offset, and the scheduler task
//! sleeps until then. The sweep itself is also callable on demand over HTTP.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;
use crate::db::models::{Reminder, TenancyOverview};
use crate::db::repositories::{ReminderRepository, TenancyRepository};
use crate::error::AppError;
use crate::rent;

pub struct ReminderScheduler {
    pool: SqlitePool,
    config: SchedulerConfig,
}

impl ReminderScheduler {
    pub fn new(pool: SqlitePool, config: SchedulerConfig) -> Self {
        Self { pool, config }
    }

    /// Loop forever: sleep until the next trigger, run the sweep, repeat.
    /// A failed sweep is logged and retried at the next trigger; the cycle
    /// guard makes partial runs safe to repeat.
    pub async fn run(self) {
        let offset = self.config.utc_offset();
        loop {
            let now = Utc::now();
            let next = next_sweep_after(now, self.config.sweep_day, self.config.sweep_hour, offset);
            info!(next = %next, "reminder sweep scheduled");

            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            match run_sweep(&self.pool, Utc::now()).await {
                Ok(sent) => info!(count = sent.len(), "reminder sweep completed"),
                Err(err) => error!(error = %err, "reminder sweep failed"),
            }
        }
    }
}

/// Next trigger strictly after `now`: `sweep_day` of the month at
/// `sweep_hour`:00 in the configured offset, clamped for short months.
pub fn next_sweep_after(
    now: DateTime<Utc>,
    sweep_day: u8,
    sweep_hour: u32,
    offset: FixedOffset,
) -> DateTime<Utc> {
    let local = now.with_timezone(&offset);
    let mut year = local.year();
    let mut month = local.month();

    loop {
        let date = rent::due_date_in_month(year, month, sweep_day);
        if let Some(time) = date
            .and_hms_opt(sweep_hour, 0, 0)
            .and_then(|naive| naive.and_local_timezone(offset).single())
        {
            if time > local {
                return time.with_timezone(&Utc);
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
}

/// Select every active tenancy with an unresolved cycle and store a payment
/// reminder for it. Returns the reminders actually inserted; tenancies
/// already reminded this cycle are skipped by the uniqueness guard, and a
/// persistence failure on one tenancy does not abort the rest.
pub async fn run_sweep(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Vec<Reminder>, AppError> {
    let tenancies = TenancyRepository::active_overviews(pool).await?;
    let cycle = rent::cycle_key(now);
    let mut sent = Vec::new();

    for tenancy in &tenancies {
        let due_day = u8::try_from(tenancy.rent_due_day).unwrap_or(rent::DEFAULT_RENT_DUE_DAY);
        if !rent::needs_reminder(tenancy.rent_status, tenancy.last_payment_date, now) {
            continue;
        }

        let position = rent::rent_position(tenancy.last_payment_date, due_day, now);
        let message = compose_payment_reminder(tenancy, &position);

        match ReminderRepository::insert_for_cycle(pool, tenancy.id, &message, &cycle, now).await {
            Ok(Some(reminder)) => sent.push(reminder),
            Ok(None) => {
                info!(tenancy_id = tenancy.id, cycle, "already reminded this cycle");
            }
            Err(err) => {
                warn!(tenancy_id = tenancy.id, error = %err, "skipping tenancy in sweep");
            }
        }
    }

    Ok(sent)
}

fn compose_payment_reminder(tenancy: &TenancyOverview, position: &rent::RentPosition) -> String {
    let overdue_note = if position.status == rent::RentStatus::Overdue {
        "\nOVERDUE: Please pay as soon as possible to avoid late fees.\n"
    } else {
        ""
    };

    format!(
        "Dear {tenant},\n\n\
         This is a friendly reminder about your rent payment for {property}, Unit {unit}.\n\n\
         Rent Amount: {amount:.2}\n\
         Due Date: {due}\n\
         {overdue_note}\n\
         Please ensure timely payment to avoid any inconvenience.\n\n\
         Best regards,\n\
         {owner}",
        tenant = tenancy.tenant_name,
        property = tenancy.property_name,
        unit = tenancy.unit_number,
        amount = tenancy.rent_amount,
        due = position.due_date,
        overdue_note = overdue_note,
        owner = tenancy.owner_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn trigger_later_this_month() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let next = next_sweep_after(now, 4, 9, offset(0));
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap());
    }

    #[test]
    fn trigger_rolls_to_next_month_once_passed() {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap();
        let next = next_sweep_after(now, 4, 9, offset(0));
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 4, 4, 9, 0, 0).unwrap());
    }

    #[test]
    fn trigger_rolls_over_year_end() {
        let now = Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap();
        let next = next_sweep_after(now, 4, 9, offset(0));
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 4, 9, 0, 0).unwrap());
    }

    #[test]
    fn trigger_at_half_hour_offset() {
        // 09:00 at +05:30 is 03:30 UTC.
        let half = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 3, 0, 0).unwrap();
        let next = next_sweep_after(now, 4, 9, half);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 3, 4, 3, 30, 0).unwrap());
    }

    #[test]
    fn sweep_day_clamps_in_short_months() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let next = next_sweep_after(now, 31, 9, offset(0));
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 2, 28, 9, 0, 0).unwrap());
    }
}
