//! Reminder expansion engine.
//!
//! Translates a recurring medicine reminder into concrete, individually
//! dispatchable schedule rows, and keeps that expansion consistent across
//! edits. The three operations here map to the reminder lifecycle:
//!
//! - create: [`create_expansion`] after the reminder is saved;
//! - edit: [`purge_previous`] under the old name, persist the update, then
//!   [`create_expansion`] under the new definition (the caller sequences
//!   these; the two halves are deliberately not one transaction, so a crash
//!   in between leaves the reminder under-scheduled until the next edit);
//! - delete: [`delete_expansion`] for full cleanup.
//!
//! Schedule rows are tied to their reminder only by `(user_id,
//! reminder_key)` where the key is the reminder's name. Two reminders with
//! the same name for one user will corrupt each other's schedules.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::future_occurrences,
    model::{MedicineReminder, NewReminderSchedule},
};

pub const REMINDER_ICON: &str = "/images/medtrax-logo.png";

fn reminder_body(name: &str) -> String {
    format!("Time to take your medicine: {}", name)
}

/// Builds the schedule rows for every future occurrence of a reminder.
pub fn build_schedule_rows(
    reminder: &MedicineReminder,
    subscription_id: i64,
    now: DateTime<Utc>,
) -> Vec<NewReminderSchedule> {
    future_occurrences(
        reminder.start_date,
        reminder.end_date,
        &reminder.times,
        &reminder.days,
        now,
    )
    .into_iter()
    .map(|time| NewReminderSchedule {
        title: reminder.name.clone(),
        body: reminder_body(&reminder.name),
        icon: String::from(REMINDER_ICON),
        time,
        subscription_id,
        user_id: Some(reminder.user_id.clone()),
        reminder_key: reminder.name.clone(),
    })
    .collect()
}

/// Expands a saved reminder into schedule rows, one per future occurrence.
///
/// A user without a push subscription gets no rows and no error; there is
/// nowhere to deliver to, so scheduling is skipped.
pub async fn create_expansion(
    app_state: &AppState<State>,
    reminder: &MedicineReminder,
) -> Result<u64, Error> {
    let subscription = app_state
        .database
        .push_subscription
        .get_by_user(reminder.user_id.to_owned())
        .await?;

    let Some(subscription) = subscription else {
        info!(
            "No push subscription for user {}; skipping scheduling for {}",
            reminder.user_id, reminder.name
        );
        return Ok(0);
    };

    let rows = build_schedule_rows(reminder, subscription.id, Utc::now());

    if rows.is_empty() {
        return Ok(0);
    }

    let inserted = app_state
        .database
        .reminder_schedule
        .insert_many(rows)
        .await?;

    info!(
        "Scheduled {} notifications for reminder {} (user {})",
        inserted, reminder.name, reminder.user_id
    );

    Ok(inserted)
}

/// Edit, step one: purge future, unsent rows still tied to the previous
/// name. Sent history and already-passed rows stay untouched.
pub async fn purge_previous(
    app_state: &AppState<State>,
    user_id: String,
    old_name: String,
) -> Result<u64, Error> {
    app_state
        .database
        .reminder_schedule
        .delete_future_unsent(user_id, old_name, Utc::now())
        .await
        .map_err(Error::SQL)
}

/// Removes every schedule row of a deleted reminder, sent or not, past or
/// future. Returns the removed count.
pub async fn delete_expansion(
    app_state: &AppState<State>,
    user_id: String,
    name: String,
) -> Result<u64, Error> {
    let removed = app_state
        .database
        .reminder_schedule
        .delete_by_reminder_key(user_id, name)
        .await?;

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        let naive = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap();
        Utc.from_utc_datetime(&naive)
    }

    fn reminder() -> MedicineReminder {
        MedicineReminder {
            id: 7,
            user_id: String::from("user-1"),
            name: String::from("Aspirin"),
            image: None,
            start_date: ts(2025, 6, 5, 0, 0),
            end_date: ts(2025, 6, 5, 0, 0),
            times: vec![String::from("09:00"), String::from("21:00")],
            days: vec![],
            notes: None,
            status: String::from("active"),
            created_at: ts(2025, 6, 1, 0, 0),
            updated_at: ts(2025, 6, 1, 0, 0),
        }
    }

    #[test]
    fn rows_carry_title_body_icon_and_key() {
        let rows = build_schedule_rows(&reminder(), 42, ts(2025, 6, 5, 8, 0));

        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.title, "Aspirin");
            assert_eq!(row.body, "Time to take your medicine: Aspirin");
            assert_eq!(row.icon, REMINDER_ICON);
            assert_eq!(row.subscription_id, 42);
            assert_eq!(row.user_id.as_deref(), Some("user-1"));
            assert_eq!(row.reminder_key, "Aspirin");
        }
        assert_eq!(rows[0].time, ts(2025, 6, 5, 9, 0));
        assert_eq!(rows[1].time, ts(2025, 6, 5, 21, 0));
    }

    #[test]
    fn past_occurrences_produce_no_rows() {
        let rows = build_schedule_rows(&reminder(), 42, ts(2025, 6, 6, 0, 0));
        assert!(rows.is_empty());
    }
}
