//! Database entity structs for the reminder service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One browser push endpoint with its encryption material. Upserted by
/// endpoint on re-registration; at most one live row per endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushSubscription {
    pub id: i64,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// One concrete, fire-once notification job derived from a recurring
/// reminder. `sent` transitions false -> true at most once and never back.
///
/// `reminder_key` carries the owning reminder's name and, together with
/// `user_id`, is the only link back to the recurring definition. There is
/// no foreign key: two reminders sharing a name for the same user will
/// corrupt each other's schedules.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReminderSchedule {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub icon: String,
    pub time: DateTime<Utc>,
    pub subscription_id: i64,
    pub user_id: Option<String>,
    pub reminder_key: String,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for `reminder_schedule`; the expansion engine produces
/// these in bulk.
#[derive(Debug, Clone)]
pub struct NewReminderSchedule {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub time: DateTime<Utc>,
    pub subscription_id: i64,
    pub user_id: Option<String>,
    pub reminder_key: String,
}

/// A recurring medicine reminder as entered by the user.
///
/// `times` holds "HH:MM" strings; `days` holds three-letter weekday
/// abbreviations (Sun..Sat), empty meaning every day in the window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MedicineReminder {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub image: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub times: Vec<String>,
    pub days: Vec<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert/update shape for `medicine_reminder` coming from the owning user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMedicineReminder {
    pub name: String,
    pub image: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub times: Vec<String>,
    #[serde(default)]
    pub days: Vec<String>,
    pub notes: Option<String>,
}
