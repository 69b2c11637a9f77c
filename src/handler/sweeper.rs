//! Completion sweep for recurring reminders.

use chrono::Utc;
use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

/// Closes every active reminder whose end date has passed. Idempotent: a
/// repeated run finds nothing left to update.
pub async fn complete_elapsed(
    app_state: &AppState<State>,
) -> Result<u64, Error> {
    let modified = app_state
        .database
        .medicine_reminder
        .complete_expired(Utc::now())
        .await?;

    if modified > 0 {
        info!("Marked {} reminders as completed", modified);
    }

    Ok(modified)
}
