//! Reminder-owner operations.
//!
//! The trigger points an API layer calls when a user manages medicine
//! reminders or registers a browser for push. Persisting the reminder is
//! the primary effect and its errors propagate; schedule expansion is a
//! best-effort side channel whose failures are logged, never surfaced to
//! the owner. The owner only ever notices a scheduling problem as a
//! missing notification.

use std::future::Future;

use tracing::error;

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::expansion,
    model::{MedicineReminder, NewMedicineReminder, PushSubscription},
    types::SubscriptionData,
};

/// Seam between the owner operations and their schedule side effects, the
/// way `PushClient` seams the wire. The live implementation delegates to
/// the expansion engine; tests substitute a recorder.
pub trait ScheduleEffects: Send + Sync {
    /// Removes the future, unsent rows still carried under a reminder name.
    fn purge(
        &self,
        user_id: String,
        reminder_key: String,
    ) -> impl Future<Output = Result<u64, Error>> + Send;

    /// Expands a reminder into schedule rows for its future occurrences.
    fn expand(
        &self,
        reminder: &MedicineReminder,
    ) -> impl Future<Output = Result<u64, Error>> + Send;

    /// Removes every row carried under a reminder name, sent or not.
    fn remove_all(
        &self,
        user_id: String,
        reminder_key: String,
    ) -> impl Future<Output = Result<u64, Error>> + Send;
}

impl ScheduleEffects for AppState<State> {
    async fn purge(
        &self,
        user_id: String,
        reminder_key: String,
    ) -> Result<u64, Error> {
        expansion::purge_previous(self, user_id, reminder_key).await
    }

    async fn expand(&self, reminder: &MedicineReminder) -> Result<u64, Error> {
        expansion::create_expansion(self, reminder).await
    }

    async fn remove_all(
        &self,
        user_id: String,
        reminder_key: String,
    ) -> Result<u64, Error> {
        expansion::delete_expansion(self, user_id, reminder_key).await
    }
}

/// Registers (or refreshes) a browser push endpoint for a user.
pub async fn register_subscription(
    app_state: &AppState<State>,
    user_id: String,
    subscription: SubscriptionData,
) -> Result<PushSubscription, Error> {
    let sub = app_state
        .database
        .push_subscription
        .upsert_by_endpoint(subscription, user_id)
        .await?;

    Ok(sub)
}

/// Saves a new reminder and expands it into schedule rows.
pub async fn create_reminder(
    app_state: &AppState<State>,
    user_id: String,
    reminder: NewMedicineReminder,
) -> Result<MedicineReminder, Error> {
    let saved = app_state
        .database
        .medicine_reminder
        .insert(user_id, reminder)
        .await?;

    if let Err(e) = app_state.expand(&saved).await {
        error!(
            "Expansion failed for new reminder {} (user {}): {}",
            saved.name, saved.user_id, e
        );
    }

    Ok(saved)
}

pub async fn list_reminders(
    app_state: &AppState<State>,
    user_id: String,
) -> Result<Vec<MedicineReminder>, Error> {
    let reminders = app_state
        .database
        .medicine_reminder
        .get_by_user(user_id)
        .await?;

    Ok(reminders)
}

/// The scheduling protocol of an edit: purge the future unsent rows tied
/// to the previous name, persist through `persist`, then re-expand under
/// the new definition. Scheduling failures are logged, never surfaced.
///
/// The purge and the re-expansion are separate statements with the
/// persist in between; a crash in that window leaves the reminder
/// under-scheduled until it is edited again.
async fn apply_edit<S, F, Fut>(
    effects: &S,
    previous: &MedicineReminder,
    persist: F,
) -> Result<Option<MedicineReminder>, Error>
where
    S: ScheduleEffects,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<MedicineReminder>, Error>>,
{
    if let Err(e) = effects
        .purge(previous.user_id.to_owned(), previous.name.to_owned())
        .await
    {
        error!(
            "Failed to purge stale schedules for reminder {} (user {}): {}",
            previous.name, previous.user_id, e
        );
    }

    let Some(updated) = persist().await? else {
        return Ok(None);
    };

    if let Err(e) = effects.expand(&updated).await {
        error!(
            "Expansion failed for updated reminder {} (user {}): {}",
            updated.name, updated.user_id, e
        );
    }

    Ok(Some(updated))
}

/// Applies an edit: purge the future unsent rows tied to the previous
/// name, persist the update, then re-expand under the new definition.
pub async fn update_reminder(
    app_state: &AppState<State>,
    id: i64,
    user_id: String,
    update: NewMedicineReminder,
) -> Result<Option<MedicineReminder>, Error> {
    let existing = app_state
        .database
        .medicine_reminder
        .get_by_id(id, user_id.to_owned())
        .await?;

    let Some(existing) = existing else {
        return Ok(None);
    };

    apply_edit(app_state, &existing, move || async move {
        Ok(app_state
            .database
            .medicine_reminder
            .update(id, user_id, update)
            .await?)
    })
    .await
}

/// Cleans up the schedule rows of a deleted reminder. Cleanup failures
/// are logged and reported as zero rows removed.
async fn cleanup_after_delete<S: ScheduleEffects>(
    effects: &S,
    deleted: &MedicineReminder,
) -> u64 {
    match effects
        .remove_all(deleted.user_id.to_owned(), deleted.name.to_owned())
        .await
    {
        Ok(removed) => removed,
        Err(e) => {
            error!(
                "Schedule cleanup failed for deleted reminder {} (user {}): {}",
                deleted.name, deleted.user_id, e
            );
            0
        },
    }
}

/// Deletes a reminder and all of its schedule rows. Returns the removed
/// schedule count, or None when the reminder does not exist.
pub async fn delete_reminder(
    app_state: &AppState<State>,
    id: i64,
    user_id: String,
) -> Result<Option<u64>, Error> {
    let deleted = app_state
        .database
        .medicine_reminder
        .delete(id, user_id)
        .await?;

    let Some(deleted) = deleted else {
        return Ok(None);
    };

    let removed = cleanup_after_delete(app_state, &deleted).await;

    Ok(Some(removed))
}
