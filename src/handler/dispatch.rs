//! Background dispatch pass.
//!
//! Delivers every due, unsent schedule row sequentially. A row whose
//! subscription has vanished is marked sent without a delivery attempt so
//! it cannot wedge the loop; a row whose delivery fails stays unsent and is
//! retried on every later pass, without a cap. That keeps delivery
//! at-least-once rather than at-most-once.

use chrono::Utc;
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::{PushSubscription, ReminderSchedule},
    push::PushClient,
    types::PushPayload,
};

#[derive(Debug, PartialEq)]
enum DispatchOutcome {
    Delivered,
    Undeliverable,
    RetryLater,
}

/// A row is finished by delivery or by being undeliverable; only a
/// transient send failure leaves it due for the next pass.
fn completes_row(outcome: &DispatchOutcome) -> bool {
    matches!(
        outcome,
        DispatchOutcome::Delivered | DispatchOutcome::Undeliverable
    )
}

async fn deliver<C: PushClient>(
    schedule: &ReminderSchedule,
    subscription: Option<&PushSubscription>,
    client: &C,
) -> DispatchOutcome {
    let Some(subscription) = subscription else {
        error!(
            "Schedule {} has no subscription; marking sent to avoid retries",
            schedule.id
        );
        return DispatchOutcome::Undeliverable;
    };

    let payload = PushPayload {
        title: schedule.title.to_owned(),
        body: schedule.body.to_owned(),
        icon: schedule.icon.to_owned(),
    };

    match client.send(subscription, &payload).await {
        Ok(()) => {
            info!(
                "Sent reminder {} to {}",
                schedule.title, subscription.endpoint
            );
            DispatchOutcome::Delivered
        },
        Err(e) => {
            error!(
                "Failed to send schedule {} (will retry next cycle): {}",
                schedule.id, e
            );
            DispatchOutcome::RetryLater
        },
    }
}

/// One dispatch pass over the due, unsent rows.
///
/// Rows are processed one at a time; the selection filter on `sent = FALSE`
/// makes a second pass over the same rows a no-op.
pub async fn process_due(app_state: &AppState<State>) -> Result<(), Error> {
    let now = Utc::now();
    let due = app_state.database.reminder_schedule.get_due(now).await?;

    for schedule in due {
        let subscription = app_state
            .database
            .push_subscription
            .get_by_id(schedule.subscription_id)
            .await?;

        let outcome =
            deliver(&schedule, subscription.as_ref(), &app_state.push).await;

        if completes_row(&outcome) {
            app_state
                .database
                .reminder_schedule
                .mark_sent(schedule.id)
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone};
    use std::sync::Mutex;

    struct StubClient {
        fail: bool,
        calls: Mutex<Vec<PushPayload>>,
    }

    impl StubClient {
        fn new(fail: bool) -> StubClient {
            StubClient {
                fail,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl PushClient for StubClient {
        async fn send(
            &self,
            _subscription: &PushSubscription,
            payload: &PushPayload,
        ) -> Result<(), Error> {
            self.calls.lock().unwrap().push(payload.clone());
            if self.fail {
                Err(Error::PushRejected(410))
            } else {
                Ok(())
            }
        }
    }

    fn ts(h: u32, min: u32) -> DateTime<Utc> {
        let naive = NaiveDate::from_ymd_opt(2025, 6, 5)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap();
        Utc.from_utc_datetime(&naive)
    }

    fn schedule() -> ReminderSchedule {
        ReminderSchedule {
            id: 1,
            title: String::from("Aspirin"),
            body: String::from("Time to take your medicine: Aspirin"),
            icon: String::from("/images/medtrax-logo.png"),
            time: ts(9, 0),
            subscription_id: 42,
            user_id: Some(String::from("user-1")),
            reminder_key: String::from("Aspirin"),
            sent: false,
            created_at: ts(0, 0),
        }
    }

    fn subscription() -> PushSubscription {
        PushSubscription {
            id: 42,
            endpoint: String::from("https://push.example/ep"),
            p256dh: String::from("p256dh-key"),
            auth: String::from("auth-key"),
            user_id: String::from("user-1"),
            created_at: ts(0, 0),
        }
    }

    #[tokio::test]
    async fn successful_delivery_invokes_client_once_and_completes() {
        let client = StubClient::new(false);
        let row = schedule();
        let sub = subscription();

        let outcome = deliver(&row, Some(&sub), &client).await;

        assert_eq!(outcome, DispatchOutcome::Delivered);
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].title, "Aspirin");
        assert_eq!(calls[0].body, "Time to take your medicine: Aspirin");
        assert_eq!(calls[0].icon, "/images/medtrax-logo.png");
    }

    #[tokio::test]
    async fn failed_delivery_is_left_for_the_next_pass() {
        let client = StubClient::new(true);
        let row = schedule();
        let sub = subscription();

        let outcome = deliver(&row, Some(&sub), &client).await;

        assert_eq!(outcome, DispatchOutcome::RetryLater);
        assert_eq!(client.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_subscription_completes_without_a_send_attempt() {
        let client = StubClient::new(false);
        let row = schedule();

        let outcome = deliver(&row, None, &client).await;

        assert_eq!(outcome, DispatchOutcome::Undeliverable);
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn only_retry_later_leaves_a_row_unsent() {
        assert!(completes_row(&DispatchOutcome::Delivered));
        assert!(completes_row(&DispatchOutcome::Undeliverable));
        assert!(!completes_row(&DispatchOutcome::RetryLater));
    }
}
