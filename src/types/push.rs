//! Push notification types
//!
//! Shapes exchanged with the browser push stack: the subscription payload a
//! service worker registers, the notification payload shown to the user, and
//! the Web Push protocol headers.

use serde::{Deserialize, Serialize};
use std::{fmt, io, str::FromStr};

#[derive(Debug, Clone)]
pub struct PushHeader {
    pub ttl: i64,
    pub urgency: Urgency,
}

/// What the service worker renders. Serialized to JSON before encryption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
}

#[derive(Debug, Clone)]
pub enum Urgency {
    VeryLow,
    Low,
    Normal,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Urgency::VeryLow => write!(f, "very-low"),
            Urgency::Low => write!(f, "low"),
            Urgency::Normal => write!(f, "normal"),
            Urgency::High => write!(f, "high"),
        }
    }
}

impl FromStr for Urgency {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<Urgency, Self::Err> {
        match value {
            "very-low" => Ok(Urgency::VeryLow),
            "low" => Ok(Urgency::Low),
            "normal" => Ok(Urgency::Normal),
            "high" => Ok(Urgency::High),
            _ => Err(io::Error::other("Urgency not supported")),
        }
    }
}

/// Lifecycle of a recurring medicine reminder. Flips active -> completed
/// once the end date has elapsed, never back.
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderStatus {
    Active,
    Completed,
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReminderStatus::Active => write!(f, "active"),
            ReminderStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ReminderStatus {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<ReminderStatus, Self::Err> {
        match value {
            "active" => Ok(ReminderStatus::Active),
            "completed" => Ok(ReminderStatus::Completed),
            _ => Err(io::Error::other("ReminderStatus not supported")),
        }
    }
}

/// Subscription object as produced by `PushManager.subscribe` in the browser.
#[derive(Debug, Deserialize)]
pub struct SubscriptionData {
    pub endpoint: String,
    #[serde(alias = "expirationTime")]
    pub expiration_time: Option<i64>,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String,
    pub sub: String,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_to_notification_shape() {
        let payload = PushPayload {
            title: String::from("Aspirin"),
            body: String::from("Time to take your medicine: Aspirin"),
            icon: String::from("/images/medtrax-logo.png"),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "Aspirin");
        assert_eq!(json["body"], "Time to take your medicine: Aspirin");
        assert_eq!(json["icon"], "/images/medtrax-logo.png");
    }

    #[test]
    fn urgency_round_trips_through_display() {
        for value in ["very-low", "low", "normal", "high"] {
            let urgency: Urgency = value.parse().unwrap();
            assert_eq!(urgency.to_string(), value);
        }
    }

    #[test]
    fn status_round_trips_through_display() {
        for value in ["active", "completed"] {
            let status: ReminderStatus = value.parse().unwrap();
            assert_eq!(status.to_string(), value);
        }
        assert!("archived".parse::<ReminderStatus>().is_err());
    }
}
