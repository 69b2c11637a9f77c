mod push;

pub use push::{
    Claims, PushHeader, PushPayload, ReminderStatus, SubscriptionData,
    SubscriptionKeys, Urgency,
};
