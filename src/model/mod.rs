//! Database models module

mod models;
mod table;

pub use models::{
    MedicineReminder, NewMedicineReminder, NewReminderSchedule,
    PushSubscription, ReminderSchedule,
};
pub use table::Table;
