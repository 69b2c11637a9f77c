pub mod dispatch;
pub mod expansion;
pub mod reminders;
pub mod sweeper;
