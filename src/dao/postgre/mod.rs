pub use self::{
    path::get_path,
    types::{DBRow, DataBase, PoolOption, PoolType, QueryResult},
};

mod medicine_reminder;
mod path;
mod push_subscription;
mod reminder_schedule;
mod types;
