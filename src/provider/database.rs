use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{MedicineReminder, PushSubscription, ReminderSchedule, Table},
};

#[derive(Debug)]
pub struct DatabasePool {
    pub push_subscription: Table<PushSubscription>,
    pub reminder_schedule: Table<ReminderSchedule>,
    pub medicine_reminder: Table<MedicineReminder>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(20)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool {
            push_subscription: Table::new(pool.clone()),
            reminder_schedule: Table::new(pool.clone()),
            medicine_reminder: Table::new(pool.clone()),
            pool,
        })
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }
}
