use chrono::{DateTime, Utc};
use sqlx::error::Error;

use crate::model::{NewReminderSchedule, ReminderSchedule, Table};

impl Table<ReminderSchedule> {
    /// Bulk-creates the rows produced by one expansion run.
    pub async fn insert_many(
        &self,
        rows: Vec<NewReminderSchedule>,
    ) -> Result<u64, Error> {
        const SQL: &str = r#"
        INSERT INTO "reminder_schedule" (
            "title",
            "body",
            "icon",
            "time",
            "subscription_id",
            "user_id",
            "reminder_key"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        let mut inserted = 0;

        for row in rows {
            sqlx::query(SQL)
                .bind(row.title)
                .bind(row.body)
                .bind(row.icon)
                .bind(row.time)
                .bind(row.subscription_id)
                .bind(row.user_id)
                .bind(row.reminder_key)
                .execute(&self.pool)
                .await?;
            inserted += 1;
        }

        Ok(inserted)
    }

    /// Purges the future, not-yet-sent obligations of one reminder. Rows
    /// already sent, and rows whose fire time has passed, stay as history.
    pub async fn delete_future_unsent(
        &self,
        user_id: String,
        reminder_key: String,
        now: DateTime<Utc>,
    ) -> Result<u64, Error> {
        const SQL: &str = r#"
        DELETE FROM "reminder_schedule"
        WHERE
            "user_id" = $1 AND
            "reminder_key" = $2 AND
            "sent" = FALSE AND
            "time" > $3
        "#;

        let result = sqlx::query(SQL)
            .bind(user_id)
            .bind(reminder_key)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Full cleanup on reminder deletion: sent and unsent, past and future.
    pub async fn delete_by_reminder_key(
        &self,
        user_id: String,
        reminder_key: String,
    ) -> Result<u64, Error> {
        const SQL: &str = r#"
        DELETE FROM "reminder_schedule"
        WHERE
            "user_id" = $1 AND
            "reminder_key" = $2
        "#;

        let result = sqlx::query(SQL)
            .bind(user_id)
            .bind(reminder_key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Due rows for one dispatch pass. Filtering on `sent = FALSE` is what
    /// makes a repeated pass over the same row a no-op.
    pub async fn get_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReminderSchedule>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "reminder_schedule"
        WHERE
            "time" <= $1 AND
            "sent" = FALSE
        ORDER BY "time" ASC
        "#;

        sqlx::query_as(SQL).bind(now).fetch_all(&self.pool).await
    }

    pub async fn mark_sent(&self, id: i64) -> Result<(), Error> {
        const SQL: &str = r#"
        UPDATE "reminder_schedule"
        SET "sent" = TRUE
        WHERE "id" = $1
        "#;

        sqlx::query(SQL).bind(id).execute(&self.pool).await.map(drop)
    }
}
