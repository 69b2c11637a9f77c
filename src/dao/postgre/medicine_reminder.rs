use chrono::{DateTime, Utc};
use sqlx::error::Error;

use crate::{
    model::{MedicineReminder, NewMedicineReminder, Table},
    types::ReminderStatus,
};

impl Table<MedicineReminder> {
    pub async fn insert(
        &self,
        user_id: String,
        reminder: NewMedicineReminder,
    ) -> Result<MedicineReminder, Error> {
        const SQL: &str = r#"
        INSERT INTO "medicine_reminder" (
            "user_id",
            "name",
            "image",
            "start_date",
            "end_date",
            "times",
            "days",
            "notes",
            "status"
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .bind(reminder.name)
            .bind(reminder.image)
            .bind(reminder.start_date)
            .bind(reminder.end_date)
            .bind(reminder.times)
            .bind(reminder.days)
            .bind(reminder.notes)
            .bind(ReminderStatus::Active.to_string())
            .fetch_one(&self.pool)
            .await
    }

    pub async fn update(
        &self,
        id: i64,
        user_id: String,
        reminder: NewMedicineReminder,
    ) -> Result<Option<MedicineReminder>, Error> {
        const SQL: &str = r#"
        UPDATE "medicine_reminder"
        SET
            "name" = $1,
            "image" = $2,
            "start_date" = $3,
            "end_date" = $4,
            "times" = $5,
            "days" = $6,
            "notes" = $7,
            "updated_at" = $8
        WHERE
            "id" = $9 AND
            "user_id" = $10
        RETURNING *
        "#;

        sqlx::query_as(SQL)
            .bind(reminder.name)
            .bind(reminder.image)
            .bind(reminder.start_date)
            .bind(reminder.end_date)
            .bind(reminder.times)
            .bind(reminder.days)
            .bind(reminder.notes)
            .bind(Utc::now())
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Deletes and returns the row so the caller can clean up the schedule
    /// rows that carried its name.
    pub async fn delete(
        &self,
        id: i64,
        user_id: String,
    ) -> Result<Option<MedicineReminder>, Error> {
        const SQL: &str = r#"
        DELETE FROM "medicine_reminder"
        WHERE
            "id" = $1 AND
            "user_id" = $2
        RETURNING *
        "#;

        sqlx::query_as(SQL)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_by_id(
        &self,
        id: i64,
        user_id: String,
    ) -> Result<Option<MedicineReminder>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "medicine_reminder"
        WHERE
            "id" = $1 AND
            "user_id" = $2
        "#;

        sqlx::query_as(SQL)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_by_user(
        &self,
        user_id: String,
    ) -> Result<Vec<MedicineReminder>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "medicine_reminder"
        WHERE "user_id" = $1
        ORDER BY "created_at" DESC
        "#;

        sqlx::query_as(SQL).bind(user_id).fetch_all(&self.pool).await
    }

    /// Completion sweep: closes every active reminder whose window has
    /// fully elapsed. The status predicate makes a repeated run find
    /// nothing, so the sweep is idempotent.
    pub async fn complete_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, Error> {
        const SQL: &str = r#"
        UPDATE "medicine_reminder"
        SET
            "status" = $1,
            "updated_at" = $2
        WHERE
            "end_date" < $3 AND
            "status" = $4
        "#;

        let result = sqlx::query(SQL)
            .bind(ReminderStatus::Completed.to_string())
            .bind(now)
            .bind(now)
            .bind(ReminderStatus::Active.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
