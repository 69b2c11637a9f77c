use sqlx::error::Error;

use crate::{
    model::{PushSubscription, Table},
    types::SubscriptionData,
};

impl Table<PushSubscription> {
    /// Registers a browser endpoint for a user. Keyed on endpoint: a
    /// re-registration from the same browser updates the keys and owner
    /// instead of creating a second row.
    pub async fn upsert_by_endpoint(
        &self,
        subscription: SubscriptionData,
        user_id: String,
    ) -> Result<PushSubscription, Error> {
        const SQL: &str = r#"
        INSERT INTO "push_subscription" ("endpoint", "p256dh", "auth", "user_id")
        VALUES ($1, $2, $3, $4)
        ON CONFLICT ("endpoint") DO UPDATE SET
            "p256dh" = EXCLUDED."p256dh",
            "auth" = EXCLUDED."auth",
            "user_id" = EXCLUDED."user_id"
        RETURNING *
        "#;

        sqlx::query_as(SQL)
            .bind(subscription.endpoint)
            .bind(subscription.keys.p256dh)
            .bind(subscription.keys.auth)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Latest registration wins when a user has subscribed from more than
    /// one browser.
    pub async fn get_by_user(
        &self,
        user_id: String,
    ) -> Result<Option<PushSubscription>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "push_subscription"
        WHERE "user_id" = $1
        ORDER BY "created_at" DESC
        LIMIT 1
        "#;

        sqlx::query_as(SQL)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_by_id(
        &self,
        id: i64,
    ) -> Result<Option<PushSubscription>, Error> {
        const SQL: &str = r#"
        SELECT *
        FROM "push_subscription"
        WHERE "id" = $1
        "#;

        sqlx::query_as(SQL).bind(id).fetch_optional(&self.pool).await
    }
}
