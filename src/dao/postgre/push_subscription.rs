use super::QueryResult;
use crate::model::{NewPushSubscription, PushSubscription, Table};
use sqlx::error::Error;

impl Table<PushSubscription> {
    /// Upsert keyed on the unique endpoint. A repeat subscribe for the
    /// same endpoint is a no-op; `rows_affected` is 0 in that case.
    pub async fn insert(
        &self,
        subscription: NewPushSubscription,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "push_subscriptions" (endpoint, public_key, auth_token, content_encoding)
            VALUES($1, $2, $3, $4)
            ON CONFLICT (endpoint) DO NOTHING
            "#,
        )
        .bind(&subscription.endpoint)
        .bind(&subscription.public_key)
        .bind(&subscription.auth_token)
        .bind(subscription.content_encoding.to_string())
        .execute(&self.pool)
        .await
    }

    pub async fn get_all(&self) -> Result<Vec<PushSubscription>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM "push_subscriptions" ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Physical delete; removing an absent endpoint is not an error.
    pub async fn delete_by_endpoint(
        &self,
        endpoint: String,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM "push_subscriptions" WHERE endpoint=$1
            "#,
        )
        .bind(endpoint)
        .execute(&self.pool)
        .await
    }
}
