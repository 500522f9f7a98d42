use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::ContentEncoding;

/// One stored browser/device push channel.
#[derive(Debug, Clone, FromRow)]
pub struct PushSubscription {
    pub id: i32,
    pub endpoint: String,
    pub public_key: String,
    pub auth_token: String,
    pub content_encoding: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated record ready for insertion; ids and timestamps are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewPushSubscription {
    pub endpoint: String,
    pub public_key: String,
    pub auth_token: String,
    pub content_encoding: ContentEncoding,
}
