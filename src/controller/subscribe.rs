use actix_web::{post, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    types::SubscribeRequest,
};

#[post("/push_subscribe")]
pub async fn index(
    state: web::Data<AppState<State>>,
    subscription: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, Error> {
    let record = subscription.into_inner().into_record()?;
    let endpoint = record.endpoint.to_owned();

    // Upsert on the unique endpoint; a repeat subscribe is a no-op.
    let result = state.database.push_subscription.insert(record).await?;

    if result.rows_affected() == 0 {
        tracing::info!("Endpoint already subscribed: {}", endpoint);
    } else {
        tracing::info!("New subscription: {}", endpoint);
    }

    Ok(HttpResponse::Ok().json(Response {
        status: String::from("success"),
        message: String::from("User subscribed for push notifications"),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    pub message: String,
}
