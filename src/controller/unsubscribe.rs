use actix_web::{post, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    types::UnsubscribeRequest,
};

#[post("/push_unsubscribe")]
pub async fn index(
    state: web::Data<AppState<State>>,
    request: web::Json<UnsubscribeRequest>,
) -> Result<HttpResponse, Error> {
    let endpoint = request.into_inner().into_endpoint()?;

    // Deleting an endpoint that was never stored still succeeds.
    let result = state
        .database
        .push_subscription
        .delete_by_endpoint(endpoint.to_owned())
        .await?;

    tracing::info!(
        "Unsubscribe {}: {} row(s) removed",
        endpoint,
        result.rows_affected()
    );

    Ok(HttpResponse::Ok().json(Response {
        status: String::from("success"),
        message: String::from("User unsubscribed from push notifications"),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    pub message: String,
}
