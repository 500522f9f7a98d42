use actix_web::{route, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::send_push,
};

/// Admin trigger for the fan-out. GET is kept alongside POST so the send
/// can be fired from a browser address bar.
#[route("/push_send", method = "GET", method = "POST")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    let summary = send_push::send_to_all(
        state.as_ref().clone(),
        send_push::default_payload(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(Response {
        status: String::from("success"),
        message: String::from("Push notification sent"),
        sent: summary.sent,
        failed: summary.failed,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    pub message: String,
    pub sent: usize,
    pub failed: usize,
}
