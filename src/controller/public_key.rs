use actix_web::{get, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

/// The client fetches this before subscribing; an empty key means the
/// operator has not configured VAPID yet and the client refuses to init.
#[get("/push_public_key")]
pub async fn index(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(Response {
        public_key: state.config.public_key_string(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "publicKey")]
    pub public_key: String,
}
