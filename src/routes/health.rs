use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use std::time::Instant;

/// Moment the process started serving, used to report uptime.
#[derive(Debug, Clone, Copy)]
pub struct StartTime(pub Instant);

impl StartTime {
    pub fn now() -> Self {
        Self(Instant::now())
    }
}

/// Health check endpoint
///
/// Returns `OK`, the current timestamp and the uptime in seconds.
#[get("/health")]
pub async fn health(started: web::Data<StartTime>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "uptime": started.0.elapsed().as_secs_f64(),
    }))
}
