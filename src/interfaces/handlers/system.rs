use actix_web::{web, get, HttpResponse, Responder};
use humantime::format_duration;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{constants::START_TIME, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub uptime: String,
    pub started_at: String,
    pub timestamp: String,
    pub version: String,
    pub captcha_enabled: bool,
    pub tracked_clients: usize,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy".to_string(),
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        started_at: START_TIME.to_rfc3339(),
        timestamp: now_utc.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        captcha_enabled: state.contact_handler.captcha_enabled(),
        tracked_clients: state.contact_handler.rate_limiter.tracked_clients(),
    })
}
