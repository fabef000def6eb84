use actix_web::web;

use crate::constants::MAX_BODY_BYTES;

/// Raw body reads are capped; anything larger is answered with 413.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES));
}
