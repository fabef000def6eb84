use actix_web::{http::Method, web};

use crate::handlers::contact_me;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(contact_me::submit_contact))
            .route(web::method(Method::OPTIONS).to(contact_me::contact_preflight))
            .default_service(web::to(contact_me::method_not_allowed))
    );
}
