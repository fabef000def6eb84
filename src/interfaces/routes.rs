use actix_web::web;

use crate::handlers::home::home;

mod contact;
mod system;
mod body_limit;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.configure(system::config_routes);

    cfg.service(
        web::scope("/api")
            .configure(contact::config_routes)
    );

    cfg.configure(body_limit::config_routes);
}
