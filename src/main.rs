use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use once_cell::sync::Lazy;
use portfolio_contact::{
    background_task::start_eviction_task,
    constants::START_TIME,
    graceful_shutdown::run_until_shutdown,
    middlewares::cors::CorsHeaders,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    Lazy::force(&START_TIME);

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Failed to initialise application state: {:#}", e);
            std::process::exit(1);
        }
    };

    tokio::spawn(start_eviction_task(
        app_state.contact_handler.rate_limiter.clone(),
        config.rate_limit_eviction_interval(),
    ));

    let server_addr = format!("{}:{}", config.host, config.port);
    let cors = CorsHeaders::new(config.cors_origin());

    tracing::info!(
        "🚀 Starting {} v{} on {} (captcha {})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        if config.captcha_enabled() { "enabled" } else { "disabled" },
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(cors.clone())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(server_addr)?
    .run();

    run_until_shutdown(server).await
}
