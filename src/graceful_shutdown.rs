use std::io;

use actix_web::dev::Server;
use tokio::signal;
use tracing::{error, warn};

/// Resolves on Ctrl+C or SIGTERM. A signal that cannot be installed is logged
/// and simply never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("🛑 Ctrl+C received, draining in-flight requests..."),
        _ = terminate => warn!("🛑 SIGTERM received, draining in-flight requests..."),
    }
}

/// Runs `server` until it exits on its own or a shutdown signal arrives, in
/// which case in-flight requests (and their email sends) are allowed to finish.
pub async fn run_until_shutdown(server: Server) -> io::Result<()> {
    let handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        joined = &mut server_task => joined.map_err(io::Error::other)?,
        _ = shutdown_signal() => {
            handle.stop(true).await;
            tracing::info!("Server stopped");
            Ok(())
        }
    }
}
