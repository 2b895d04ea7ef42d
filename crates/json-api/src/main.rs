//! Reprice JSON API Server

use std::process;

use salvo::{affix_state::inject, cors::Cors, oapi::OpenApi, prelude::*, trailing_slash::remove_slash};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{config::ServerConfig, state::State};

mod config;
mod extensions;
mod healthcheck;
mod plans;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Reprice JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::shared()))
        .push(router::app_router());

    let doc = OpenApi::new("Reprice API", "0.1.0").merge_router(&router);

    let router = router.push(doc.into_router("/api-doc/openapi.json"));

    // Browser front-ends call the API cross-origin, mirror that openness.
    let cors = Cors::permissive().into_handler();
    let service = Service::new(router).hoop(cors);

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(service).await;
}
