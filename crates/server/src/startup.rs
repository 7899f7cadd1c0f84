use std::{future::Future, net::SocketAddr};

use common::utils::logging::{init_logging_default, init_logging_json};
use configs::{AppConfig, ServerConfig};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{cars::CarService, runtime};

/// `LOG_FORMAT=json` switches to structured output.
pub fn init_logging() {
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", server.host, server.port)))
}

/// Open the configured store and wrap it in handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let store = runtime::open_store(cfg)
        .await
        .map_err(|e| StartupError::Store(format!("{e:#}")))?;
    Ok(AppState::new(CarService::new(store)))
}

/// Resolves on Ctrl+C. If the signal cannot be installed it never resolves.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, draining requests"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

/// Serve the router on `listener` until `shutdown` resolves, then let
/// in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = routes::build_router(state, build_cors());
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: open the store named by `cfg` and serve HTTP until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    match state.cars.count().await {
        Ok(n) => info!(carros = n, backend = state.cars.backend(), "inventory loaded"),
        Err(e) => warn!(error = %e, backend = state.cars.backend(), "inventory not reachable at startup"),
    }

    let listener = TcpListener::bind(bind_addr(&cfg.server)?).await?;
    info!(addr = %listener.local_addr()?, "starting inventory server");
    serve(listener, state, shutdown).await?;
    info!("inventory server stopped");
    Ok(())
}
