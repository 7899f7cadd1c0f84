use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn install_panic_hook(instance_id: Uuid) {
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "autoprime", event = "panic", %instance_id, message = %info, "unhandled panic");
    }));
}

/// Multi-threaded runtime; without `server.worker_threads` tokio falls back to
/// `TOKIO_WORKER_THREADS` or the core count.
fn build_runtime(cfg: &AppConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

fn main() -> ExitCode {
    dotenv().ok();
    server::startup::init_logging();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "autoprime", event = "config_invalid", error = format!("{e:#}"), "refusing to start");
            return ExitCode::FAILURE;
        }
    };

    let instance_id = Uuid::new_v4();
    install_panic_hook(instance_id);

    let rt = match build_runtime(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "autoprime", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "autoprime",
        event = "start",
        %instance_id,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        backend = ?cfg.store.backend,
        "inventory service starting"
    );

    match rt.block_on(server::run(cfg, server::startup::shutdown_signal())) {
        Ok(()) => {
            info!(service = "autoprime", event = "stop", %instance_id, "stopped cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "autoprime", event = "run_failed", %instance_id, error = format!("{e:#}"), "server exited with error");
            ExitCode::FAILURE
        }
    }
}
