// Signal handling module
//
// - SIGTERM: stop serving
// - SIGINT:  stop serving (Ctrl+C)

/// Resolves once the process is asked to stop
///
/// If a handler cannot be registered, that signal is simply not watched and
/// default OS behavior applies.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            log::warn!("Failed to register SIGTERM handler: {e}");
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => log::info!("[SIGNAL] SIGTERM received"),
        () = wait_for_ctrl_c() => log::info!("[SIGNAL] SIGINT received"),
    }
}

/// Resolves once the process is asked to stop
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    wait_for_ctrl_c().await;
    log::info!("[SIGNAL] Ctrl+C received");
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to register Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}
