/// Resolves on Ctrl-C, or SIGTERM on unix.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("cannot listen for SIGTERM: {e}");
            wait_ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = wait_ctrl_c() => {},
        _ = terminate.recv() => {},
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() {
    wait_ctrl_c().await;
}

async fn wait_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
