use std::future::pending;

use tokio::signal;

/// Resolves on Ctrl+C or SIGTERM so the server can drain in-flight grading
/// requests before exiting.
pub(crate) async fn shutdown_signal() {
    let received = tokio::select! {
        _ = interrupt() => "interrupt",
        _ = terminate() => "terminate",
    };

    tracing::info!(signal = received, "Shutdown signal received");
}

async fn interrupt() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to listen for SIGTERM");
            pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    pending::<()>().await;
}
