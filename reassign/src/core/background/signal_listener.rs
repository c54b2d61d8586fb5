use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::err::{ReassignError, ReassignResult};

/// Cancels `cancel` on SIGINT or SIGTERM. Runs until a signal arrives or
/// `shutdown` is cancelled by the job owner.
pub fn signal_listener_task(
    cancel: CancellationToken,
    shutdown: CancellationToken,
) -> JoinHandle<ReassignResult<()>> {
    tokio::spawn(async move {
        tokio::select! {
            res = wait_for_signal() => {
                let signal = res?;
                tracing::warn!(signal, "interrupt received, stopping after the current batch");
                cancel.cancel();
            }
            _ = shutdown.cancelled() => {}
        }
        Ok(())
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> ReassignResult<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| ReassignError::Listener(format!("error building signal stream: {}", e)))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| ReassignError::Listener(format!("error building signal stream: {}", e)))?;
    tokio::select! {
        _ = sigint.recv() => Ok("sigint"),
        _ = sigterm.recv() => Ok("sigterm"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> ReassignResult<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| ReassignError::Listener(format!("error listening for ctrl-c: {}", e)))?;
    Ok("ctrl-c")
}
