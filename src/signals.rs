// src/signals.rs

//! Termination-signal listener.
//!
//! Sets the shared shutdown flag on SIGINT/SIGTERM/SIGQUIT and keeps
//! listening so repeat signals are absorbed. It never resets the flag and
//! never terminates the process itself — termination belongs to the drain
//! controller.

use std::sync::Arc;

use tracing::{error, info};

use crate::engine::RunnerState;

/// Spawn the background listener task.
pub fn spawn_signal_listener(state: Arc<RunnerState>) {
    tokio::spawn(async move {
        if let Err(err) = listen(state).await {
            error!(error = %err, "signal listener failed to register");
        }
    });
}

#[cfg(unix)]
async fn listen(state: Arc<RunnerState>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    loop {
        let name = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
            _ = sigquit.recv() => "SIGQUIT",
        };
        info!("caught termination signal {name}, scheduling shutdown");
        state.request_shutdown();
    }
}

#[cfg(not(unix))]
async fn listen(state: Arc<RunnerState>) -> std::io::Result<()> {
    loop {
        tokio::signal::ctrl_c().await?;
        info!("caught ctrl-c, scheduling shutdown");
        state.request_shutdown();
    }
}
