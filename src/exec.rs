//! Running the wrapped program once configuration is in place.
//!
//! The launcher stays alive as the program's parent so it can forward the
//! container's shutdown request: on SIGINT or SIGTERM the child gets SIGINT,
//! then a grace period, then SIGKILL.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::error::UdlError;

/// Exit code reported when the child ended without one (killed by a signal).
pub const NO_EXIT_CODE: i32 = 1;

/// Start `program` with `args`, inheriting stdio, and wait for it.
///
/// Returns the child's exit code.
pub async fn run(program: &str, args: &[String], kill_delay: Duration) -> Result<i32, UdlError> {
    let mut child = Command::new(program)
        .args(args)
        .spawn()
        .map_err(|e| UdlError::Spawn {
            program: program.to_string(),
            source: e,
        })?;
    info!(program, pid = child.id(), "Started program");

    let finished = tokio::select! {
        status = child.wait() => Some(status),
        _ = shutdown_signal() => None,
    };
    let status = match finished {
        Some(status) => status,
        None => stop(&mut child, kill_delay).await,
    }
    .map_err(|e| UdlError::Wait {
        program: program.to_string(),
        source: e,
    })?;

    let code = status.code().unwrap_or(NO_EXIT_CODE);
    info!(program, code, "Program exited");
    Ok(code)
}

/// Completes when the launcher is asked to stop.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, stopping program"),
        _ = terminate => info!("Received SIGTERM, stopping program"),
    }
}

/// Ask the child to stop, then kill it if it is still running after `kill_delay`.
async fn stop(child: &mut Child, kill_delay: Duration) -> io::Result<ExitStatus> {
    interrupt(child);
    match tokio::time::timeout(kill_delay, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            warn!(
                delay_secs = kill_delay.as_secs_f64(),
                "Program did not stop in time, killing it"
            );
            child.kill().await?;
            child.wait().await
        }
    }
}

#[cfg(unix)]
fn interrupt(child: &mut Child) {
    // `id()` is None once the child has been reaped.
    if let Some(pid) = child.id() {
        // SAFETY: `pid` is our own child and has not been reaped, so the
        // signal cannot reach a recycled process. `kill` touches no memory.
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGINT);
        }
    }
}

#[cfg(not(unix))]
fn interrupt(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        warn!(error = %e, "Failed to stop program");
    }
}
