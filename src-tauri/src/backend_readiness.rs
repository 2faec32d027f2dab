use std::{
    net::TcpStream,
    thread,
    time::{Duration, Instant},
};

use url::Url;

use crate::{BackendState, BACKEND_PING_TIMEOUT_MS, BACKEND_POLL_INTERVAL_MS};

pub(crate) fn ping_backend(backend_url: &Url, timeout_ms: u64) -> bool {
    let timeout = Duration::from_millis(timeout_ms.max(50));
    backend_url
        .socket_addrs(|| Some(80))
        .map(|addrs| {
            addrs
                .iter()
                .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
        })
        .unwrap_or(false)
}

/// Reaps the tracked child if it already exited. An unmanaged backend has no
/// child to watch, so only the port tells whether it is up.
fn ensure_child_running(state: &BackendState) -> Result<(), String> {
    let mut guard = state
        .child
        .lock()
        .map_err(|_| "Backend process lock poisoned.".to_string())?;
    let Some(child) = guard.as_mut() else {
        return if state.is_managed() {
            Err("Backend process is not running.".to_string())
        } else {
            Ok(())
        };
    };

    match child.try_wait() {
        Ok(None) => Ok(()),
        Ok(Some(status)) => {
            *guard = None;
            Err(format!(
                "Backend process exited before becoming reachable: {status}"
            ))
        }
        Err(error) => Err(format!("Failed to poll backend process status: {error}")),
    }
}

/// Polls until the backend accepts connections. Fails early when the tracked
/// child exits, and after `timeout` when one is given.
pub(crate) fn wait_for_backend(
    state: &BackendState,
    timeout: Option<Duration>,
    poll_interval: Duration,
) -> Result<Duration, String> {
    let start_time = Instant::now();

    while !ping_backend(&state.backend_url, BACKEND_PING_TIMEOUT_MS) {
        ensure_child_running(state)?;

        let elapsed = start_time.elapsed();
        if timeout.is_some_and(|limit| elapsed >= limit) {
            return Err(format!(
                "Timed out after {}ms waiting for backend startup.",
                elapsed.as_millis()
            ));
        }
        thread::sleep(poll_interval);
    }

    Ok(start_time.elapsed())
}

pub(crate) fn default_poll_interval() -> Duration {
    Duration::from_millis(BACKEND_POLL_INTERVAL_MS)
}
