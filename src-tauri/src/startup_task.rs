use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, backend_launch, backend_readiness, main_window, BackendState,
    BACKEND_PING_TIMEOUT_MS,
};

/// Starts the configured backend off the main thread and points open windows
/// at it once it answers. Does nothing for an unmanaged backend.
pub(crate) fn spawn_startup_task<F>(app_handle: AppHandle, log: F)
where
    F: Fn(&str) + Send + Copy + 'static,
{
    {
        let state = app_handle.state::<BackendState>();
        if !state.is_managed() {
            log(&format!(
                "backend is not managed by the shell; expecting it at {}",
                state.backend_url
            ));
            return;
        }
    }

    tauri::async_runtime::spawn_blocking(move || {
        let state = app_handle.state::<BackendState>();
        if backend_readiness::ping_backend(&state.backend_url, BACKEND_PING_TIMEOUT_MS) {
            log(&format!("backend already reachable at {}", state.backend_url));
            return;
        }

        match backend_launch::start_backend_process(&state) {
            Ok(true) => log("backend process spawned"),
            Ok(false) => log("backend process already tracked; waiting for it"),
            Err(error) => {
                log(&format!("failed to start backend: {error}"));
                return;
            }
        }

        let timeout = state.launch_plan.as_ref().and_then(|plan| plan.timeout);
        match backend_readiness::wait_for_backend(
            &state,
            timeout,
            backend_readiness::default_poll_interval(),
        ) {
            Ok(elapsed) => {
                log(&format!(
                    "backend reachable at {} after {}ms",
                    state.backend_url,
                    elapsed.as_millis()
                ));
                let backend_url = state.backend_url.clone();
                let dispatch_handle = app_handle.clone();
                if let Err(error) = app_handle.run_on_main_thread(move || {
                    main_window::navigate_windows_to_backend(
                        &dispatch_handle,
                        &backend_url,
                        append_desktop_log,
                    );
                }) {
                    log(&format!("failed to dispatch window reload: {error}"));
                }
            }
            Err(error) => log(&format!("backend did not become ready: {error}")),
        }
    });
}
