use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{
    append_shutdown_log, backend_launch,
    lifecycle::{Launcher, ShutdownDecision},
    main_window::TauriWindowHost,
    BackendState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitRequestDecision {
    /// An explicit `exit(code)`, including the launcher's own quit call.
    AllowExit(i32),
    /// The last window closed; the launcher decides whether to quit.
    AllWindowsClosed,
}

fn decide_exit_request(code: Option<i32>) -> ExitRequestDecision {
    match code {
        Some(code) => ExitRequestDecision::AllowExit(code),
        None => ExitRequestDecision::AllWindowsClosed,
    }
}

pub(crate) fn handle_exit_requested(
    app_handle: &AppHandle,
    code: Option<i32>,
    api: &ExitRequestApi,
) {
    match decide_exit_request(code) {
        ExitRequestDecision::AllowExit(code) => {
            append_shutdown_log(&format!("exit requested with code {code}"));
        }
        ExitRequestDecision::AllWindowsClosed => {
            // The launcher issues its own exit call when the platform should quit.
            api.prevent_exit();
            let launcher = app_handle.state::<Launcher>();
            let host = TauriWindowHost::new(app_handle, append_shutdown_log);
            if launcher.on_all_windows_closed(&host, append_shutdown_log)
                == ShutdownDecision::StayResident
            {
                append_shutdown_log("process remains resident with zero windows");
            }
        }
    }
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let state = app_handle.state::<BackendState>();
    backend_launch::stop_backend(&state, append_shutdown_log);
    append_shutdown_log("desktop process exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decide_exit_request_treats_missing_code_as_all_windows_closed() {
        assert_eq!(
            decide_exit_request(None),
            ExitRequestDecision::AllWindowsClosed
        );
    }

    #[test]
    fn decide_exit_request_allows_explicit_exit_codes() {
        assert_eq!(decide_exit_request(Some(0)), ExitRequestDecision::AllowExit(0));
        assert_eq!(decide_exit_request(Some(1)), ExitRequestDecision::AllowExit(1));
    }
}
