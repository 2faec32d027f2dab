use tauri::{AppHandle, Manager};

use crate::{
    lifecycle::{ActivateOutcome, Launcher},
    main_window::{self, TauriWindowHost},
};

/// Routes a platform activate (dock click, second launch) through the
/// launcher and brings whatever is open to the front.
pub fn activate_app(app_handle: &AppHandle, log: fn(&str)) {
    let launcher = app_handle.state::<Launcher>();
    let host = TauriWindowHost::new(app_handle, log);
    match launcher.on_activate(&host, log) {
        ActivateOutcome::WindowsAlreadyOpen => main_window::focus_windows(app_handle, log),
        ActivateOutcome::WindowCreated
        | ActivateOutcome::WindowCreationFailed
        | ActivateOutcome::IgnoredBeforeReady => {}
    }
}

pub fn open_initial_window(app_handle: &AppHandle, log: fn(&str)) {
    let launcher = app_handle.state::<Launcher>();
    let host = TauriWindowHost::new(app_handle, log);
    launcher.on_ready(&host, log);
}
