use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};
use url::Url;

use crate::{
    lifecycle::{WindowHost, WindowSpec},
    WindowLabels,
};

/// [`WindowHost`] backed by the running Tauri application.
pub(crate) struct TauriWindowHost<'a> {
    app_handle: &'a AppHandle,
    log: fn(&str),
}

impl<'a> TauriWindowHost<'a> {
    pub(crate) fn new(app_handle: &'a AppHandle, log: fn(&str)) -> Self {
        Self { app_handle, log }
    }
}

impl WindowHost for TauriWindowHost<'_> {
    fn open_window_count(&self) -> usize {
        self.app_handle.webview_windows().len()
    }

    fn create_window(&self, spec: &WindowSpec) -> Result<(), String> {
        // No capability targets the remote origin, so the page never gets IPC.
        if spec.host_integration {
            return Err("host integration is not available to remote content".to_string());
        }

        let label = self.app_handle.state::<WindowLabels>().next_label();
        let window = WebviewWindowBuilder::new(
            self.app_handle,
            &label,
            WebviewUrl::External(spec.url.clone()),
        )
        .title(spec.title)
        .inner_size(spec.width, spec.height)
        .build()
        .map_err(|error| format!("Failed to build window {label}: {error}"))?;

        if !spec.menu_bar_visible {
            if let Err(error) = window.hide_menu() {
                (self.log)(&format!("failed to hide menu bar for {label}: {error}"));
            }
        }

        (self.log)(&format!("created window {label} -> {}", spec.url));
        Ok(())
    }

    fn quit(&self) {
        self.app_handle.exit(0);
    }
}

pub(crate) fn focus_windows<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    for (label, window) in app_handle.webview_windows() {
        if let Err(error) = window.unminimize() {
            log(&format!("failed to unminimize {label}: {error}"));
        }
        if let Err(error) = window.show() {
            log(&format!("failed to show {label}: {error}"));
        }
        if let Err(error) = window.set_focus() {
            log(&format!("failed to focus {label}: {error}"));
        }
    }
}

pub(crate) fn navigate_windows_to_backend<F>(app_handle: &AppHandle, backend_url: &Url, log: F)
where
    F: Fn(&str),
{
    for (label, window) in app_handle.webview_windows() {
        match window.navigate(backend_url.clone()) {
            Ok(()) => log(&format!("navigated {label} to {backend_url}")),
            Err(error) => log(&format!("failed to navigate {label}: {error}")),
        }
    }
}
