//! Window lifecycle rules for the shell.
//!
//! The launcher reacts to three host signals: ready, activate and
//! all-windows-closed. It never keeps its own window count; every decision
//! reads the host's window registry at the time the event arrives.

use std::sync::atomic::{AtomicBool, Ordering};

use url::Url;

use crate::{MAIN_WINDOW_HEIGHT, MAIN_WINDOW_TITLE, MAIN_WINDOW_WIDTH};

/// Creation-time parameters shared by every shell window.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowSpec {
    pub(crate) url: Url,
    pub(crate) title: &'static str,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) menu_bar_visible: bool,
    /// Whether the loaded page may reach host-process capabilities.
    pub(crate) host_integration: bool,
}

impl WindowSpec {
    pub(crate) fn for_url(url: Url) -> Self {
        Self {
            url,
            title: MAIN_WINDOW_TITLE,
            width: MAIN_WINDOW_WIDTH,
            height: MAIN_WINDOW_HEIGHT,
            menu_bar_visible: false,
            host_integration: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostPlatform {
    /// Apps stay resident after their last window closes.
    MacOs,
    Other,
}

impl HostPlatform {
    pub(crate) const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    pub(crate) const fn quits_when_all_windows_closed(self) -> bool {
        matches!(self, Self::Other)
    }
}

/// The slice of the GUI runtime the launcher drives.
pub(crate) trait WindowHost {
    fn open_window_count(&self) -> usize;
    fn create_window(&self, spec: &WindowSpec) -> Result<(), String>;
    fn quit(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivateOutcome {
    IgnoredBeforeReady,
    WindowsAlreadyOpen,
    WindowCreated,
    WindowCreationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownDecision {
    Quit,
    StayResident,
}

#[derive(Debug)]
pub(crate) struct Launcher {
    spec: WindowSpec,
    platform: HostPlatform,
    ready: AtomicBool,
}

impl Launcher {
    pub(crate) fn new(spec: WindowSpec, platform: HostPlatform) -> Self {
        Self {
            spec,
            platform,
            ready: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Moves to ready and opens the first window. Only the first call has any
    /// effect; returns whether this call performed the transition.
    pub(crate) fn on_ready<H, F>(&self, host: &H, log: F) -> bool
    where
        H: WindowHost + ?Sized,
        F: Fn(&str),
    {
        if self
            .ready
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log("ready signal received again; ignoring");
            return false;
        }

        log(&format!("application ready; opening {}", self.spec.url));
        self.create_window(host, &log);
        true
    }

    pub(crate) fn on_activate<H, F>(&self, host: &H, log: F) -> ActivateOutcome
    where
        H: WindowHost + ?Sized,
        F: Fn(&str),
    {
        if !self.is_ready() {
            log("activate received before ready; ignoring");
            return ActivateOutcome::IgnoredBeforeReady;
        }

        let open_windows = host.open_window_count();
        if open_windows > 0 {
            return ActivateOutcome::WindowsAlreadyOpen;
        }

        log("activate with no open windows; recreating main window");
        if self.create_window(host, &log) {
            ActivateOutcome::WindowCreated
        } else {
            ActivateOutcome::WindowCreationFailed
        }
    }

    pub(crate) fn on_all_windows_closed<H, F>(&self, host: &H, log: F) -> ShutdownDecision
    where
        H: WindowHost + ?Sized,
        F: Fn(&str),
    {
        if self.platform.quits_when_all_windows_closed() {
            log("all windows closed; quitting");
            host.quit();
            ShutdownDecision::Quit
        } else {
            log("all windows closed; staying resident until next activate");
            ShutdownDecision::StayResident
        }
    }

    fn create_window<H, F>(&self, host: &H, log: F) -> bool
    where
        H: WindowHost + ?Sized,
        F: Fn(&str),
    {
        match host.create_window(&self.spec) {
            Ok(()) => true,
            Err(error) => {
                log(&format!("failed to create main window: {error}"));
                false
            }
        }
    }
}
