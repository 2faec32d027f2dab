#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod backend_config;
mod backend_launch;
mod backend_readiness;
mod exit_events;
mod lifecycle;
mod logging;
mod main_window;
mod runtime_paths;
mod startup_task;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{AtomicFlagGuard, BackendState, LaunchPlan, WindowLabels};
pub(crate) use logging::{
    append_backend_log, append_desktop_log, append_shutdown_log, append_startup_log,
};

fn main() {
    app_runtime::run();
}
