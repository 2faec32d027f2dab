use tauri::{webview::PageLoadEvent, RunEvent};

use crate::{
    append_backend_log, append_desktop_log, append_startup_log, backend_config, backend_launch,
    exit_events,
    lifecycle::{HostPlatform, Launcher, WindowSpec},
    runtime_paths, startup_task, window_actions, BackendState, WindowLabels,
};

pub(crate) fn run() {
    let root_dir = runtime_paths::default_root_dir();

    append_startup_log("desktop process starting");
    if let Some(log_path) = runtime_paths::desktop_log_path(root_dir.clone()) {
        append_startup_log(&format!("desktop log path: {}", log_path.display()));
    }

    let settings_path = runtime_paths::desktop_settings_path(root_dir.clone());
    let config =
        match backend_config::load_launch_config(settings_path.as_deref(), append_startup_log) {
            Ok(config) => config,
            Err(error) => {
                append_startup_log(&format!("desktop startup aborted: {error}"));
                return;
            }
        };
    let launch_plan = match backend_launch::resolve_launch_plan(
        &config,
        root_dir.clone(),
        runtime_paths::backend_log_path(root_dir),
    ) {
        Ok(plan) => plan,
        Err(error) => {
            append_startup_log(&format!("{error}; backend will not be managed"));
            None
        }
    };
    if let Some(plan) = &launch_plan {
        append_startup_log(&format!(
            "backend launch plan: {:?} (cwd {})",
            backend_launch::build_debug_command(plan),
            plan.cwd.display()
        ));
    }

    let platform = HostPlatform::current();
    append_startup_log(&format!("target url: {} platform: {platform:?}", config.backend_url));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _args, _cwd| {
            append_desktop_log("second instance launched; activating");
            window_actions::activate_app(app_handle, append_desktop_log);
        }))
        .manage(Launcher::new(
            WindowSpec::for_url(config.backend_url.clone()),
            platform,
        ))
        .manage(BackendState::new(config.backend_url, launch_plan))
        .manage(WindowLabels::default())
        .on_page_load(|webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!(
                    "page-load started [{}]: {}",
                    webview.label(),
                    payload.url()
                ));
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!(
                    "page-load finished [{}]: {}",
                    webview.label(),
                    payload.url()
                ));
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            window_actions::open_initial_window(&app_handle, append_startup_log);
            startup_task::spawn_startup_task(app_handle, append_backend_log);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                window_actions::activate_app(app_handle, append_desktop_log);
            }
            RunEvent::ExitRequested { code, api, .. } => {
                exit_events::handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            _ => {}
        });
}
