use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
};

use crate::{backend_config::LaunchConfig, AtomicFlagGuard, BackendState, LaunchPlan};

/// Builds the backend launch plan, or `None` when no backend command is set
/// and the web app is expected to be running already.
pub(crate) fn resolve_launch_plan(
    config: &LaunchConfig,
    root_dir: Option<PathBuf>,
    log_path: Option<PathBuf>,
) -> Result<Option<LaunchPlan>, String> {
    let Some(custom_cmd) = config.backend_cmd.as_deref() else {
        return Ok(None);
    };

    let mut pieces = shlex::split(custom_cmd)
        .ok_or_else(|| format!("Invalid backend command: {custom_cmd}"))?;
    if pieces.is_empty() {
        return Err("Backend command is empty.".to_string());
    }

    let cmd = pieces.remove(0);
    let cwd = config
        .backend_cwd
        .clone()
        .or(root_dir)
        .or_else(|| std::env::current_dir().ok())
        .ok_or_else(|| "Cannot determine backend working directory.".to_string())?;

    Ok(Some(LaunchPlan {
        cmd,
        args: pieces,
        cwd,
        log_path,
        timeout: config.backend_timeout,
    }))
}

pub(crate) fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.cmd.clone()];
    parts.extend(plan.args.clone());
    parts
}

fn open_backend_log(log_path: &Path) -> Result<(File, File), String> {
    if let Some(log_parent) = log_path.parent() {
        fs::create_dir_all(log_parent).map_err(|error| {
            format!(
                "Failed to create backend log directory {}: {}",
                log_parent.display(),
                error
            )
        })?;
    }
    let stdout_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| format!("Failed to open backend log {}: {}", log_path.display(), error))?;
    let stderr_file = stdout_file
        .try_clone()
        .map_err(|error| format!("Failed to clone backend log handle: {error}"))?;
    Ok((stdout_file, stderr_file))
}

fn backend_command(plan: &LaunchPlan) -> Result<Command, String> {
    let mut command = Command::new(&plan.cmd);
    command
        .args(&plan.args)
        .current_dir(&plan.cwd)
        .stdin(Stdio::null())
        .env("PYTHONUNBUFFERED", "1");

    match &plan.log_path {
        Some(log_path) => {
            let (stdout_file, stderr_file) = open_backend_log(log_path)?;
            command.stdout(stdout_file).stderr(stderr_file);
        }
        None => {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
    }

    // Wrappers such as `poetry run` or `sh -c` fork the real server; a fresh
    // process group lets shutdown reach it too.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    Ok(command)
}

pub(crate) fn spawn_backend_process(plan: &LaunchPlan) -> Result<Child, String> {
    if !plan.cwd.exists() {
        fs::create_dir_all(&plan.cwd).map_err(|error| {
            format!(
                "Failed to create backend cwd {}: {}",
                plan.cwd.display(),
                error
            )
        })?;
    }

    backend_command(plan)?.spawn().map_err(|error| {
        format!(
            "Failed to spawn backend process with command {:?}: {}",
            build_debug_command(plan),
            error
        )
    })
}

/// Starts the planned backend unless one is already tracked.
/// Returns `Ok(false)` when nothing was spawned.
pub(crate) fn start_backend_process(state: &BackendState) -> Result<bool, String> {
    let Some(plan) = state.launch_plan.as_ref() else {
        return Ok(false);
    };
    let Some(_spawn_guard) = AtomicFlagGuard::try_set(&state.is_spawning) else {
        return Err("Backend spawn is already in progress.".to_string());
    };

    let mut guard = state
        .child
        .lock()
        .map_err(|_| "Backend process lock poisoned.".to_string())?;
    if guard.is_some() {
        return Ok(false);
    }

    *guard = Some(spawn_backend_process(plan)?);
    Ok(true)
}

pub(crate) fn stop_backend<F>(state: &BackendState, log: F)
where
    F: Fn(&str),
{
    let child = match state.child.lock() {
        Ok(mut guard) => guard.take(),
        Err(_) => {
            log("backend process lock poisoned; cannot stop backend");
            None
        }
    };
    if let Some(mut process) = child {
        log(&format!("stopping backend process pid={}", process.id()));
        stop_child_process(&mut process, &log);
    }
}

fn stop_child_process<F>(child: &mut Child, log: F)
where
    F: Fn(&str),
{
    #[cfg(windows)]
    {
        let result = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(error) = result {
            log(&format!("taskkill failed for pid {}: {error}", child.id()));
            let _ = child.kill();
        }
    }

    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        signal_process_group("TERM", &group, &log);
        if !exited_within(child, BACKEND_STOP_GRACE) {
            log("backend still running after SIGTERM; killing its process group");
            signal_process_group("KILL", &group, &log);
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = child.kill();
    }

    if let Err(error) = child.wait() {
        log(&format!("failed to reap backend process: {error}"));
    }
}

#[cfg(unix)]
const BACKEND_STOP_GRACE: std::time::Duration = std::time::Duration::from_secs(3);

#[cfg(unix)]
fn signal_process_group<F>(signal: &str, group: &str, log: F)
where
    F: Fn(&str),
{
    let flag = format!("-{signal}");
    let result = Command::new("kill")
        .args([flag.as_str(), "--", group])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match result {
        Ok(status) if status.success() => {}
        Ok(status) => log(&format!("kill {flag} {group} exited with {status}")),
        Err(error) => log(&format!("failed to run kill {flag} {group}: {error}")),
    }
}

#[cfg(unix)]
fn exited_within(child: &mut Child, grace: std::time::Duration) -> bool {
    let deadline = std::time::Instant::now() + grace;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) => {}
            Err(_) => return false,
        }
        if std::time::Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }
}
