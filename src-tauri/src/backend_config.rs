use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use url::Url;

use crate::{
    BACKEND_CMD_ENV, BACKEND_CWD_ENV, BACKEND_TIMEOUT_ENV, BACKEND_URL_ENV,
    DEFAULT_BACKEND_TIMEOUT_MS, DEFAULT_BACKEND_URL,
};

/// Optional overrides persisted in `<root>/data/desktop_settings.json`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct DesktopSettings {
    pub(crate) backend_url: Option<String>,
    pub(crate) backend_cmd: Option<String>,
    pub(crate) backend_cwd: Option<String>,
    pub(crate) backend_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchConfig {
    pub(crate) backend_url: Url,
    pub(crate) backend_cmd: Option<String>,
    pub(crate) backend_cwd: Option<PathBuf>,
    /// `None` waits for the backend without a deadline.
    pub(crate) backend_timeout: Option<Duration>,
}

pub(crate) fn default_backend_url() -> Result<Url, String> {
    Url::parse(DEFAULT_BACKEND_URL)
        .map_err(|error| format!("Invalid default backend url {DEFAULT_BACKEND_URL}: {error}"))
}

/// Trims and parses an http(s) URL, giving it a `/` path when it has none.
/// Anything else falls back to the default URL.
pub(crate) fn normalize_backend_url(raw: &str) -> Result<Url, String> {
    match Url::parse(raw.trim()) {
        Ok(mut parsed) if matches!(parsed.scheme(), "http" | "https") => {
            if parsed.path().is_empty() {
                parsed.set_path("/");
            }
            Ok(parsed)
        }
        _ => default_backend_url(),
    }
}

pub(crate) fn read_desktop_settings(
    settings_path: Option<&Path>,
) -> Result<DesktopSettings, String> {
    let Some(path) = settings_path else {
        return Ok(DesktopSettings::default());
    };

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(DesktopSettings::default());
        }
        Err(error) => {
            return Err(format!(
                "Failed to read desktop settings {}: {}",
                path.display(),
                error
            ));
        }
    };

    serde_json::from_str(&raw).map_err(|error| {
        format!(
            "Failed to parse desktop settings {}: {}",
            path.display(),
            error
        )
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn timeout_from_millis(timeout_ms: u64) -> Option<Duration> {
    if timeout_ms == 0 {
        None
    } else {
        Some(Duration::from_millis(timeout_ms))
    }
}

fn resolve_timeout_ms<F>(
    raw_env: Option<String>,
    settings_timeout_ms: Option<u64>,
    log: F,
) -> u64
where
    F: Fn(&str),
{
    let from_env = raw_env.and_then(|raw| match raw.parse::<u64>() {
        Ok(timeout_ms) => Some(timeout_ms),
        Err(error) => {
            log(&format!("ignoring {BACKEND_TIMEOUT_ENV}={raw:?}: {error}"));
            None
        }
    });
    from_env
        .or(settings_timeout_ms)
        .unwrap_or(DEFAULT_BACKEND_TIMEOUT_MS)
}

/// Environment first, then settings file, then compiled defaults.
pub(crate) fn resolve_launch_config<E, F>(
    lookup_env: E,
    settings: DesktopSettings,
    log: F,
) -> Result<LaunchConfig, String>
where
    E: Fn(&str) -> Option<String>,
    F: Fn(&str),
{
    let backend_url = match non_blank(lookup_env(BACKEND_URL_ENV))
        .or_else(|| non_blank(settings.backend_url))
    {
        Some(raw) => normalize_backend_url(&raw)?,
        None => default_backend_url()?,
    };
    let backend_cmd =
        non_blank(lookup_env(BACKEND_CMD_ENV)).or_else(|| non_blank(settings.backend_cmd));
    let backend_cwd = non_blank(lookup_env(BACKEND_CWD_ENV))
        .or_else(|| non_blank(settings.backend_cwd))
        .map(PathBuf::from);
    let timeout_ms = resolve_timeout_ms(
        non_blank(lookup_env(BACKEND_TIMEOUT_ENV)),
        settings.backend_timeout_ms,
        log,
    );

    Ok(LaunchConfig {
        backend_url,
        backend_cmd,
        backend_cwd,
        backend_timeout: timeout_from_millis(timeout_ms),
    })
}

pub(crate) fn load_launch_config<F>(
    settings_path: Option<&Path>,
    log: F,
) -> Result<LaunchConfig, String>
where
    F: Fn(&str),
{
    let settings = read_desktop_settings(settings_path).unwrap_or_else(|error| {
        log(&format!("{error}; using defaults"));
        DesktopSettings::default()
    });
    resolve_launch_config(|key| env::var(key).ok(), settings, log)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, fs};

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_backend_url_parses() {
        assert_eq!(
            default_backend_url().expect("default url").as_str(),
            "http://localhost:8501/"
        );
    }

    #[test]
    fn valid_timeout_env_is_used_without_logging() {
        let messages = RefCell::new(Vec::new());
        let timeout_ms = resolve_timeout_ms(Some("2500".to_string()), Some(100), |message| {
            messages.borrow_mut().push(message.to_string())
        });
        assert_eq!(timeout_ms, 2_500);
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn normalize_backend_url_adds_root_path() {
        assert_eq!(
            normalize_backend_url("http://localhost:8501")
                .expect("valid url")
                .as_str(),
            "http://localhost:8501/"
        );
        assert_eq!(
            normalize_backend_url("  http://127.0.0.1:9000/app  ")
                .expect("valid url")
                .as_str(),
            "http://127.0.0.1:9000/app"
        );
    }

    #[test]
    fn normalize_backend_url_falls_back_for_invalid_input() {
        for raw in ["", "not a url", "file:///etc/passwd"] {
            let url = normalize_backend_url(raw).expect("fallback url");
            assert_eq!(url.as_str(), DEFAULT_BACKEND_URL, "input {raw:?}");
        }
    }

    #[test]
    fn resolve_launch_config_uses_defaults_without_overrides() {
        let config = resolve_launch_config(env_of(&[]), DesktopSettings::default(), |_| {})
            .expect("config resolves");
        assert_eq!(config.backend_url.as_str(), "http://localhost:8501/");
        assert_eq!(config.backend_cmd, None);
        assert_eq!(config.backend_cwd, None);
        assert_eq!(
            config.backend_timeout,
            Some(Duration::from_millis(DEFAULT_BACKEND_TIMEOUT_MS))
        );
    }

    #[test]
    fn resolve_launch_config_prefers_env_over_settings() {
        let settings = DesktopSettings {
            backend_url: Some("http://localhost:9999".to_string()),
            backend_cmd: Some("streamlit run other.py".to_string()),
            backend_cwd: Some("/srv/settings".to_string()),
            backend_timeout_ms: Some(5_000),
        };
        let config = resolve_launch_config(
            env_of(&[
                (BACKEND_URL_ENV, "http://127.0.0.1:8600"),
                (BACKEND_CMD_ENV, "streamlit run main.py"),
                (BACKEND_TIMEOUT_ENV, "0"),
            ]),
            settings,
            |_| {},
        )
        .expect("config resolves");

        assert_eq!(config.backend_url.as_str(), "http://127.0.0.1:8600/");
        assert_eq!(config.backend_cmd.as_deref(), Some("streamlit run main.py"));
        assert_eq!(config.backend_cwd, Some(PathBuf::from("/srv/settings")));
        assert_eq!(config.backend_timeout, None);
    }

    #[test]
    fn resolve_launch_config_ignores_blank_and_garbage_env() {
        let settings = DesktopSettings {
            backend_timeout_ms: Some(1_500),
            ..DesktopSettings::default()
        };
        let messages = RefCell::new(Vec::new());
        let config = resolve_launch_config(
            env_of(&[(BACKEND_CMD_ENV, "   "), (BACKEND_TIMEOUT_ENV, "soon")]),
            settings,
            |message| messages.borrow_mut().push(message.to_string()),
        )
        .expect("config resolves");
        assert_eq!(config.backend_cmd, None);
        assert_eq!(config.backend_timeout, Some(Duration::from_millis(1_500)));

        let messages = messages.borrow();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("ignoring MEDFABRIC_BACKEND_TIMEOUT_MS=\"soon\""));
    }

    #[test]
    fn read_desktop_settings_handles_missing_and_present_files() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("desktop_settings.json");
        assert_eq!(
            read_desktop_settings(Some(path.as_path())),
            Ok(DesktopSettings::default())
        );

        fs::write(
            &path,
            r#"{"backendUrl":"http://localhost:8502","backendTimeoutMs":100}"#,
        )
        .expect("write settings");
        let settings = read_desktop_settings(Some(path.as_path())).expect("parse settings");
        assert_eq!(settings.backend_url.as_deref(), Some("http://localhost:8502"));
        assert_eq!(settings.backend_timeout_ms, Some(100));
        assert_eq!(settings.backend_cmd, None);
    }

    #[test]
    fn read_desktop_settings_reports_malformed_json() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("desktop_settings.json");
        fs::write(&path, "{ not json").expect("write settings");

        let error = read_desktop_settings(Some(path.as_path()))
            .expect_err("malformed json should fail");
        assert!(error.starts_with("Failed to parse desktop settings"));
    }
}
