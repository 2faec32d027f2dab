use std::{env, path::PathBuf};

use crate::{
    BACKEND_LOG_FILE, DESKTOP_LOG_FILE, DESKTOP_SETTINGS_FILE, ROOT_DIR_ENV, ROOT_DIR_NAME,
};

/// Root directory for shell logs and settings.
///
/// `MEDFABRIC_ROOT` wins when it is set to a non-blank path, otherwise
/// `~/.medfabric` is used.
pub(crate) fn default_root_dir() -> Option<PathBuf> {
    root_dir_from_override(env::var(ROOT_DIR_ENV).ok().as_deref())
        .or_else(|| home::home_dir().map(|home| home.join(ROOT_DIR_NAME)))
}

fn root_dir_from_override(raw: Option<&str>) -> Option<PathBuf> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

pub(crate) fn logs_dir(root_dir: &std::path::Path) -> PathBuf {
    root_dir.join("logs")
}

pub(crate) fn desktop_log_path(root_dir: Option<PathBuf>) -> Option<PathBuf> {
    root_dir.map(|root| logs_dir(&root).join(DESKTOP_LOG_FILE))
}

pub(crate) fn backend_log_path(root_dir: Option<PathBuf>) -> Option<PathBuf> {
    root_dir.map(|root| logs_dir(&root).join(BACKEND_LOG_FILE))
}

pub(crate) fn desktop_settings_path(root_dir: Option<PathBuf>) -> Option<PathBuf> {
    root_dir.map(|root| root.join("data").join(DESKTOP_SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    #[test]
    fn root_dir_override_ignores_blank_values() {
        assert_eq!(root_dir_from_override(None), None);
        assert_eq!(root_dir_from_override(Some("   ")), None);
        assert_eq!(
            root_dir_from_override(Some(" /opt/medfabric ")),
            Some(PathBuf::from("/opt/medfabric"))
        );
    }

    #[test]
    fn derived_paths_live_under_root() {
        let root = PathBuf::from("/tmp/mf-root");
        assert_eq!(
            desktop_log_path(Some(root.clone())).as_deref(),
            Some(Path::new("/tmp/mf-root/logs/desktop.log"))
        );
        assert_eq!(
            backend_log_path(Some(root.clone())).as_deref(),
            Some(Path::new("/tmp/mf-root/logs/backend.log"))
        );
        assert_eq!(
            desktop_settings_path(Some(root)).as_deref(),
            Some(Path::new("/tmp/mf-root/data/desktop_settings.json"))
        );
        assert_eq!(desktop_log_path(None), None);
    }
}
