pub(crate) const DEFAULT_BACKEND_URL: &str = "http://localhost:8501/";
pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_TITLE: &str = "MedFabric";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 1920.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 1080.0;

pub(crate) const ROOT_DIR_NAME: &str = ".medfabric";
pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const BACKEND_LOG_FILE: &str = "backend.log";
pub(crate) const DESKTOP_SETTINGS_FILE: &str = "desktop_settings.json";

pub(crate) const ROOT_DIR_ENV: &str = "MEDFABRIC_ROOT";
pub(crate) const BACKEND_URL_ENV: &str = "MEDFABRIC_BACKEND_URL";
pub(crate) const BACKEND_CMD_ENV: &str = "MEDFABRIC_BACKEND_CMD";
pub(crate) const BACKEND_CWD_ENV: &str = "MEDFABRIC_BACKEND_CWD";
pub(crate) const BACKEND_TIMEOUT_ENV: &str = "MEDFABRIC_BACKEND_TIMEOUT_MS";

pub(crate) const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 60_000;
pub(crate) const BACKEND_PING_TIMEOUT_MS: u64 = 800;
pub(crate) const BACKEND_POLL_INTERVAL_MS: u64 = 600;
