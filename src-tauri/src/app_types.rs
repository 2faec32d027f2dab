use std::{
    path::PathBuf,
    process::Child,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use url::Url;

use crate::MAIN_WINDOW_LABEL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) log_path: Option<PathBuf>,
    pub(crate) timeout: Option<Duration>,
}

#[derive(Debug)]
pub(crate) struct BackendState {
    pub(crate) child: Mutex<Option<Child>>,
    pub(crate) backend_url: Url,
    pub(crate) launch_plan: Option<LaunchPlan>,
    pub(crate) is_spawning: AtomicBool,
}

impl BackendState {
    pub(crate) fn new(backend_url: Url, launch_plan: Option<LaunchPlan>) -> Self {
        Self {
            child: Mutex::new(None),
            backend_url,
            launch_plan,
            is_spawning: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_managed(&self) -> bool {
        self.launch_plan.is_some()
    }
}

/// Hands out unique labels for shell windows: `main`, `main-2`, `main-3`, ...
#[derive(Debug, Default)]
pub(crate) struct WindowLabels {
    created: AtomicUsize,
}

impl WindowLabels {
    pub(crate) fn next_label(&self) -> String {
        let index = self.created.fetch_add(1, Ordering::Relaxed) + 1;
        if index == 1 {
            MAIN_WINDOW_LABEL.to_string()
        } else {
            format!("{MAIN_WINDOW_LABEL}-{index}")
        }
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::{AtomicFlagGuard, WindowLabels};

    #[test]
    fn atomic_flag_guard_try_set_rejects_double_set_until_drop() {
        let flag = AtomicBool::new(false);

        let guard = AtomicFlagGuard::try_set(&flag).expect("first set should succeed");
        assert!(flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_some());
    }

    #[test]
    fn window_labels_are_unique_and_start_with_main() {
        let labels = WindowLabels::default();
        assert_eq!(labels.next_label(), "main");
        assert_eq!(labels.next_label(), "main-2");
        assert_eq!(labels.next_label(), "main-3");
    }
}
