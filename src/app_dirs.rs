use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const EVENT_LOG_FILE: &str = "events.csv";

/// Centralized application directory resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    log_dir: PathBuf,
}

impl AppDirs {
    /// Use `override_dir` when given, otherwise `$HOME/.local/state/pomoclock`.
    pub fn resolve(override_dir: Option<&Path>) -> Self {
        let log_dir = override_dir
            .map(Path::to_path_buf)
            .or_else(Self::default_log_dir)
            .unwrap_or_else(|| PathBuf::from("pomoclock_logs"));
        Self { log_dir }
    }

    fn default_log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("pomoclock"),
            )
        } else {
            ProjectDirs::from("", "", "pomoclock")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn event_log_path(&self) -> PathBuf {
        self.log_dir.join(EVENT_LOG_FILE)
    }

    /// Detached command output shares the event log directory.
    pub fn command_output_dir(&self) -> PathBuf {
        self.log_dir.clone()
    }
}
