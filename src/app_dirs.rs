use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "snipgym";

/// Centralized application directory resolution
#[derive(Debug, Clone, PartialEq)]
pub struct AppDirs {
    config_dir: PathBuf,
    state_dir: PathBuf,
}

impl AppDirs {
    /// Platform directories, falling back to the working directory
    pub fn resolve() -> Self {
        match ProjectDirs::from("", "", APP_NAME) {
            Some(pd) => Self {
                config_dir: pd.config_dir().to_path_buf(),
                state_dir: Self::state_dir_for(&pd),
            },
            None => Self::in_dir("."),
        }
    }

    /// Put everything in a single directory (`--data-dir`)
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            config_dir: dir.clone(),
            state_dir: dir,
        }
    }

    fn state_dir_for(pd: &ProjectDirs) -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".local").join("state").join(APP_NAME)
        } else {
            pd.data_local_dir().to_path_buf()
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.state_dir.join("history.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(format!("{APP_NAME}.log"))
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_places_everything_together() {
        let dirs = AppDirs::in_dir("/tmp/gym");
        assert_eq!(dirs.settings_path(), PathBuf::from("/tmp/gym/settings.json"));
        assert_eq!(dirs.history_db_path(), PathBuf::from("/tmp/gym/history.db"));
        assert_eq!(dirs.log_path(), PathBuf::from("/tmp/gym/snipgym.log"));
    }

    #[test]
    fn resolve_names_files() {
        let dirs = AppDirs::resolve();
        assert!(dirs.history_db_path().ends_with("history.db"));
        assert!(dirs.settings_path().ends_with("settings.json"));
    }
}
