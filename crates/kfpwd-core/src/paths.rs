//! Standard paths used by kfpwd

use std::env;
use std::path::{Path, PathBuf};

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.json";

/// Standard kfpwd paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Directory holding the running executable (store lives here)
    pub exe_dir: PathBuf,
    /// Config directory (~/.config/kfpwd)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("kfpwd");

        Self { exe_dir, config }
    }

    /// Store file colocated with the executable
    pub fn database(&self, file_name: &str) -> PathBuf {
        self.exe_dir.join(file_name)
    }

    /// Path of the JSON config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_next_to_executable() {
        let paths = Paths {
            exe_dir: PathBuf::from("/opt/kfpwd/bin"),
            config: PathBuf::from("/home/u/.config/kfpwd"),
        };
        assert_eq!(
            paths.database("passwords.db"),
            PathBuf::from("/opt/kfpwd/bin/passwords.db")
        );
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/home/u/.config/kfpwd/config.json")
        );
    }

    #[test]
    fn test_new_resolves_exe_dir() {
        let paths = Paths::new();
        assert!(!paths.exe_dir.as_os_str().is_empty());
        assert!(paths.config.ends_with("kfpwd"));
    }
}
