use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Stores references to all the paths relevant to dock-tray, and abstracts access to these files and directories
#[derive(Debug, Clone)]
pub struct TrayPaths {
    pub config_dir: PathBuf,
}

impl TrayPaths {
    pub fn from_config_dir<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        if config_dir.is_file() {
            bail!("Please provide the path to the config directory, not a file within it")
        }

        // the directory is only created once there is something to store in it
        let config_dir = if config_dir.exists() { config_dir.canonicalize()? } else { config_dir.to_path_buf() };

        Ok(TrayPaths { config_dir })
    }

    pub fn default() -> Result<Self> {
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => PathBuf::from(std::env::var("HOME").context("Neither XDG_CONFIG_HOME nor HOME are set")?).join(".config"),
        }
        .join("dock-tray");

        Self::from_config_dir(config_dir)
    }

    pub fn get_config_dir(&self) -> &Path {
        self.config_dir.as_path()
    }

    pub fn get_config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn get_containers_file(&self) -> PathBuf {
        self.config_dir.join("containers.json")
    }
}

impl std::fmt::Display for TrayPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "config-dir: {}, containers: {}", self.config_dir.display(), self.get_containers_file().display())
    }
}
