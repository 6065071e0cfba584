use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::error::*;

/// User configuration of the tray, read from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct TrayConfig {
    /// How long to wait after the tray manager announced a change before asking it for its icons.
    /// The dock embeds windows asynchronously, so asking right away can return a stale list.
    #[default = 800]
    pub x11_settle_delay_ms: u64,

    /// Show icons embedded through the X11 tray manager.
    #[default = true]
    pub x11: bool,

    /// Show StatusNotifierItems.
    #[default = true]
    pub sni: bool,
}

impl TrayConfig {
    /// Read the configuration at `path`, falling back to the defaults if there is none.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(Error::Io { path: path.to_path_buf(), err }),
        }
    }

    pub fn x11_settle_delay(&self) -> Duration {
        Duration::from_millis(self.x11_settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = TrayConfig::default();
        assert_eq!(Duration::from_millis(800), config.x11_settle_delay());
        assert!(config.x11 && config.sni);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "x11": false, "x11_settle_delay_ms": 250 }"#).unwrap();

        let config = TrayConfig::read_from_file(&path).unwrap();
        assert_eq!(TrayConfig { x11_settle_delay_ms: 250, x11: false, sni: true }, config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(TrayConfig::default(), TrayConfig::read_from_file(dir.path().join("config.json")).unwrap());
    }
}
