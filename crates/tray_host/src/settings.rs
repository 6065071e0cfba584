use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::error::*;

/// Persisted "show this application's icon in the container" choices, keyed by window class.
///
/// Stored as a flat JSON object. Every change is written through to disk immediately.
#[derive(Debug, Default)]
pub struct ContainerSettings {
    path: Option<PathBuf>,
    values: BTreeMap<String, bool>,
}

impl ContainerSettings {
    /// Settings that only live as long as this value.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the settings stored at `path`. A missing file is the same as an empty one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = read_values(&path)?;
        Ok(Self { path: Some(path), values })
    }

    /// Replace the in-memory values with what is currently stored. On error, nothing changes.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(path) = &self.path {
            self.values = read_values(path)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> bool {
        self.values.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, value: bool) -> Result<()> {
        if self.values.insert(key.to_string(), value) == Some(value) {
            return Ok(());
        }
        self.save()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else { return Ok(()) };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|err| Error::Io { path: dir.to_path_buf(), err })?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(path, content).map_err(|err| Error::Io { path: path.clone(), err })
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, bool>> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(err) => Err(Error::Io { path: path.to_path_buf(), err }),
    }
}
