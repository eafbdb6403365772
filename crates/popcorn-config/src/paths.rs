use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory from `POPCORN_BASE_PATH`, if set. Everything lives under it.
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("POPCORN_BASE_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("popcorn");
        let data_dir = dirs::data_dir()
            .map(|d| d.join("popcorn"))
            .unwrap_or_else(|| config_dir.join("data"));

        Ok(Self {
            log_dir: data_dir.join("logs"),
            config_dir,
            data_dir,
        })
    }

    /// Config files at the base level, data and logs in subdirectories.
    pub fn from_base(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    /// Directory holding one JSON file per storage key.
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("storage")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    /// Where `--log-file` writes when given without a path.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("popcorn.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.storage_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(&base);
        }

        // Platform-specific paths (e.g., ~/.config/popcorn on Linux), or the
        // working directory when the platform has no notion of one.
        Self::new().unwrap_or_else(|_| Self::from_base(Path::new(".popcorn")))
    }
}
