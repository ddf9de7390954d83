// File: ./src/paths.rs
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

static BASE_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

pub struct AppPaths;

impl AppPaths {
    /// Pins both the data and config directories under `dir`. Only the first
    /// call wins.
    pub fn init_base_dir(dir: PathBuf) {
        let _ = BASE_OVERRIDE.set(dir);
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "tickbox").context("Could not determine home directory")
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dir = match BASE_OVERRIDE.get() {
            Some(base) => base.clone(),
            None => Self::project_dirs()?.data_dir().to_path_buf(),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Could not create data dir {}", dir.display()))?;
        Ok(dir)
    }

    pub fn config_dir() -> Result<PathBuf> {
        let dir = match BASE_OVERRIDE.get() {
            Some(base) => base.clone(),
            None => Self::project_dirs()?.config_dir().to_path_buf(),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Could not create config dir {}", dir.display()))?;
        Ok(dir)
    }

    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("logs"))
    }
}
