// File: ./src/config.rs
use crate::model::{DEFAULT_CATEGORY, Priority};
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub categories: Vec<String>,
    pub default_category: String,
    pub default_priority: Priority,
    pub confetti_particles: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: ["General", "Work", "Personal", "Shopping"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_category: DEFAULT_CATEGORY.to_string(),
            default_priority: Priority::Low,
            confetti_particles: 80,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn get_path() -> Result<PathBuf> {
        Ok(AppPaths::config_dir()?.join("config.toml"))
    }

    pub fn get_path_string() -> Result<String> {
        Ok(Self::get_path()?.to_string_lossy().to_string())
    }

    /// Loads the config file, or the defaults when there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self).context("Could not serialize config")?;
        fs::write(path, raw).with_context(|| format!("Could not write {}", path.display()))
    }

    // The category picker cycles through `categories`, so the default has to
    // be one of them.
    fn normalize(&mut self) {
        self.categories.retain(|c| !c.trim().is_empty());
        if self.default_category.trim().is_empty() {
            self.default_category = DEFAULT_CATEGORY.to_string();
        }
        if !self.categories.contains(&self.default_category) {
            self.categories.insert(0, self.default_category.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_priority = \"High\"\nconfetti_particles = 12\n").unwrap();
        let c = Config::load_from(&path).unwrap();
        assert_eq!(c.default_priority, Priority::High);
        assert_eq!(c.confetti_particles, 12);
        assert_eq!(c.log_level, "info");
    }

    #[test]
    fn default_category_is_always_selectable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "categories = [\"Work\", \"\"]\ndefault_category = \"Errands\"\n").unwrap();
        let c = Config::load_from(&path).unwrap();
        assert_eq!(c.categories, vec!["Errands".to_string(), "Work".to_string()]);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "confetti_particles = \"lots\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut c = Config::default();
        c.log_level = "debug".into();
        c.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), c);
    }
}
