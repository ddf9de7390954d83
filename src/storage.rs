// File: ./src/storage.rs
use crate::model::AppState;
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed key the whole state is stored under.
pub const STORAGE_KEY: &str = "todoApp_v1";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", STORAGE_KEY)),
        }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(&AppPaths::data_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .with_context(|| format!("Could not open lock file for {}", self.path.display()))?;
        file.lock_exclusive()
            .context("Could not lock local storage")?;
        Ok(file)
    }

    /// Returns the stored blob, or `None` if nothing has been saved yet.
    pub fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let guard = self.lock()?;
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Could not read {}", self.path.display()));
        let _ = guard.unlock();
        raw.map(Some)
    }

    /// Loads the stored state. Never fails: an unreadable file is logged and
    /// treated as an empty store.
    pub fn load(&self, today: NaiveDate) -> AppState {
        match self.read_raw() {
            Ok(Some(raw)) => AppState::from_json(&raw, today),
            Ok(None) => AppState::new(today),
            Err(e) => {
                log::warn!("{:#}", e);
                AppState::new(today)
            }
        }
    }

    pub fn load_today(&self) -> AppState {
        self.load(Local::now().date_naive())
    }

    /// Overwrites the stored blob with `state`.
    pub fn save(&self, state: &AppState) -> Result<()> {
        let json = state.to_json().context("Could not serialize state")?;
        let guard = self.lock()?;

        let tmp = self.path.with_extension("json.tmp");
        let res = (|| -> Result<()> {
            let mut f = File::create(&tmp)
                .with_context(|| format!("Could not create {}", tmp.display()))?;
            f.write_all(json.as_bytes())?;
            f.sync_all()?;
            fs::rename(&tmp, &self.path)
                .with_context(|| format!("Could not replace {}", self.path.display()))?;
            Ok(())
        })();

        let _ = guard.unlock();
        if res.is_ok() {
            log::debug!(
                "Saved {} task(s), {} point(s)",
                state.tasks.len(),
                state.points
            );
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Task};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.read_raw().unwrap(), None);
        assert_eq!(storage.load(today()), AppState::new(today()));
    }

    #[test]
    fn save_overwrites_previous_blob() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let mut state = AppState::new(today());
        state
            .tasks
            .push(Task::new("one", today(), "Work", Priority::Low));
        storage.save(&state).unwrap();

        state.tasks.clear();
        state.points = 20;
        storage.save(&state).unwrap();

        let back = storage.load(today());
        assert!(back.tasks.is_empty());
        assert_eq!(back.points, 20);
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        fs::write(storage.path(), "\u{0}\u{1}garbage").unwrap();
        assert_eq!(storage.load(today()), AppState::new(today()));
    }

    #[test]
    fn blob_is_named_after_storage_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert_eq!(
            storage.path().file_name().unwrap().to_str().unwrap(),
            "todoApp_v1.json"
        );
    }
}
