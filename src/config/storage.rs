use crate::domain::model::SavedResult;
use crate::domain::ports::ResultStore;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

const LAST_RESULT_FILE: &str = "last_result.json";

/// Keeps the last computed result as a JSON file under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn last_result_path(&self) -> PathBuf {
        Path::new(&self.base_path).join(LAST_RESULT_FILE)
    }
}

impl ResultStore for LocalStorage {
    fn save_last(&self, saved: &SavedResult) -> Result<()> {
        let full_path = self.last_result_path();

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(saved)?;
        fs::write(&full_path, data)?;
        tracing::debug!("Saved last result to {}", full_path.display());
        Ok(())
    }

    fn load_last(&self) -> Result<Option<SavedResult>> {
        let full_path = self.last_result_path();
        if !full_path.exists() {
            return Ok(None);
        }

        let data = fs::read(&full_path)?;
        let saved = serde_json::from_slice(&data)?;
        Ok(Some(saved))
    }
}
