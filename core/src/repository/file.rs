use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::config::resolve_data_dir;
use crate::repository::traits::LedgerStore;

const SLOT_EXTENSION: &str = "json";
const PARTIAL_EXTENSION: &str = "json.partial";

#[derive(Clone)]
pub struct FileLedgerStore {
    base_dir: PathBuf,
}

impl FileLedgerStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = resolve_data_dir(base_dir)?;
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create data directory {}", path.display()))?;
        Ok(FileLedgerStore { base_dir: path })
    }

    fn slot_path(&self, key: &str, extension: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(anyhow!("Invalid slot key: '{}'", key));
        }
        Ok(self.base_dir.join(format!("{}.{}", key, extension)))
    }
}

impl LedgerStore for FileLedgerStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key, SLOT_EXTENSION)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    // The previous slot stays intact until the new content is fully on disk.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key, SLOT_EXTENSION)?;
        let partial = self.slot_path(key, PARTIAL_EXTENSION)?;
        let file = File::create(&partial)
            .with_context(|| format!("failed to write {}", partial.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(value.as_bytes())?;
        writer
            .into_inner()
            .map_err(|err| anyhow!("failed to flush {}: {}", partial.display(), err.error()))?
            .sync_all()?;
        fs::rename(&partial, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}
