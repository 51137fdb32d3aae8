use crate::{Event, Store};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// History persisted as JSON Lines, one event per line.
///
/// The whole history is rewritten on every save. It is the only durable
/// state: the graph is rebuilt from it by replay.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read raw history records. A missing file is an empty history.
    pub fn load_records(&self) -> Result<Vec<Value>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open journal: {}", self.path.display()))?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| {
                format!(
                    "Failed to read line {} from: {}",
                    line_num + 1,
                    self.path.display()
                )
            })?;

            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            let record: Value = serde_json::from_str(&line).with_context(|| {
                format!(
                    "Failed to parse event on line {} from: {}",
                    line_num + 1,
                    self.path.display()
                )
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Read and decode every event
    pub fn load(&self) -> Result<Vec<Event>> {
        self.load_records()?
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Event::from_value(record).with_context(|| {
                    format!("Invalid event #{} in: {}", index + 1, self.path.display())
                })
            })
            .collect()
    }

    /// Replay the stored history into a fresh store
    pub fn load_store(&self) -> Result<Store> {
        let events = self.load()?;
        let count = events.len();
        let store = Store::replay(events)
            .with_context(|| format!("Failed to replay journal: {}", self.path.display()))?;
        debug!(events = count, path = %self.path.display(), "journal loaded");
        Ok(store)
    }

    /// Rewrite the journal with the given history
    pub fn save(&self, history: &[Event]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create journal directory: {}", parent.display())
            })?;
        }

        let tmp_path = self.tmp_path()?;
        let file = File::create(&tmp_path)
            .with_context(|| format!("Failed to create: {}", tmp_path.display()))?;
        let mut writer = BufWriter::new(file);

        for event in history {
            let json = serde_json::to_string(event)
                .with_context(|| format!("Failed to serialize {} event", event.type_name()))?;
            writeln!(writer, "{}", json)
                .with_context(|| format!("Failed to write event to: {}", tmp_path.display()))?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to flush: {}", tmp_path.display()))?;
        drop(writer);

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to move {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        debug!(events = history.len(), path = %self.path.display(), "journal saved");
        Ok(())
    }

    /// Save without failing the caller; the store stays authoritative in memory
    pub fn persist(&self, store: &Store) -> bool {
        match self.save(store.history()) {
            Ok(()) => true,
            Err(err) => {
                let message = format!("{:#}", err);
                warn!(error = %message, "failed to persist history");
                false
            }
        }
    }

    fn tmp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| anyhow!("Journal path has no file name: {}", self.path.display()))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}
