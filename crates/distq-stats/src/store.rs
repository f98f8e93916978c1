// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::key::SuiteKey;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durations keyed by suite identity, persisted across runs.
pub type Durations = HashMap<SuiteKey, f64>;

/// Loads and saves suite duration history.
///
/// `distq-cli`'s run driver loads this once at startup to seed the queue's
/// initial ordering, and saves the merged result once at shutdown
/// (spec.md §4.5, steps 1 and 8).
pub trait StatsStore {
    fn load(&self, path: &Path) -> Result<Durations, StatsError>;
    fn save(&self, path: &Path, durations: &Durations) -> Result<(), StatsError>;
}

/// JSON-backed stats store using an atomic write.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonStatsStore;

impl StatsStore for JsonStatsStore {
    fn load(&self, path: &Path) -> Result<Durations, StatsError> {
        if !path.exists() {
            return Ok(Durations::new());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(durations) => Ok(durations),
            Err(e) => {
                warn!(
                    error = %e,
                    path = %path.display(),
                    "corrupt stats file, starting with empty history",
                );
                Ok(Durations::new())
            }
        }
    }

    fn save(&self, path: &Path, durations: &Durations) -> Result<(), StatsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, durations)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

/// Merges freshly observed durations into a loaded history.
///
/// Suites that ran this run overwrite their previous duration; suites that
/// did not run (e.g. excluded by a whitelist) keep their last known value,
/// so the next run's initial ordering still accounts for them.
pub fn merge_durations(existing: &Durations, fresh: impl IntoIterator<Item = (SuiteKey, f64)>) -> Durations {
    let mut merged = existing.clone();
    for (key, duration) in fresh {
        merged.insert(key, duration);
    }
    merged
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
