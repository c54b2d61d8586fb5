//! On-disk record of topics whose migration already completed.
//!
//! The file holds a JSON array of topic names. Each recorded batch is added to
//! the in-memory set and the whole set is rewritten, so a restarted job skips
//! everything finished by any earlier run.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};

use super::{
    batch::BatchItem,
    err::{ReassignError, ReassignResult},
};

#[derive(Debug)]
pub struct ResumptionRecord {
    path: PathBuf,
    completed: BTreeSet<String>,
}

impl ResumptionRecord {
    /// Reads the record at `path`; a missing file is an empty record.
    pub fn load(path: &Path) -> ReassignResult<ResumptionRecord> {
        let completed = match fs::read_to_string(path) {
            Ok(data) if data.trim().is_empty() => BTreeSet::new(),
            Ok(data) => serde_json::from_str(&data).map_err(|e| ReassignError::Resumption {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => {
                return Err(ReassignError::Resumption {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };
        if !completed.is_empty() {
            tracing::info!(path = %path.display(), completed = completed.len(), "resuming job");
        }
        Ok(ResumptionRecord {
            path: path.to_path_buf(),
            completed,
        })
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.completed.contains(topic)
    }

    /// Drops already-completed items, keeping the order of the rest.
    pub fn retain_pending<I: BatchItem>(&self, items: Vec<I>) -> Vec<I> {
        items
            .into_iter()
            .filter(|item| !self.contains(item.topic()))
            .collect()
    }

    /// Adds `topics` and rewrites the file through a temp file and rename.
    pub fn record(&mut self, topics: &[String]) -> ReassignResult<()> {
        self.completed.extend(topics.iter().cloned());
        let data = serde_json::to_string_pretty(&self.completed)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| ReassignError::Resumption {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Removes the file once the whole job is done.
    pub fn clear(self) -> ReassignResult<()> {
        match fs::remove_file(&self.path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReassignError::Resumption {
                path: self.path,
                reason: e.to_string(),
            }),
        }
    }
}
