//! Per-page batch files in the staging directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;
use tempfile::{Builder, NamedTempFile};

use crate::Result;
use crate::models::ProductRecord;

/// Writes each page's records to `<dir>/<dataset>_<unix-millis>_<seq>.json`.
/// The sequence number keeps names unique and ordered within a run.
#[derive(Debug)]
pub struct StagingDir {
    dir: PathBuf,
    dataset_name: String,
    next_seq: u32,
}

impl StagingDir {
    pub fn new(dir: impl Into<PathBuf>, dataset_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            dataset_name: dataset_name.into(),
            next_seq: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// The batch is written to a hidden temp file first and only renamed to
    /// its final name once complete, so a failed write never leaves a
    /// truncated batch behind.
    pub fn write_page(&mut self, records: &[ProductRecord]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string(records)?;
        let mut tmp = partial_file_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;

        let millis = Utc::now().timestamp_millis();
        let path = loop {
            let path = self.dir.join(format!(
                "{}_{}_{:04}.json",
                self.dataset_name, millis, self.next_seq
            ));
            self.next_seq += 1;
            // a batch left by an earlier run in the same millisecond
            match tmp.persist_noclobber(&path) {
                Ok(_) => break path,
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => tmp = e.file,
                Err(e) => return Err(e.error.into()),
            }
        };

        debug!("staged {} records in {}", records.len(), path.display());
        Ok(path)
    }

    /// Removes the whole staging directory. A missing directory is fine.
    pub fn clear(&self) -> Result<()> {
        remove_if_exists(fs::remove_dir_all(&self.dir))
    }

    /// Batch files for this dataset, sorted by name.
    pub fn batch_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let prefix = format!("{}_", self.dataset_name);
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&prefix) && name.ends_with(".json") && entry.file_type()?.is_file()
            {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Hidden `.*.part` file in `dir`, removed on drop unless persisted. Never
/// matches a batch file name.
pub(crate) fn partial_file_in(dir: &Path) -> Result<NamedTempFile> {
    Ok(Builder::new()
        .prefix(".")
        .suffix(".part")
        .tempfile_in(dir)?)
}

pub(crate) fn remove_if_exists(res: io::Result<()>) -> Result<()> {
    match res {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
