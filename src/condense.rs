//! Merges every staged batch into the combined output file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::Result;
use crate::config::SiteConfig;
use crate::models::ProductRecord;
use crate::staging::{StagingDir, partial_file_in, remove_if_exists};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedOutput {
    pub path: PathBuf,
    pub batches: usize,
    pub records: usize,
}

pub struct Condenser {
    staging: StagingDir,
    output_path: PathBuf,
}

impl Condenser {
    pub fn new(staging: StagingDir, output_path: impl Into<PathBuf>) -> Self {
        Self {
            staging,
            output_path: output_path.into(),
        }
    }

    pub fn for_site(site: &SiteConfig) -> Self {
        Self::new(
            StagingDir::new(&site.staging_dir, &site.dataset_name),
            site.combined_output_path(),
        )
    }

    /// Concatenates the batches in file name order and overwrites the
    /// combined file. No batches gives an empty array.
    pub fn condense(&self) -> Result<CombinedOutput> {
        info!("Condensing {}...", self.staging.path().display());

        let files = self.staging.batch_files()?;
        let mut combined: Vec<ProductRecord> = Vec::new();
        for file in &files {
            let batch: Vec<ProductRecord> = serde_json::from_str(&fs::read_to_string(file)?)?;
            combined.extend(batch);
        }

        // written beside the target and renamed over it, so a failed write
        // keeps the previous combined file
        let json = serde_json::to_string_pretty(&combined)?;
        let dir = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut out = partial_file_in(dir)?;
        out.write_all(json.as_bytes())?;
        out.as_file().sync_all()?;
        out.persist(&self.output_path).map_err(|e| e.error)?;

        info!(
            "Condensed {} records from {} batches into {}",
            combined.len(),
            files.len(),
            self.output_path.display()
        );
        Ok(CombinedOutput {
            path: self.output_path.clone(),
            batches: files.len(),
            records: combined.len(),
        })
    }

    /// Removes the staging directory and the combined output file.
    pub fn clear_all(&self) -> Result<()> {
        self.staging.clear()?;
        remove_if_exists(fs::remove_file(&self.output_path))
    }
}
