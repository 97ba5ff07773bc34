//! The page loop: fetch, extract, stage, report.

use std::path::PathBuf;

use log::{info, warn};

use crate::Result;
use crate::config::{ScrapeJob, Site, SiteConfig};
use crate::fetcher::Fetch;
use crate::parser::{DetailPageExtractor, PageExtractor, SearchResultsExtractor};
use crate::progress::ProgressReporter;
use crate::staging::StagingDir;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: u32,
    pub records: usize,
    pub skipped: usize,
    pub batches: Vec<PathBuf>,
}

/// Runs `job` against `site` with the extractor that site's listings need.
pub fn scrape_site<F: Fetch>(
    site: Site,
    config: SiteConfig,
    job: ScrapeJob,
    fetcher: F,
) -> Result<RunSummary> {
    match site {
        Site::Bcliquor => Scraper::new(job, config, fetcher, SearchResultsExtractor).run(),
        Site::EverythingWine => Scraper::new(job, config, fetcher, DetailPageExtractor).run(),
    }
}

pub struct Scraper<F, E> {
    job: ScrapeJob,
    site: SiteConfig,
    fetcher: F,
    extractor: E,
    staging: StagingDir,
    progress: ProgressReporter,
}

impl<F, E> Scraper<F, E>
where
    F: Fetch,
    E: PageExtractor,
{
    pub fn new(job: ScrapeJob, site: SiteConfig, fetcher: F, extractor: E) -> Self {
        let staging = StagingDir::new(&site.staging_dir, &site.dataset_name);
        let estimated_total = u64::from(job.page_count()) * u64::from(site.items_per_page);
        Self {
            job,
            site,
            fetcher,
            extractor,
            staging,
            progress: ProgressReporter::new(estimated_total),
        }
    }

    /// Scrapes every page of the job in ascending order. A fetch that runs
    /// out of retries, or a failed write, ends the run; batches staged so
    /// far stay on disk.
    pub fn run(&mut self) -> Result<RunSummary> {
        if self.job.clear_old_staging() {
            info!("Clearing old staged data in {}", self.staging.path().display());
            self.staging.clear()?;
        }

        let mut summary = RunSummary::default();
        for page in self.job.pages() {
            self.scrape_page(page, &mut summary)?;
            summary.pages += 1;
        }

        info!(
            "Scrape finished: {} pages, {} records, {} skipped",
            summary.pages, summary.records, summary.skipped
        );
        Ok(summary)
    }

    fn scrape_page(&mut self, page: u32, summary: &mut RunSummary) -> Result<()> {
        let url = self.site.page_url(page);
        info!("Scraping page {page}: {url}");

        let body = self.fetcher.fetch(&url)?;
        let items = self.extractor.items(&url, &body)?;

        let mut batch = Vec::with_capacity(items.len());
        for item in items {
            self.progress.record_processed();
            match self.extractor.resolve(item, &mut self.fetcher) {
                Ok(record) => batch.push(record),
                Err(e) if e.is_product_scoped() => {
                    warn!("Skipping product on page {page}: {e}");
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
            self.progress.report();
        }

        summary.records += batch.len();
        summary.batches.push(self.staging.write_page(&batch)?);
        Ok(())
    }
}
