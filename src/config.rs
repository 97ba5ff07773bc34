//! Static run configuration: which pages to scrape and where each site's
//! batches and combined output live.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

/// Per-request timeout used unless overridden on the command line.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Placeholder substituted with the page number in a listing URL template.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Page range plus whether to wipe previously staged batches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeJob {
    start: u32,
    end: u32,
    clear_old_staging: bool,
}

impl ScrapeJob {
    pub fn new(start: u32, end: u32, clear_old_staging: bool) -> Result<Self> {
        if start == 0 || start > end {
            return Err(Error::InvalidPageRange { start, end });
        }
        Ok(Self {
            start,
            end,
            clear_old_staging,
        })
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn clear_old_staging(&self) -> bool {
        self.clear_old_staging
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Site {
    /// BC Liquor Stores search API (JSON listing)
    Bcliquor,
    /// Everything Wine storefront (HTML listing + product pages)
    EverythingWine,
}

impl Site {
    pub fn config(self) -> SiteConfig {
        match self {
            Site::Bcliquor => SiteConfig {
                dataset_name: "bcliquor_data".into(),
                staging_dir: PathBuf::from("bcl_data"),
                output_dir: PathBuf::from("."),
                url_template: "http://www.bcliquorstores.com/ajax/browse?sort=name.raw:asc&category=wine&size=100&page={page}".into(),
                items_per_page: 100,
                default_pages: (1, 39),
                timeout: Some(DEFAULT_TIMEOUT),
            },
            Site::EverythingWine => SiteConfig {
                dataset_name: "everything-wine_data".into(),
                staging_dir: PathBuf::from("data"),
                output_dir: PathBuf::from("."),
                url_template: "https://www.everythingwine.ca/rose?p={page}".into(),
                items_per_page: 8,
                default_pages: (1, 13),
                timeout: Some(DEFAULT_TIMEOUT),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub dataset_name: String,
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
    pub url_template: String,
    /// Only feeds the progress estimate.
    pub items_per_page: u32,
    pub default_pages: (u32, u32),
    /// `None` means requests never time out.
    pub timeout: Option<Duration>,
}

impl SiteConfig {
    pub fn page_url(&self, page: u32) -> String {
        self.url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    /// `<output_dir>/<dataset>.json`
    pub fn combined_output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.dataset_name))
    }
}
