//! Page through a wine store's product listing, stage every page as a JSON
//! batch, then condense the batches into one combined file.

pub mod condense;
pub mod config;
mod error;
pub mod fetcher;
pub mod logger;
pub mod models;
pub mod parser;
pub mod progress;
pub mod retry;
pub mod scrape;
pub mod staging;

pub use condense::{CombinedOutput, Condenser};
pub use config::{ScrapeJob, Site, SiteConfig};
pub use error::{Error, Result};
pub use fetcher::{Fetch, Fetcher, Session, http_fetcher};
pub use models::ProductRecord;
pub use parser::{DetailPageExtractor, PageExtractor, SearchResultsExtractor};
pub use scrape::{RunSummary, Scraper, scrape_site};
