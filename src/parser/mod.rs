//! Listing-page extraction. A listing page yields items; each item resolves
//! to one product record, possibly through a further fetch.

mod detail_page;
mod search_results;

pub use detail_page::{DetailPageExtractor, ListingEntry, parse_listing, parse_product};
pub use search_results::SearchResultsExtractor;

use crate::Result;
use crate::fetcher::Fetch;
use crate::models::ProductRecord;

pub trait PageExtractor {
    type Item;

    /// Splits a listing page into its items. An error here aborts the run.
    fn items(&self, page_url: &str, body: &str) -> Result<Vec<Self::Item>>;

    /// Turns one item into a record. Product-scoped errors only skip the item.
    fn resolve(&self, item: Self::Item, fetcher: &mut dyn Fetch) -> Result<ProductRecord>;
}
