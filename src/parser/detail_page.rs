use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use super::PageExtractor;
use crate::fetcher::Fetch;
use crate::models::{Attributes, ProductRecord, WineDetail};
use crate::{Error, Result};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li.item"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static REGULAR_PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector("span.regular-price span.price"));
static SPECIAL_PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector("span.special-price span.price"));

static NAME: LazyLock<Selector> = LazyLock::new(|| selector("div.product-name h1"));
static SUMMARY: LazyLock<Selector> = LazyLock::new(|| selector("div.product-summary p"));
static SKU: LazyLock<Selector> = LazyLock::new(|| selector("div.product-sku"));
static ATTRIBUTE: LazyLock<Selector> = LazyLock::new(|| selector("div.attribute"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static TASTING_NOTES: LazyLock<Selector> =
    LazyLock::new(|| selector("li.tasting_notes div.value"));
static FOOD_PAIRINGS: LazyLock<Selector> =
    LazyLock::new(|| selector("li.food_pairings div.value"));
static RATING: LazyLock<Selector> = LazyLock::new(|| selector("div.extra-info div.rating"));

// e.g. style="width:80%"
static RATING_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[a-z-]+\s*:\s*(\d+(?:\.\d+)?%?)\s*;?\s*$").unwrap());

/// One `li.item` from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Absolute product page URL, `None` when the item has no usable link.
    pub url: Option<String>,
    pub price: Option<String>,
}

/// HTML listings whose items link to a product page holding the details.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetailPageExtractor;

impl PageExtractor for DetailPageExtractor {
    type Item = ListingEntry;

    fn items(&self, page_url: &str, body: &str) -> Result<Vec<ListingEntry>> {
        let base = Url::parse(page_url).map_err(|e| Error::malformed(page_url, e.to_string()))?;
        Ok(parse_listing(&base, body))
    }

    fn resolve(&self, item: ListingEntry, fetcher: &mut dyn Fetch) -> Result<ProductRecord> {
        let url = item
            .url
            .ok_or_else(|| Error::malformed("<listing>", "item without a product link"))?;
        let body = fetcher.fetch(&url)?;
        let mut detail = parse_product(&url, &body)?;
        detail.price = item.price;
        Ok(detail.into_record()?)
    }
}

pub fn parse_listing(base: &Url, html: &str) -> Vec<ListingEntry> {
    let doc = Html::parse_document(html);

    doc.select(&ITEM)
        .map(|item| {
            let url = item
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| base.join(href).ok())
                .map(String::from);
            let price = item
                .select(&REGULAR_PRICE)
                .next()
                .or_else(|| item.select(&SPECIAL_PRICE).next())
                .map(text_of);
            ListingEntry { url, price }
        })
        .collect()
}

/// Parses a product page. Name, summary, sku and the four attribute blocks
/// are required; the remaining fields fall back to `None`.
pub fn parse_product(url: &str, html: &str) -> Result<WineDetail> {
    let doc = Html::parse_document(html);

    let name = required(&doc, &NAME, url, "product name")?;
    let summary = required(&doc, &SUMMARY, url, "product summary")?;
    let sku = doc
        .select(&SKU)
        .next()
        .and_then(|el| el.text().next())
        .and_then(|label| label.split_once(": "))
        .map(|(_, sku)| sku.trim().to_string())
        .ok_or_else(|| Error::malformed(url, "missing product sku"))?;

    let blocks: Vec<Option<String>> = doc
        .select(&ATTRIBUTE)
        .map(|block| block.select(&PARAGRAPH).next().map(text_of))
        .collect();
    let found = blocks.len();
    let attributes = Attributes::from_positional(blocks).ok_or_else(|| {
        Error::InsufficientAttributes {
            url: url.to_string(),
            found,
        }
    })?;

    Ok(WineDetail {
        name,
        summary,
        sku,
        url: url.to_string(),
        price: None,
        attributes,
        rating: rating(&doc, url),
        tasting_notes: optional(&doc, &TASTING_NOTES),
        food_pairings: optional(&doc, &FOOD_PAIRINGS),
    })
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn required(doc: &Html, sel: &Selector, url: &str, what: &str) -> Result<String> {
    doc.select(sel)
        .next()
        .map(text_of)
        .ok_or_else(|| Error::malformed(url, format!("missing {what}")))
}

fn optional(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty())
}

fn rating(doc: &Html, url: &str) -> Option<String> {
    let style = doc.select(&RATING).next()?.value().attr("style")?;
    let rating = RATING_STYLE
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    if rating.is_none() {
        debug!("ignoring unrecognised rating style {:?} on {}", style, url);
    }
    rating
}
