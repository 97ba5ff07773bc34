use serde::Deserialize;

use super::PageExtractor;
use crate::fetcher::Fetch;
use crate::models::ProductRecord;
use crate::{Error, Result};

/// Search API envelope: `{"hits": {"hits": [{"_source": {...}}, ...]}}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: ProductRecord,
}

/// Structured listings: every hit's `_source` object is a record, verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchResultsExtractor;

impl PageExtractor for SearchResultsExtractor {
    type Item = ProductRecord;

    fn items(&self, page_url: &str, body: &str) -> Result<Vec<ProductRecord>> {
        let envelope: Envelope = serde_json::from_str(body)
            .map_err(|e| Error::malformed(page_url, format!("search envelope: {e}")))?;
        Ok(envelope.hits.hits.into_iter().map(|hit| hit.source).collect())
    }

    fn resolve(&self, item: ProductRecord, _fetcher: &mut dyn Fetch) -> Result<ProductRecord> {
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "http://shop/ajax/browse?page=1";

    #[test]
    fn test_sources_are_returned_verbatim() {
        let body = json!({
            "took": 3,
            "hits": {
                "total": 2,
                "hits": [
                    {"_id": "1", "_source": {"name": "Malbec", "price": "14.99", "sku": null}},
                    {"_id": "2", "_source": {"name": "Shiraz", "tags": ["red", "dry"]}}
                ]
            }
        })
        .to_string();

        let records = SearchResultsExtractor.items(URL, &body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Malbec");
        assert!(records[0]["sku"].is_null());
        assert_eq!(records[1]["tags"], json!(["red", "dry"]));
    }

    #[test]
    fn test_empty_hits() {
        let body = r#"{"hits": {"hits": []}}"#;
        assert!(SearchResultsExtractor.items(URL, body).unwrap().is_empty());
    }

    #[test]
    fn test_missing_envelope_is_malformed() {
        let err = SearchResultsExtractor
            .items(URL, r#"{"results": []}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));

        let err = SearchResultsExtractor
            .items(URL, r#"{"hits": {"hits": [{"_id": "1"}]}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn test_error_page_is_malformed() {
        let err = SearchResultsExtractor
            .items(URL, "<html>503 Service Unavailable</html>")
            .unwrap_err();
        assert!(err.to_string().contains("search envelope"));
    }
}
