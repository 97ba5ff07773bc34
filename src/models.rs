use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One listing item. The pipeline never looks inside it.
pub type ProductRecord = Map<String, Value>;

/// The four attribute blocks of a product page, read by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub country: Option<String>,
    pub region: Option<String>,
    pub style: Option<String>,
    pub grape: Option<String>,
}

impl Attributes {
    pub const EXPECTED: usize = 4;

    /// Fills the slots from the first four values. `None` if fewer than four
    /// blocks were found; blocks beyond the fourth are ignored.
    pub fn from_positional(mut values: Vec<Option<String>>) -> Option<Self> {
        if values.len() < Self::EXPECTED {
            return None;
        }
        values.truncate(Self::EXPECTED);
        let mut slots = values.into_iter();
        Some(Self {
            country: slots.next().flatten(),
            region: slots.next().flatten(),
            style: slots.next().flatten(),
            grape: slots.next().flatten(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineDetail {
    pub name: String,
    pub summary: String,
    pub sku: String,
    pub url: String,
    pub price: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
    pub rating: Option<String>,
    pub tasting_notes: Option<String>,
    pub food_pairings: Option<String>,
}

impl WineDetail {
    pub fn into_record(self) -> serde_json::Result<ProductRecord> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "expected an object, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_attributes_by_position() {
        let attrs = Attributes::from_positional(vec![
            some("Canada"),
            None,
            some("Rosé"),
            some("Pinot Noir"),
            some("extra"),
        ])
        .unwrap();
        assert_eq!(attrs.country.as_deref(), Some("Canada"));
        assert_eq!(attrs.region, None);
        assert_eq!(attrs.grape.as_deref(), Some("Pinot Noir"));
    }

    #[test]
    fn test_attributes_too_few() {
        assert!(Attributes::from_positional(vec![some("Canada"), some("BC")]).is_none());
        assert!(Attributes::from_positional(Vec::new()).is_none());
    }

    #[test]
    fn test_detail_record_is_flat() {
        let detail = WineDetail {
            name: "Rosé".into(),
            summary: "Dry".into(),
            sku: "123".into(),
            url: "https://shop/rose".into(),
            price: None,
            attributes: Attributes {
                country: some("France"),
                ..Default::default()
            },
            rating: None,
            tasting_notes: None,
            food_pairings: None,
        };
        let record = detail.into_record().unwrap();
        assert_eq!(record["country"], "France");
        assert_eq!(record["grape"], Value::Null);
        assert_eq!(record["price"], Value::Null);
        assert_eq!(record.len(), 12);

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "name", "summary", "sku", "url", "price", "country", "region", "style", "grape",
                "rating", "tasting_notes", "food_pairings"
            ]
        );
    }
}
