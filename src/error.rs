use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Transport failure while requesting {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxedSource,
    },

    #[error("Gave up on {url} after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Unexpected response shape from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Product page {url} has {found} attribute blocks, expected 4")]
    InsufficientAttributes { url: String, found: usize },

    #[error("Invalid page range {start}..={end}")]
    InvalidPageRange { start: u32, end: u32 },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest Error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn transport(url: &str, source: impl Into<BoxedSource>) -> Self {
        Error::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        Error::MalformedResponse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Connection-level failures; the only kind the fetcher retries.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Failures confined to a single product on a detail page. The page loop
    /// logs these and moves on to the next product.
    pub fn is_product_scoped(&self) -> bool {
        matches!(
            self,
            Error::InsufficientAttributes { .. } | Error::MalformedResponse { .. }
        )
    }
}
