//! HTTP fetching with session replacement on transport failure.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::redirect;

use crate::retry::{FixedRetries, RetryPolicy};
use crate::{Error, Result};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/48.0.2564.109 Safari/537.36";

/// Anything that can turn a URL into a response body.
pub trait Fetch {
    fn fetch(&mut self, url: &str) -> Result<String>;
}

/// One reusable connection session. Implementations report connection
/// problems as [`Error::Transport`]; HTTP error statuses are not failures.
pub trait Session {
    fn get(&mut self, url: &str) -> Result<String>;
}

pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    /// `timeout` is applied as given: `None` disables reqwest's default
    /// 30 second request timeout.
    pub fn connect(timeout: Option<Duration>) -> Result<Self> {
        let redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > 10 {
                attempt.error("Too many redirects (>10)")
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .redirect(redirect_policy)
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Session for HttpSession {
    fn get(&mut self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| classify(url, e))?;
        if !resp.status().is_success() {
            debug!("{} answered {}", url, resp.status());
        }
        resp.text().map_err(|e| classify(url, e))
    }
}

/// Failures while connecting, sending or reading the body, and timeouts, are
/// transport errors. Builder, redirect and decode errors are not retried.
fn classify(url: &str, e: reqwest::Error) -> Error {
    if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() {
        Error::transport(url, e)
    } else {
        Error::Http(e)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-CA,en;q=0.8"));
    headers
}

/// Fetches through a session, throwing the session away and building a fresh
/// one before every retry.
pub struct Fetcher<S, F> {
    session: S,
    new_session: F,
    policy: Box<dyn RetryPolicy>,
}

impl<S, F> Fetcher<S, F>
where
    S: Session,
    F: FnMut() -> Result<S>,
{
    pub fn new(mut new_session: F) -> Result<Self> {
        let session = new_session()?;
        Ok(Self {
            session,
            new_session,
            policy: Box::new(FixedRetries::default()),
        })
    }

    pub fn with_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }
}

/// A fetcher over real HTTP sessions with the default retry budget.
pub fn http_fetcher(
    timeout: Option<Duration>,
) -> Result<Fetcher<HttpSession, impl FnMut() -> Result<HttpSession>>> {
    Fetcher::new(move || HttpSession::connect(timeout))
}

impl<S, F> Fetch for Fetcher<S, F>
where
    S: Session,
    F: FnMut() -> Result<S>,
{
    fn fetch(&mut self, url: &str) -> Result<String> {
        let mut failures = 0;
        loop {
            let err = match self.session.get(url) {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transport() => e,
                Err(e) => return Err(e),
            };

            failures += 1;
            if !self.policy.should_retry(failures) {
                return Err(Error::RetriesExhausted {
                    url: url.to_string(),
                    attempts: failures,
                    source: Box::new(err),
                });
            }

            warn!("{} (attempt {}), reconnecting", err, failures);
            self.session = (self.new_session)()?;
        }
    }
}
