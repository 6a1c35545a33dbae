//! Backend HTTP source.
//!
//! Talks to the dashboard's backend API with a blocking reqwest client. Meant
//! to be driven from a worker thread, never the UI thread. No retries: a
//! failure surfaces immediately and the user retries by hand.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use super::payload::{parse_history, parse_price_book, parse_stock};
use super::provider::{DataError, MomentumSource, Parsed};
use crate::domain::{MomentumHistory, PriceBook, StockPrices};

/// Placeholder substituted in the per-stock path template.
pub const STOCK_ID_PLACEHOLDER: &str = "{stock_id}";

pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
    history_path: String,
    prices_path: Option<String>,
    stock_prices_path: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("momentum-board/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::FetchFailure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            history_path: "/api/data".into(),
            prices_path: None,
            stock_prices_path: None,
        })
    }

    pub fn with_history_path(mut self, path: impl Into<String>) -> Self {
        self.history_path = path.into();
        self
    }

    pub fn with_prices_path(mut self, path: Option<String>) -> Self {
        self.prices_path = path;
        self
    }

    /// Per-stock endpoint; must contain `{stock_id}`.
    pub fn with_stock_prices_path(mut self, template: Option<String>) -> Self {
        self.stock_prices_path = template;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a resource. `Ok(None)` on 404 when `absent_ok` is set.
    fn get(&self, url: &str, absent_ok: bool) -> Result<Option<Vec<u8>>, DataError> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::FetchFailure(format!("{url}: {e}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND && absent_ok {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DataError::FetchFailure(format!("HTTP {status} for {url}")));
        }

        let body = resp
            .bytes()
            .map_err(|e| DataError::FetchFailure(format!("reading body of {url}: {e}")))?;
        Ok(Some(body.to_vec()))
    }
}

impl MomentumSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_history(&self) -> Result<Parsed<MomentumHistory>, DataError> {
        let url = self.url(&self.history_path);
        match self.get(&url, false)? {
            Some(bytes) => parse_history(&bytes),
            None => Err(DataError::FetchFailure(format!("empty response from {url}"))),
        }
    }

    fn fetch_prices(&self) -> Result<Option<Parsed<PriceBook>>, DataError> {
        let Some(path) = &self.prices_path else {
            return Ok(None);
        };
        let url = self.url(path);
        self.get(&url, true)?
            .map(|bytes| parse_price_book(&bytes))
            .transpose()
    }

    fn fetch_stock(&self, stock_id: &str) -> Result<Option<StockPrices>, DataError> {
        let Some(template) = &self.stock_prices_path else {
            return Ok(self
                .fetch_prices()?
                .and_then(|mut book| book.value.remove(stock_id)));
        };
        let url = self.url(&template.replace(STOCK_ID_PLACEHOLDER, stock_id));
        self.get(&url, true)?
            .map(|bytes| parse_stock(stock_id, &bytes))
            .transpose()
    }
}
