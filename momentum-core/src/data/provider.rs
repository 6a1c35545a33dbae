//! Source trait and structured error types.
//!
//! The MomentumSource trait abstracts over where the precomputed payloads live
//! (static JSON files next to the dashboard, or a backend HTTP API) so the grid,
//! table, and chart layers never know which mode they run in.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{MomentumHistory, PriceBook, StockPrices};

/// Structured error types for data operations.
///
/// Displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("fetch failed: {0}")]
    FetchFailure(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("momentum history is empty")]
    EmptyHistory,
}

/// A parsed payload plus the reasons any of its records were left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub rejected: Vec<String>,
}

impl<T> Parsed<T> {
    /// A payload where nothing was rejected.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            rejected: Vec::new(),
        }
    }
}

/// Trait for momentum data sources.
pub trait MomentumSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the full momentum history. Mandatory for the dashboard.
    fn fetch_history(&self) -> Result<Parsed<MomentumHistory>, DataError>;

    /// Fetch the bulk price/indicator book. `Ok(None)` when the resource
    /// does not exist.
    fn fetch_prices(&self) -> Result<Option<Parsed<PriceBook>>, DataError>;

    /// Fetch price data for a single stock.
    fn fetch_stock(&self, stock_id: &str) -> Result<Option<StockPrices>, DataError> {
        Ok(self
            .fetch_prices()?
            .and_then(|mut book| book.value.remove(stock_id)))
    }
}

/// Everything one load cycle produced.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub history: MomentumHistory,
    pub prices: Option<Arc<PriceBook>>,
    /// Non-fatal problems surfaced to the user, such as a failed price fetch.
    pub warnings: Vec<String>,
}

impl LoadedData {
    pub fn has_prices_for(&self, stock_id: &str) -> bool {
        self.prices
            .as_ref()
            .is_some_and(|book| book.contains_key(stock_id))
    }
}

/// Run one load cycle against a source.
///
/// History failures abort the load. Price failures and rejected records
/// degrade to warnings.
pub fn load(source: &dyn MomentumSource) -> Result<LoadedData, DataError> {
    let Parsed {
        value: history,
        rejected,
    } = source.fetch_history()?;
    info!(
        source = source.name(),
        dates = history.date_count(),
        "momentum history loaded"
    );

    let mut warnings = rejected;
    let prices = match source.fetch_prices() {
        Ok(Some(Parsed { value: book, rejected })) => {
            info!(source = source.name(), stocks = book.len(), "price data loaded");
            warnings.extend(rejected);
            Some(Arc::new(book))
        }
        Ok(None) => {
            info!(source = source.name(), "no bulk price data available");
            None
        }
        Err(e) => {
            warn!(source = source.name(), error = %e, "price data unavailable, charts disabled");
            warnings.push(format!("price data unavailable: {e}"));
            None
        }
    };

    Ok(LoadedData {
        history,
        prices,
        warnings,
    })
}
