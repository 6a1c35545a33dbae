//! Static-file source: reads the JSON exports the generator writes next to
//! the dashboard.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::payload::{parse_history, parse_price_book};
use super::provider::{DataError, MomentumSource, Parsed};
use crate::domain::{MomentumHistory, PriceBook};

pub const DEFAULT_HISTORY_FILE: &str = "historical_data.json";
pub const DEFAULT_PRICES_FILE: &str = "stock_price_data.json";

pub struct FileSource {
    history_path: PathBuf,
    prices_path: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_files(data_dir, DEFAULT_HISTORY_FILE, DEFAULT_PRICES_FILE)
    }

    pub fn with_files(data_dir: impl AsRef<Path>, history_file: &str, prices_file: &str) -> Self {
        let dir = data_dir.as_ref();
        Self {
            history_path: dir.join(history_file),
            prices_path: dir.join(prices_file),
        }
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn prices_path(&self) -> &Path {
        &self.prices_path
    }
}

/// An unreadable file is a failed fetch, the same as an unreachable host.
fn read_failure(path: &Path, e: std::io::Error) -> DataError {
    DataError::FetchFailure(format!("{}: {e}", path.display()))
}

impl MomentumSource for FileSource {
    fn name(&self) -> &str {
        "static_files"
    }

    fn fetch_history(&self) -> Result<Parsed<MomentumHistory>, DataError> {
        debug!(path = %self.history_path.display(), "reading history file");
        let bytes = std::fs::read(&self.history_path).map_err(|e| read_failure(&self.history_path, e))?;
        parse_history(&bytes)
    }

    fn fetch_prices(&self) -> Result<Option<Parsed<PriceBook>>, DataError> {
        let bytes = match std::fs::read(&self.prices_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.prices_path.display(), "no price file");
                return Ok(None);
            }
            Err(e) => return Err(read_failure(&self.prices_path, e)),
        };
        parse_price_book(&bytes).map(Some)
    }
}
