//! Data sources: momentum history and price/indicator payloads.

pub mod file;
pub mod http;
pub mod payload;
pub mod provider;

use std::time::Duration;

pub use file::FileSource;
pub use http::HttpSource;
pub use provider::{load, DataError, LoadedData, MomentumSource, Parsed};

use crate::config::{SourceConfig, SourceMode};

/// Build the source selected by configuration.
pub fn build_source(config: &SourceConfig) -> Result<Box<dyn MomentumSource>, DataError> {
    match config.mode {
        SourceMode::Static => Ok(Box::new(FileSource::with_files(
            &config.data_dir,
            &config.history_file,
            &config.prices_file,
        ))),
        SourceMode::Http => {
            let source = HttpSource::new(&config.base_url, Duration::from_secs(config.timeout_secs))?
                .with_history_path(config.history_path.clone())
                .with_prices_path(config.prices_path.clone())
                .with_stock_prices_path(config.stock_prices_path.clone());
            Ok(Box::new(source))
        }
    }
}
