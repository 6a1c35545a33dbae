//! Background worker thread: all source I/O runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The worker
//! keeps the last loaded price book so chart requests for stocks it already
//! holds are answered without touching the source.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use momentum_core::data::{self, LoadedData, MomentumSource};
use momentum_core::domain::{PriceBook, StockPrices};

/// Identifies one chart request. `seq` grows with every selection, so a
/// response can be matched against the most recent request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTicket {
    pub stock_id: String,
    pub seq: u64,
}

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Load history (and prices, if the source has them).
    Load { generation: u64 },
    /// Fetch chart data for one stock.
    LoadChart { ticket: ChartTicket },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Loaded {
        generation: u64,
        result: Result<LoadedData, String>,
    },
    ChartLoaded {
        ticket: ChartTicket,
        /// `Ok(None)` means the source has no price data for the stock.
        result: Result<Option<StockPrices>, String>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    source: Box<dyn MomentumSource>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("momentum-worker".into())
        .spawn(move || {
            Worker::new(source).run(rx, tx);
        })
}

struct Worker {
    source: Box<dyn MomentumSource>,
    prices: Option<Arc<PriceBook>>,
}

impl Worker {
    fn new(source: Box<dyn MomentumSource>) -> Self {
        Self { source, prices: None }
    }

    fn run(mut self, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
        tracing::info!(source = self.source.name(), "worker started");
        loop {
            let response = match rx.recv() {
                Ok(WorkerCommand::Shutdown) | Err(_) => break,
                Ok(WorkerCommand::Load { generation }) => WorkerResponse::Loaded {
                    generation,
                    result: self.load(),
                },
                Ok(WorkerCommand::LoadChart { ticket }) => {
                    let result = self.chart_data(&ticket.stock_id);
                    WorkerResponse::ChartLoaded { ticket, result }
                }
            };
            if tx.send(response).is_err() {
                break;
            }
        }
        tracing::info!("worker stopped");
    }

    fn load(&mut self) -> Result<LoadedData, String> {
        match data::load(self.source.as_ref()) {
            Ok(loaded) => {
                self.prices = loaded.prices.clone();
                Ok(loaded)
            }
            Err(e) => {
                tracing::error!(error = %e, "load failed");
                Err(e.to_string())
            }
        }
    }

    fn chart_data(&self, stock_id: &str) -> Result<Option<StockPrices>, String> {
        if let Some(stock) = self.prices.as_ref().and_then(|book| book.get(stock_id)) {
            return Ok(Some(stock.clone()));
        }
        tracing::debug!(stock_id, "price book miss, asking source");
        self.source.fetch_stock(stock_id).map_err(|e| {
            tracing::warn!(stock_id, error = %e, "chart fetch failed");
            e.to_string()
        })
    }
}
