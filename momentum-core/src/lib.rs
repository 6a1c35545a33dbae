//! Momentum Board Core: data sources, date grid, table view model, chart shaping.
//!
//! This crate contains everything the dashboard front-ends share:
//! - Domain types (momentum history, price and indicator series)
//! - Data sources for static JSON files and the backend HTTP API
//! - Date grid construction with synthesized future weekday columns
//! - Table view model with sorting, filtering, and single selection
//! - Chart shaping into Plotly-compatible trace/layout figures
//! - TOML configuration

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod grid;
pub mod table;
