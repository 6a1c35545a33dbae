//! Momentum CLI: print or export the momentum table, export chart figures,
//! manage the dashboard config.
//!
//! Commands:
//! - `table`: momentum table for every stock, optionally filtered or as CSV
//! - `chart`: Plotly-compatible figure JSON for one stock
//! - `config init`: write a default config file
//! - `config show`: print the effective config

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use momentum_core::chart::{compose_price_figure, shape_momentum_trend, ChartOptions, Figure};
use momentum_core::config::DashboardConfig;
use momentum_core::data::{build_source, load};
use momentum_core::grid::{build_columns, build_rows, SortOrder};
use momentum_core::table::{render, RenderOptions, ScoreBands, TableView};

#[derive(Parser)]
#[command(name = "momentum", about = "Momentum Board CLI: stock momentum table and charts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the momentum table (one row per stock, one column per date).
    Table {
        /// Config file. Defaults to the user config location.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Order by latest score.
        #[arg(long, value_enum, default_value_t = SortArg::Desc)]
        sort: SortArg,

        /// Keep only stocks whose code or name contains this text.
        #[arg(long)]
        filter: Option<String>,

        /// Future placeholder columns. Overrides `grid.future_days`.
        #[arg(long)]
        future: Option<usize>,

        /// Write the visible rows as CSV instead of printing.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Export the chart figure for one stock as JSON.
    Chart {
        /// Stock code, e.g. 2330.
        stock_id: String,

        /// Config file. Defaults to the user config location.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trailing trading days on the K-line. Overrides `chart.default_period`.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        period: Option<u64>,

        /// Hide the MACD panel.
        #[arg(long, default_value_t = false)]
        no_macd: bool,

        /// Hide the RSI panel.
        #[arg(long, default_value_t = false)]
        no_rsi: bool,

        /// Show the volume panel.
        #[arg(long, default_value_t = false)]
        volume: bool,

        /// Momentum trend line from the history instead of the K-line.
        #[arg(long, default_value_t = false)]
        trend: bool,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Config file management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config file with every default spelled out.
    Init {
        /// Target path. Defaults to the user config location.
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the effective config as TOML.
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Asc,
            SortArg::Desc => SortOrder::Desc,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Table {
            config,
            sort,
            filter,
            future,
            csv,
        } => {
            let config = load_config(config.as_deref())?;
            let view = build_table(&config, sort.into(), filter.as_deref(), future)?;
            match csv {
                Some(path) => {
                    let csv = view.to_csv()?;
                    std::fs::write(&path, csv).with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {} rows to {}", view.visible_count(), path.display());
                }
                None => print!("{}", format_table(&view)),
            }
            Ok(())
        }
        Commands::Chart {
            stock_id,
            config,
            period,
            no_macd,
            no_rsi,
            volume,
            trend,
            out,
        } => {
            let config = load_config(config.as_deref())?;
            let mut options = ChartOptions::from_config(&config.chart);
            if let Some(period) = period {
                options.period_days = period as usize;
            }
            options.toggles.macd &= !no_macd;
            options.toggles.rsi &= !no_rsi;
            options.show_volume |= volume;

            let figure = build_chart(&config, &stock_id, &options, trend)?;
            let json = figure.to_json().context("serializing figure")?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {} traces to {}", figure.data.len(), path.display());
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                let path = resolve_path(path)?;
                init_config(&path, force)?;
                println!("Wrote default config to {}", path.display());
                Ok(())
            }
            ConfigAction::Show { config } => {
                let config = load_config(config.as_deref())?;
                print!("{}", config.to_toml()?);
                Ok(())
            }
        },
    }
}

fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path.or_else(DashboardConfig::default_path) {
        Some(path) => Ok(path),
        None => bail!("no config directory on this platform; pass a path explicitly"),
    }
}

/// An explicit path must exist; the default location may be absent.
fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => {
            DashboardConfig::from_file(path).with_context(|| format!("loading config {}", path.display()))
        }
        None => match DashboardConfig::default_path() {
            Some(path) => DashboardConfig::load_or_default(&path)
                .with_context(|| format!("loading config {}", path.display())),
            None => Ok(DashboardConfig::default()),
        },
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let toml = DashboardConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))
}

fn build_table(
    config: &DashboardConfig,
    order: SortOrder,
    filter: Option<&str>,
    future: Option<usize>,
) -> Result<TableView> {
    let source = build_source(&config.source)?;
    let data = load(source.as_ref()).with_context(|| format!("loading momentum data from {}", source.name()))?;
    for warning in &data.warnings {
        tracing::warn!("{warning}");
    }

    let columns = build_columns(&data.history, future.unwrap_or(config.grid.future_days));
    let rows = build_rows(&data.history, &columns, order);
    let options = RenderOptions {
        show_percent: config.table.show_percent,
        bands: ScoreBands::new(config.table.score_thresholds.clone()),
    };
    let mut view = render(&rows, &columns, &options, |id| data.has_prices_for(id));
    if let Some(query) = filter {
        view.apply_filter(query);
    }
    Ok(view)
}

fn build_chart(config: &DashboardConfig, stock_id: &str, options: &ChartOptions, trend: bool) -> Result<Figure> {
    let source = build_source(&config.source)?;
    if trend {
        let history = source.fetch_history().context("loading momentum history")?;
        for reason in &history.rejected {
            tracing::warn!("{reason}");
        }
        let figure = shape_momentum_trend(history.value.require_non_empty()?, stock_id)?;
        return Ok(figure);
    }
    let stock = source
        .fetch_stock(stock_id)
        .with_context(|| format!("loading prices for {stock_id}"))?;
    Ok(compose_price_figure(stock_id, stock.as_ref(), options)?)
}

const CODE_COL: usize = 6;
const NAME_COL: usize = 12;
const DATE_COL: usize = 11;

/// Plain-text table: chart-data marker, code, name, one column per date.
fn format_table(view: &TableView) -> String {
    if view.rows.is_empty() {
        return "No momentum data\n".to_string();
    }

    let mut out = format!("  {:<CODE_COL$} {:<NAME_COL$}", "Code", "Name");
    for header in &view.headers {
        let label = if header.future {
            format!("{}*", header.label)
        } else {
            header.label.clone()
        };
        out.push_str(&format!(" {label:>DATE_COL$}"));
    }
    out.push('\n');
    out.push_str(&"-".repeat(out.chars().count().saturating_sub(1)));
    out.push('\n');

    for row in view.visible_rows() {
        let marker = if row.has_chart_data { '●' } else { '○' };
        let name: String = row.stock_name.chars().take(NAME_COL).collect();
        out.push_str(&format!("{marker} {:<CODE_COL$} {name:<NAME_COL$}", row.stock_id));
        for cell in &row.cells {
            let text = if cell.future {
                "·".to_string()
            } else if cell.is_empty() {
                "-".to_string()
            } else {
                match &cell.sub_label {
                    Some(sub) => format!("{} {sub}", cell.text),
                    None => cell.text.clone(),
                }
            };
            out.push_str(&format!(" {text:>DATE_COL$}"));
        }
        out.push('\n');
    }

    if view.visible_count() == 0 {
        out.push_str("No stocks match the filter\n");
    }
    out
}
