//! CLI definition and dispatch.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::csv_adapter::CsvExporter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonExporter;
use crate::adapters::system_clock::SystemClock;
use crate::adapters::table_adapter::TableExporter;
use crate::domain::asset::{Asset, AssetListError, parse_derived_assets};
use crate::domain::config_validation::{DEFAULT_INTERVAL_SECS, validate_generator_config};
use crate::domain::error::GoldcastError;
use crate::domain::forecast::{ForecastGenerator, ForecastHorizon, ForecastParams, ForecastSummary};
use crate::domain::history::{HistoricalSeriesGenerator, HistoryParams, HistoryPeriod};
use crate::domain::live::{LiveParams, LivePriceSampler, PricePoint};
use crate::domain::{insights, model_metrics, news, upload};
use crate::feed::LiveFeed;
use crate::ports::clock_port::Clock;
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;

#[derive(Parser, Debug)]
#[command(name = "goldcast", about = "Synthetic gold price, history and forecast generator")]
pub struct Cli {
    /// INI file overriding generator defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Seed for reproducible output
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Csv,
    Json,
}

/// Derived assets selected on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetList(pub Vec<Asset>);

fn parse_asset_list(s: &str) -> Result<AssetList, AssetListError> {
    parse_derived_assets(s).map(AssetList)
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the historical multi-asset series ending today
    History {
        #[arg(
            long,
            allow_negative_numbers = true,
            required_unless_present = "period",
            conflicts_with = "period"
        )]
        days: Option<i64>,
        /// 1W, 1M, 3M or 1Y
        #[arg(long)]
        period: Option<HistoryPeriod>,
        /// Derived assets to chart, e.g. silver,bitcoin
        #[arg(long, value_parser = parse_asset_list)]
        assets: Option<AssetList>,
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sample the live price once, or watch the live feed
    Live {
        #[arg(long)]
        watch: bool,
        /// Readings to print in watch mode
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
        count: u64,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: Option<u64>,
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Print the price forecast starting tomorrow
    Forecast {
        #[arg(
            long,
            allow_negative_numbers = true,
            required_unless_present = "horizon",
            conflicts_with = "horizon"
        )]
        days: Option<i64>,
        /// 7D, 15D or 30D
        #[arg(long)]
        horizon: Option<ForecastHorizon>,
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print market headlines
    News {
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Print the investment insight cards
    Insights {
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Print model performance figures
    Metrics {
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Write the sample upload template
    SampleCsv {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Generator settings resolved from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub seed: Option<u64>,
    pub history: HistoryParams,
    pub live: LiveParams,
    pub forecast: ForecastParams,
    pub interval: Duration,
}

pub fn run(cli: Cli) -> ExitCode {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(cli, Arc::new(SystemClock), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, GoldcastError> {
    FileConfigAdapter::from_file(path).map_err(|e| GoldcastError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, GoldcastError> {
    validate_generator_config(config)?;

    let history_defaults = HistoryParams::default();
    let derived = match config.get_string("history", "assets") {
        Some(list) => parse_derived_assets(&list).map_err(|e| GoldcastError::ConfigInvalid {
            section: "history".into(),
            key: "assets".into(),
            reason: e.to_string(),
        })?,
        None => history_defaults.derived,
    };

    Ok(Settings {
        seed: config.get_u64("random", "seed").and_then(Result::ok),
        history: HistoryParams {
            base_price: config.get_double("history", "base_price", history_defaults.base_price),
            max_step: config.get_double("history", "max_step", history_defaults.max_step),
            derived,
        },
        live: {
            let d = LiveParams::default();
            LiveParams {
                reference_price: config.get_double("live", "reference_price", d.reference_price),
                price_spread: config.get_double("live", "price_spread", d.price_spread),
                change_spread: config.get_double("live", "change_spread", d.change_spread),
            }
        },
        forecast: {
            let d = ForecastParams::default();
            ForecastParams {
                seed_price: config.get_double("forecast", "seed_price", d.seed_price),
                max_rise: config.get_double("forecast", "max_rise", d.max_rise),
                max_fall: config.get_double("forecast", "max_fall", d.max_fall),
                stable_threshold: config.get_double(
                    "forecast",
                    "stable_threshold",
                    d.stable_threshold,
                ),
            }
        },
        interval: Duration::from_secs(
            config.get_int("live", "interval_secs", DEFAULT_INTERVAL_SECS) as u64,
        ),
    })
}

/// Run one command against `clock`, writing data to `out` unless the command
/// names an output file.
pub fn execute(cli: Cli, clock: Arc<dyn Clock>, out: &mut dyn Write) -> Result<(), GoldcastError> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    let mut settings = build_settings(&config)?;
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    match cli.command {
        Command::History {
            days,
            period,
            assets,
            format,
            output,
        } => {
            let days = resolve_days(days, period.map(HistoryPeriod::days));
            if let Some(AssetList(assets)) = assets {
                settings.history.derived = assets;
            }
            run_history(&settings, clock, days, format, output.as_deref(), out)
        }
        Command::Live {
            watch,
            count,
            interval_secs,
            format,
        } => {
            if let Some(secs) = interval_secs {
                settings.interval = Duration::from_secs(secs);
            }
            if watch {
                run_live_watch(&settings, clock, count, format, out)
            } else {
                let mut sampler = live_sampler(&settings, clock);
                exporter(format).write_price(&sampler.sample(), out)
            }
        }
        Command::Forecast {
            days,
            horizon,
            format,
            output,
        } => {
            let days = resolve_days(days, horizon.map(ForecastHorizon::days));
            run_forecast(&settings, clock, days, format, output.as_deref(), out)
        }
        Command::News { format } => {
            let items = news::headlines(clock.now());
            match format {
                Format::Table => TableExporter::new().write_news(&items, out),
                Format::Csv => CsvExporter::new().write_records(&items, out),
                Format::Json => JsonExporter::new().write_value(&items, out),
            }
        }
        Command::Insights { format } => {
            let panel = insights::panel();
            match format {
                Format::Table => TableExporter::new().write_insights(&panel, out),
                Format::Csv => CsvExporter::new().write_records(&panel.insights, out),
                Format::Json => JsonExporter::new().write_value(&panel, out),
            }
        }
        Command::Metrics { format } => {
            let metrics = model_metrics::snapshot();
            match format {
                Format::Table => TableExporter::new().write_metrics(&metrics, out),
                Format::Csv => CsvExporter::new().write_records(&[metrics], out),
                Format::Json => JsonExporter::new().write_value(&metrics, out),
            }
        }
        Command::SampleCsv { output } => with_output(output.as_deref(), out, |w| {
            CsvExporter::new().write_sample_template(&upload::sample_rows(), w)
        }),
    }
}

/// clap guarantees exactly one of the two is present.
fn resolve_days(days: Option<i64>, preset: Option<i64>) -> i64 {
    days.or(preset).unwrap_or_default()
}

fn exporter(format: Format) -> Box<dyn ExportPort> {
    match format {
        Format::Table => Box::new(TableExporter::new()),
        Format::Csv => Box::new(CsvExporter::new()),
        Format::Json => Box::new(JsonExporter::new()),
    }
}

fn with_output<F>(path: Option<&Path>, out: &mut dyn Write, write: F) -> Result<(), GoldcastError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), GoldcastError>,
{
    match path {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            write(&mut file)?;
            file.flush()?;
            tracing::info!(path = %path.display(), "wrote output");
            Ok(())
        }
        None => write(out),
    }
}

fn live_sampler(settings: &Settings, clock: Arc<dyn Clock>) -> LivePriceSampler {
    let params = settings.live.clone();
    match settings.seed {
        Some(seed) => LivePriceSampler::seeded(seed, clock, params),
        None => LivePriceSampler::from_entropy(clock, params),
    }
}

fn run_history(
    settings: &Settings,
    clock: Arc<dyn Clock>,
    days: i64,
    format: Format,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), GoldcastError> {
    let params = settings.history.clone();
    let mut generator = match settings.seed {
        Some(seed) => HistoricalSeriesGenerator::seeded(seed, clock, params),
        None => HistoricalSeriesGenerator::from_entropy(clock, params),
    };
    let series = generator.generate(days)?;
    with_output(output, out, |w| exporter(format).write_history(&series, w))
}

fn run_forecast(
    settings: &Settings,
    clock: Arc<dyn Clock>,
    days: i64,
    format: Format,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), GoldcastError> {
    let params = settings.forecast.clone();
    let mut generator = match settings.seed {
        Some(seed) => ForecastGenerator::seeded(seed, clock, params),
        None => ForecastGenerator::from_entropy(clock, params),
    };
    let points = generator.generate(days)?;
    with_output(output, out, |w| {
        exporter(format).write_forecast(&points, w)?;
        if format == Format::Table {
            if let Some(summary) = ForecastSummary::from_points(&points) {
                TableExporter::new().write_summary(&summary, w)?;
            }
        }
        Ok(())
    })
}

fn run_live_watch(
    settings: &Settings,
    clock: Arc<dyn Clock>,
    count: u64,
    format: Format,
    out: &mut dyn Write,
) -> Result<(), GoldcastError> {
    let feed = LiveFeed::new(live_sampler(settings, clock), settings.interval)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let export = exporter(format);

    let readings = runtime.block_on(async {
        let mut rx = feed.subscribe();
        let handle = feed.start();
        let mut readings: Vec<PricePoint> = Vec::new();

        while (readings.len() as u64) < count {
            match rx.recv().await {
                Ok(point) => {
                    if format == Format::Table {
                        export.write_price(&point, out)?;
                        out.flush()?;
                    }
                    readings.push(point);
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "live feed reader lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }

        handle.stop().await?;
        Ok::<_, GoldcastError>(readings)
    })?;

    if format != Format::Table {
        export.write_prices(&readings, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_days_prefers_explicit_days() {
        assert_eq!(resolve_days(Some(-1), None), -1);
        assert_eq!(resolve_days(None, Some(30)), 30);
    }

    #[test]
    fn parses_history_with_negative_days() {
        let cli = Cli::try_parse_from(["goldcast", "history", "--days", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::History { days: Some(-1), .. }));
    }

    #[test]
    fn days_and_period_conflict() {
        let result =
            Cli::try_parse_from(["goldcast", "history", "--days", "7", "--period", "1M"]);
        assert!(result.is_err());
    }

    #[test]
    fn history_requires_days_or_period() {
        assert!(Cli::try_parse_from(["goldcast", "history"]).is_err());
    }

    #[test]
    fn parses_horizon_and_global_seed() {
        let cli =
            Cli::try_parse_from(["goldcast", "forecast", "--horizon", "15D", "--seed", "9"])
                .unwrap();
        assert_eq!(cli.seed, Some(9));
        assert!(matches!(
            cli.command,
            Command::Forecast {
                horizon: Some(ForecastHorizon::Fortnight),
                ..
            }
        ));
    }

    #[test]
    fn rejects_gold_in_asset_list() {
        let result = Cli::try_parse_from([
            "goldcast", "history", "--days", "3", "--assets", "gold,silver",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn live_count_must_be_positive() {
        assert!(Cli::try_parse_from(["goldcast", "live", "--watch", "--count", "0"]).is_err());
    }
}
