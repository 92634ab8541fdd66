#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::Parser;
use goldcast::cli::{self, Cli};
use goldcast::domain::error::GoldcastError;
use goldcast::domain::forecast::{ForecastGenerator, ForecastParams};
use goldcast::domain::history::{HistoricalSeriesGenerator, HistoryParams};
use goldcast::domain::live::{LiveParams, LivePriceSampler};
use goldcast::ports::clock_port::Clock;

pub struct FixedClock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn today() -> NaiveDate {
    date(2024, 3, 15)
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock {
        today: today(),
        now: Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap(),
    })
}

pub fn history_generator(seed: u64) -> HistoricalSeriesGenerator {
    HistoricalSeriesGenerator::seeded(seed, fixed_clock(), HistoryParams::default())
}

pub fn forecast_generator(seed: u64) -> ForecastGenerator {
    ForecastGenerator::seeded(seed, fixed_clock(), ForecastParams::default())
}

pub fn live_sampler(seed: u64) -> LivePriceSampler {
    LivePriceSampler::seeded(seed, fixed_clock(), LiveParams::default())
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Run the CLI against the fixed clock, returning everything written to stdout.
pub fn run_cli(args: &[&str]) -> Result<String, GoldcastError> {
    let cli = Cli::try_parse_from(std::iter::once("goldcast").chain(args.iter().copied()))
        .expect("arguments should parse");
    let mut buf: Vec<u8> = Vec::new();
    cli::execute(cli, fixed_clock(), &mut buf)?;
    Ok(String::from_utf8(buf).unwrap())
}
