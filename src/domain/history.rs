//! Historical multi-asset price series.
//!
//! The gold price follows a random walk from a fixed base level, one step per
//! calendar day, ending today. Derived assets are fixed multiples of the
//! unrounded walk level for the same day.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::asset::{Asset, DEFAULT_DERIVED};
use super::error::GoldcastError;
use super::rounding::round2;
use crate::ports::clock_port::Clock;

/// Walk level before the first day's step.
pub const DEFAULT_BASE_PRICE: f64 = 2000.0;
/// Daily steps are drawn uniformly from `[-max_step, +max_step)`.
pub const DEFAULT_MAX_STEP: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetValue {
    pub asset: Asset,
    pub value: f64,
}

/// One day of the historical chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataPoint {
    pub date: NaiveDate,
    pub gold: f64,
    pub derived: Vec<AssetValue>,
}

impl ChartDataPoint {
    /// Build a point from the unrounded walk level. Every field is rounded
    /// independently from `level`.
    pub fn from_level(date: NaiveDate, level: f64, derived: &[Asset]) -> Self {
        Self {
            date,
            gold: round2(level),
            derived: derived
                .iter()
                .map(|&asset| AssetValue {
                    asset,
                    value: round2(level * asset.ratio()),
                })
                .collect(),
        }
    }

    pub fn value(&self, asset: Asset) -> Option<f64> {
        if asset.is_primary() {
            return Some(self.gold);
        }
        self.derived
            .iter()
            .find(|v| v.asset == asset)
            .map(|v| v.value)
    }
}

impl Serialize for ChartDataPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.derived.len()))?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry(Asset::Gold.key(), &self.gold)?;
        for v in &self.derived {
            map.serialize_entry(v.asset.key(), &v.value)?;
        }
        map.end()
    }
}

/// Daily series, oldest first, ending today with no gaps.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct HistoricalSeries {
    points: Vec<ChartDataPoint>,
}

impl HistoricalSeries {
    pub fn points(&self) -> &[ChartDataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&ChartDataPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ChartDataPoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChartDataPoint> {
        self.points.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Assets present on every point, gold first.
    pub fn assets(&self) -> Vec<Asset> {
        let mut assets = vec![Asset::Gold];
        if let Some(first) = self.points.first() {
            assets.extend(first.derived.iter().map(|v| v.asset));
        }
        assets
    }

    /// One chart line: `(date, value)` pairs for `asset`, or `None` if the
    /// series was generated without it.
    pub fn values(&self, asset: Asset) -> Option<Vec<(NaiveDate, f64)>> {
        self.points
            .iter()
            .map(|p| p.value(asset).map(|v| (p.date, v)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a HistoricalSeries {
    type Item = &'a ChartDataPoint;
    type IntoIter = std::slice::Iter<'a, ChartDataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryParams {
    pub base_price: f64,
    pub max_step: f64,
    pub derived: Vec<Asset>,
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
            max_step: DEFAULT_MAX_STEP,
            derived: DEFAULT_DERIVED.to_vec(),
        }
    }
}

pub struct HistoricalSeriesGenerator<R = StdRng> {
    rng: R,
    clock: Arc<dyn Clock>,
    params: HistoryParams,
}

impl HistoricalSeriesGenerator<StdRng> {
    pub fn seeded(seed: u64, clock: Arc<dyn Clock>, params: HistoryParams) -> Self {
        Self::new(StdRng::seed_from_u64(seed), clock, params)
    }

    pub fn from_entropy(clock: Arc<dyn Clock>, params: HistoryParams) -> Self {
        Self::new(StdRng::from_entropy(), clock, params)
    }
}

impl<R: Rng> HistoricalSeriesGenerator<R> {
    pub fn new(rng: R, clock: Arc<dyn Clock>, params: HistoryParams) -> Self {
        Self { rng, clock, params }
    }

    /// Generate `days + 1` points spanning `today - days ..= today`.
    pub fn generate(&mut self, days: i64) -> Result<HistoricalSeries, GoldcastError> {
        if days < 0 {
            tracing::warn!(days, "rejected historical series request");
            return Err(GoldcastError::invalid_days(days, "must be non-negative"));
        }

        let today = self.clock.today();
        let start = today
            .checked_sub_days(Days::new(days as u64))
            .ok_or_else(|| GoldcastError::invalid_days(days, "reaches before the earliest date"))?;

        let mut level = self.params.base_price;
        let mut points = Vec::with_capacity(days as usize + 1);
        for date in start.iter_days().take(days as usize + 1) {
            level += self.sample_step();
            points.push(ChartDataPoint::from_level(date, level, &self.params.derived));
        }

        tracing::debug!(days, points = points.len(), %today, "generated historical series");
        Ok(HistoricalSeries { points })
    }

    fn sample_step(&mut self) -> f64 {
        let max = self.params.max_step;
        if max > 0.0 {
            self.rng.gen_range(-max..max)
        } else {
            0.0
        }
    }
}

/// Bounded period choices offered by the chart's range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPeriod {
    Week,
    Month,
    Quarter,
    Year,
}

impl HistoryPeriod {
    pub const ALL: [HistoryPeriod; 4] = [
        HistoryPeriod::Week,
        HistoryPeriod::Month,
        HistoryPeriod::Quarter,
        HistoryPeriod::Year,
    ];

    pub fn days(self) -> i64 {
        match self {
            HistoryPeriod::Week => 7,
            HistoryPeriod::Month => 30,
            HistoryPeriod::Quarter => 90,
            HistoryPeriod::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HistoryPeriod::Week => "1W",
            HistoryPeriod::Month => "1M",
            HistoryPeriod::Quarter => "3M",
            HistoryPeriod::Year => "1Y",
        }
    }
}

impl FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        HistoryPeriod::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown period '{s}' (expected 1W, 1M, 3M or 1Y)"))
    }
}
