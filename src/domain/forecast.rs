//! Forward-looking price forecast.
//!
//! The forecast is a single connected walk starting from a seed price. Each
//! day flips a trend coin: heads draws a rise in `[0, max_rise)`, tails a fall
//! in `(-max_fall, 0]`. The day's trend label comes from the size and sign of
//! that step, and a synthetic confidence score is attached to every point.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::error::GoldcastError;
use super::rounding::{round2, round_half_up};
use crate::ports::clock_port::Clock;

pub const DEFAULT_SEED_PRICE: f64 = 2050.0;
pub const DEFAULT_MAX_RISE: f64 = 20.0;
pub const DEFAULT_MAX_FALL: f64 = 15.0;
/// Steps smaller than this in magnitude are labelled stable.
pub const DEFAULT_STABLE_THRESHOLD: f64 = 5.0;
pub const CONFIDENCE_MIN: u8 = 70;
pub const CONFIDENCE_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable when `|change| < threshold`, otherwise the sign of `change`.
pub fn classify_trend(change: f64, threshold: f64) -> Trend {
    if change.abs() < threshold {
        Trend::Stable
    } else if change > 0.0 {
        Trend::Up
    } else {
        Trend::Down
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub confidence: u8,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastParams {
    pub seed_price: f64,
    pub max_rise: f64,
    pub max_fall: f64,
    pub stable_threshold: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            seed_price: DEFAULT_SEED_PRICE,
            max_rise: DEFAULT_MAX_RISE,
            max_fall: DEFAULT_MAX_FALL,
            stable_threshold: DEFAULT_STABLE_THRESHOLD,
        }
    }
}

pub struct ForecastGenerator<R = StdRng> {
    rng: R,
    clock: Arc<dyn Clock>,
    params: ForecastParams,
}

impl ForecastGenerator<StdRng> {
    pub fn seeded(seed: u64, clock: Arc<dyn Clock>, params: ForecastParams) -> Self {
        Self::new(StdRng::seed_from_u64(seed), clock, params)
    }

    pub fn from_entropy(clock: Arc<dyn Clock>, params: ForecastParams) -> Self {
        Self::new(StdRng::from_entropy(), clock, params)
    }
}

impl<R: Rng> ForecastGenerator<R> {
    pub fn new(rng: R, clock: Arc<dyn Clock>, params: ForecastParams) -> Self {
        Self { rng, clock, params }
    }

    /// Generate `days` points dated `today + 1 ..= today + days`.
    pub fn generate(&mut self, days: i64) -> Result<Vec<ForecastPoint>, GoldcastError> {
        if days <= 0 {
            tracing::warn!(days, "rejected forecast request");
            return Err(GoldcastError::invalid_days(days, "must be positive"));
        }

        let today = self.clock.today();
        let start = today
            .checked_add_days(Days::new(1))
            .filter(|_| today.checked_add_days(Days::new(days as u64)).is_some())
            .ok_or_else(|| GoldcastError::invalid_days(days, "reaches past the latest date"))?;

        let mut level = self.params.seed_price;
        let mut points = Vec::with_capacity(days as usize);
        for date in start.iter_days().take(days as usize) {
            let step = self.sample_step();
            level += step;
            points.push(ForecastPoint {
                date,
                predicted: round2(level),
                confidence: self.sample_confidence(),
                trend: classify_trend(step, self.params.stable_threshold),
            });
        }

        tracing::debug!(days, %today, "generated forecast");
        Ok(points)
    }

    fn sample_step(&mut self) -> f64 {
        if self.rng.gen_bool(0.5) {
            magnitude(&mut self.rng, self.params.max_rise)
        } else {
            -magnitude(&mut self.rng, self.params.max_fall)
        }
    }

    fn sample_confidence(&mut self) -> u8 {
        let raw = self
            .rng
            .gen_range(f64::from(CONFIDENCE_MIN)..f64::from(CONFIDENCE_MAX));
        round_half_up(raw).clamp(f64::from(CONFIDENCE_MIN), f64::from(CONFIDENCE_MAX)) as u8
    }
}

fn magnitude<R: Rng>(rng: &mut R, max: f64) -> f64 {
    if max > 0.0 { rng.gen_range(0.0..max) } else { 0.0 }
}

/// Headline figures for a forecast horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub horizon_days: usize,
    pub final_date: NaiveDate,
    pub final_price: f64,
    pub average_confidence: u8,
    pub outlook: Trend,
}

impl ForecastSummary {
    /// `None` for an empty forecast.
    pub fn from_points(points: &[ForecastPoint]) -> Option<Self> {
        let last = points.last()?;
        Some(Self {
            horizon_days: points.len(),
            final_date: last.date,
            final_price: last.predicted,
            average_confidence: mean_confidence(points.iter().map(|p| p.confidence))?,
            outlook: last.trend,
        })
    }
}

/// Half-up rounded mean, `None` when empty. Sums in `u64` so long horizons
/// cannot overflow.
fn mean_confidence(confidences: impl IntoIterator<Item = u8>) -> Option<u8> {
    let (total, count) = confidences
        .into_iter()
        .fold((0u64, 0u64), |(total, count), c| (total + u64::from(c), count + 1));
    if count == 0 {
        return None;
    }
    Some(round_half_up(total as f64 / count as f64) as u8)
}

/// Bounded horizon choices offered by the prediction cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastHorizon {
    Week,
    Fortnight,
    Month,
}

impl ForecastHorizon {
    pub const ALL: [ForecastHorizon; 3] = [
        ForecastHorizon::Week,
        ForecastHorizon::Fortnight,
        ForecastHorizon::Month,
    ];

    pub fn days(self) -> i64 {
        match self {
            ForecastHorizon::Week => 7,
            ForecastHorizon::Fortnight => 15,
            ForecastHorizon::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ForecastHorizon::Week => "7D",
            ForecastHorizon::Fortnight => "15D",
            ForecastHorizon::Month => "30D",
        }
    }
}

impl FromStr for ForecastHorizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ForecastHorizon::ALL
            .into_iter()
            .find(|h| h.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown horizon '{s}' (expected 7D, 15D or 30D)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    struct FixedClock;

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()
        }

        fn now(&self) -> DateTime<Utc> {
            self.today().and_hms_opt(0, 0, 0).unwrap().and_utc()
        }
    }

    fn point(day: u32, predicted: f64, confidence: u8, trend: Trend) -> ForecastPoint {
        ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            predicted,
            confidence,
            trend,
        }
    }

    #[test]
    fn classify_trend_threshold_is_exclusive() {
        assert_eq!(classify_trend(4.99, 5.0), Trend::Stable);
        assert_eq!(classify_trend(-4.99, 5.0), Trend::Stable);
        assert_eq!(classify_trend(5.0, 5.0), Trend::Up);
        assert_eq!(classify_trend(-5.0, 5.0), Trend::Down);
        assert_eq!(classify_trend(0.0, 5.0), Trend::Stable);
    }

    #[test]
    fn dates_cross_year_boundary() {
        let mut generator =
            ForecastGenerator::seeded(5, Arc::new(FixedClock), ForecastParams::default());
        let points = generator.generate(3).unwrap();
        let dates: Vec<_> = points.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-12-31", "2025-01-01", "2025-01-02"]);
    }

    #[test]
    fn confidence_stays_in_range() {
        let mut generator =
            ForecastGenerator::seeded(9, Arc::new(FixedClock), ForecastParams::default());
        let points = generator.generate(500).unwrap();
        assert!(
            points
                .iter()
                .all(|p| (CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&p.confidence))
        );
    }

    #[test]
    fn steps_respect_rise_and_fall_bounds() {
        let mut generator =
            ForecastGenerator::seeded(21, Arc::new(FixedClock), ForecastParams::default());
        let points = generator.generate(200).unwrap();
        let mut previous = DEFAULT_SEED_PRICE;
        for p in &points {
            let step = p.predicted - previous;
            assert!(step <= DEFAULT_MAX_RISE + 0.01, "rise {step}");
            assert!(step >= -DEFAULT_MAX_FALL - 0.01, "fall {step}");
            previous = p.predicted;
        }
    }

    #[test]
    fn zero_days_rejected() {
        let mut generator =
            ForecastGenerator::seeded(1, Arc::new(FixedClock), ForecastParams::default());
        assert!(matches!(
            generator.generate(0),
            Err(GoldcastError::InvalidInput { value: 0, .. })
        ));
        assert!(generator.generate(-3).is_err());
    }

    #[test]
    fn summary_uses_last_point_and_rounded_average() {
        let points = vec![
            point(1, 2060.0, 70, Trend::Up),
            point(2, 2058.0, 71, Trend::Stable),
            point(3, 2045.5, 72, Trend::Down),
            point(4, 2047.0, 72, Trend::Stable),
        ];
        let summary = ForecastSummary::from_points(&points).unwrap();
        assert_eq!(summary.horizon_days, 4);
        assert_eq!(summary.final_price, 2047.0);
        assert_eq!(summary.final_date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
        // (70 + 71 + 72 + 72) / 4 = 71.25
        assert_eq!(summary.average_confidence, 71);
        assert_eq!(summary.outlook, Trend::Stable);
    }

    #[test]
    fn mean_confidence_survives_horizons_past_u32_range() {
        let many = std::iter::repeat(100u8).take(50_000_000);
        assert_eq!(mean_confidence(many), Some(100));
        assert_eq!(mean_confidence([70u8, 71]), Some(71));
        assert_eq!(mean_confidence(std::iter::empty()), None);
    }

    #[test]
    fn summary_of_empty_forecast_is_none() {
        assert!(ForecastSummary::from_points(&[]).is_none());
    }

    #[test]
    fn horizon_labels_parse() {
        assert_eq!("15d".parse::<ForecastHorizon>(), Ok(ForecastHorizon::Fortnight));
        assert_eq!(ForecastHorizon::Month.days(), 30);
        assert!("10D".parse::<ForecastHorizon>().is_err());
    }

    #[test]
    fn trend_serializes_lowercase() {
        let json = serde_json::to_string(&point(1, 2050.0, 80, Trend::Up)).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2025-01-01","predicted":2050.0,"confidence":80,"trend":"up"}"#
        );
    }
}
