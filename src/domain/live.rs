//! Live price readings.
//!
//! Every reading is drawn independently around a fixed reference price. The
//! sampler does not chain from its previous reading, so consecutive readings
//! do not form a walk and do not connect to the end of the historical series.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::forecast::Trend;
use super::rounding::round2;
use crate::ports::clock_port::Clock;

pub const DEFAULT_REFERENCE_PRICE: f64 = 2050.0;
/// Readings fall within `reference ± price_spread`.
pub const DEFAULT_PRICE_SPREAD: f64 = 10.0;
/// Reported change falls within `± change_spread`.
pub const DEFAULT_CHANGE_SPREAD: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub as_of: DateTime<Utc>,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl PricePoint {
    /// Up, down, or stable (zero change) for the ticker arrow.
    pub fn direction(&self) -> Trend {
        if self.change > 0.0 {
            Trend::Up
        } else if self.change < 0.0 {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

/// `change / price * 100`, rounded to two decimals. Zero when `price` is zero.
pub fn change_percent(change: f64, price: f64) -> f64 {
    if price == 0.0 {
        return 0.0;
    }
    round2(change / price * 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveParams {
    pub reference_price: f64,
    pub price_spread: f64,
    pub change_spread: f64,
}

impl Default for LiveParams {
    fn default() -> Self {
        Self {
            reference_price: DEFAULT_REFERENCE_PRICE,
            price_spread: DEFAULT_PRICE_SPREAD,
            change_spread: DEFAULT_CHANGE_SPREAD,
        }
    }
}

pub struct LivePriceSampler<R = StdRng> {
    rng: R,
    clock: Arc<dyn Clock>,
    params: LiveParams,
}

impl LivePriceSampler<StdRng> {
    pub fn seeded(seed: u64, clock: Arc<dyn Clock>, params: LiveParams) -> Self {
        Self::new(StdRng::seed_from_u64(seed), clock, params)
    }

    pub fn from_entropy(clock: Arc<dyn Clock>, params: LiveParams) -> Self {
        Self::new(StdRng::from_entropy(), clock, params)
    }
}

impl<R: Rng> LivePriceSampler<R> {
    pub fn new(rng: R, clock: Arc<dyn Clock>, params: LiveParams) -> Self {
        Self { rng, clock, params }
    }

    pub fn sample(&mut self) -> PricePoint {
        let price = round2(self.params.reference_price + self.symmetric(self.params.price_spread));
        let change = round2(self.symmetric(self.params.change_spread));
        PricePoint {
            as_of: self.clock.now(),
            price,
            change,
            change_percent: change_percent(change, price),
        }
    }

    fn symmetric(&mut self, spread: f64) -> f64 {
        if spread > 0.0 {
            self.rng.gen_range(-spread..spread)
        } else {
            0.0
        }
    }
}
