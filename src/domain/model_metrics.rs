//! Fixed model-quality figures displayed on the dashboard.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub mae: f64,
    pub rmse: f64,
    /// Percent.
    pub accuracy: f64,
    pub r2_score: f64,
}

pub fn snapshot() -> ModelMetrics {
    ModelMetrics {
        mae: 12.34,
        rmse: 18.76,
        accuracy: 87.5,
        r2_score: 0.92,
    }
}
