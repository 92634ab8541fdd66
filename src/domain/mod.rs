//! Core domain types and generation logic.

pub mod asset;
pub mod config_validation;
pub mod error;
pub mod forecast;
pub mod history;
pub mod insights;
pub mod live;
pub mod model_metrics;
pub mod news;
pub mod rounding;
pub mod upload;
