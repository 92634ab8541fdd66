//! Synthetic gold price history, live readings and forecasts.
//!
//! Hexagonal architecture: generation logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`]. [`feed`] runs the
//! live sampler on a timer and [`cli`] renders everything to the terminal.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod feed;
pub mod ports;
