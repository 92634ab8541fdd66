//! Display rounding shared by every generator.
//!
//! Values are rounded half-up (towards positive infinity on a tie), so
//! `-0.125` becomes `-0.12` and `0.125` becomes `0.13`.

/// Round half-up to an integer.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half-up to two decimal places.
pub fn round2(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}
