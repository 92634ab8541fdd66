//! Configuration access port trait.
//!
//! Keys are grouped by generator: `[random]`, `[history]`, `[live]` and
//! `[forecast]`. Numeric getters fall back to `default` when the key is
//! missing or unparsable; config validation rejects unparsable values
//! before any getter is used to build settings.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// `None` when the key is absent, `Some(Err(raw))` when it is present but
    /// not an unsigned integer.
    fn get_u64(&self, section: &str, key: &str) -> Option<Result<u64, String>> {
        self.get_string(section, key).map(|raw| {
            let trimmed = raw.trim();
            trimmed.parse().map_err(|_| trimmed.to_string())
        })
    }
}
