//! Charted assets and their fixed ratios to the primary asset.
//!
//! Gold is simulated directly; every other asset is a fixed multiple of the
//! simulated gold price for the same day.

use std::fmt;
use std::str::FromStr;

/// Silver price per unit of gold price.
pub const SILVER_RATIO: f64 = 0.04;
/// Bitcoin price per unit of gold price.
pub const BITCOIN_RATIO: f64 = 20.0;
/// Sensex points per unit of gold price.
pub const SENSEX_RATIO: f64 = 25.0;

/// Derived assets charted by default, in column order.
pub const DEFAULT_DERIVED: [Asset; 3] = [Asset::Silver, Asset::Bitcoin, Asset::Sensex];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Asset {
    Gold,
    Silver,
    Bitcoin,
    Sensex,
}

impl Asset {
    pub const ALL: [Asset; 4] = [Asset::Gold, Asset::Silver, Asset::Bitcoin, Asset::Sensex];

    /// Lowercase key used in config files and serialized records.
    pub fn key(self) -> &'static str {
        match self {
            Asset::Gold => "gold",
            Asset::Silver => "silver",
            Asset::Bitcoin => "bitcoin",
            Asset::Sensex => "sensex",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Asset::Gold => "Gold",
            Asset::Silver => "Silver",
            Asset::Bitcoin => "Bitcoin",
            Asset::Sensex => "Sensex",
        }
    }

    /// Multiplier applied to the gold price. Gold itself is 1.0.
    pub fn ratio(self) -> f64 {
        match self {
            Asset::Gold => 1.0,
            Asset::Silver => SILVER_RATIO,
            Asset::Bitcoin => BITCOIN_RATIO,
            Asset::Sensex => SENSEX_RATIO,
        }
    }

    pub fn is_primary(self) -> bool {
        self == Asset::Gold
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown asset: {0}")]
pub struct UnknownAsset(pub String);

impl FromStr for Asset {
    type Err = UnknownAsset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Asset::ALL
            .into_iter()
            .find(|a| a.key() == key)
            .ok_or_else(|| UnknownAsset(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssetListError {
    #[error(transparent)]
    Unknown(#[from] UnknownAsset),

    #[error("gold is the primary asset and cannot be derived")]
    PrimaryListed,

    #[error("duplicate asset: {0}")]
    Duplicate(Asset),
}

/// Parse a comma-separated list of derived assets, e.g. `silver, bitcoin`.
///
/// Empty input yields an empty list (a gold-only chart).
pub fn parse_derived_assets(input: &str) -> Result<Vec<Asset>, AssetListError> {
    let mut assets = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let asset: Asset = token.parse()?;
        if asset.is_primary() {
            return Err(AssetListError::PrimaryListed);
        }
        if assets.contains(&asset) {
            return Err(AssetListError::Duplicate(asset));
        }
        assets.push(asset);
    }
    Ok(assets)
}
