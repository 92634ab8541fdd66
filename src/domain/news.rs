//! Fixed market headlines shown beside the chart.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub url: String,
}

const HEADLINES: [(&str, &str, &str); 3] = [
    (
        "Gold Prices Surge Amid Global Economic Uncertainty",
        "Investors flock to safe-haven assets as market volatility increases...",
        "Financial Times",
    ),
    (
        "Federal Reserve Policy Impact on Precious Metals",
        "Latest Fed decisions show significant influence on gold trading patterns...",
        "Reuters",
    ),
    (
        "Asian Markets Drive Gold Demand Higher",
        "Strong buying interest from Asian markets pushes gold prices upward...",
        "Bloomberg",
    ),
];

/// Headlines newest first, published one hour apart ending at `now`.
pub fn headlines(now: DateTime<Utc>) -> Vec<NewsItem> {
    HEADLINES
        .iter()
        .zip(0i64..)
        .map(|(&(title, description, source), hours_ago)| NewsItem {
            title: title.to_string(),
            description: description.to_string(),
            published_at: now - Duration::hours(hours_ago),
            source: source.to_string(),
            url: "#".to_string(),
        })
        .collect()
}
