//! Fixed investment insights shown under the forecast cards.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Bullish,
    Neutral,
    Warning,
}

impl InsightKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InsightKind::Bullish => "bullish",
            InsightKind::Neutral => "neutral",
            InsightKind::Warning => "warning",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    /// Percent.
    pub confidence: u8,
}

/// Insight cards plus the closing allocation recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsPanel {
    pub insights: Vec<Insight>,
    pub recommendation: String,
}

pub const RECOMMENDATION: &str = "Based on current market conditions and technical analysis, \
a balanced approach with 60% long-term holdings and 40% tactical allocation is recommended \
for optimal risk-adjusted returns.";

const INSIGHTS: [(InsightKind, &str, &str, u8); 3] = [
    (
        InsightKind::Bullish,
        "Strong Buying Opportunity",
        "Technical indicators show oversold conditions with RSI below 30. Historical patterns \
         suggest potential 5-8% upside in the next 2 weeks.",
        78,
    ),
    (
        InsightKind::Neutral,
        "Market Consolidation Phase",
        "Gold prices are moving sideways within a tight range. Consider dollar-cost averaging \
         strategy for consistent exposure.",
        65,
    ),
    (
        InsightKind::Warning,
        "Volatility Alert",
        "Increased market volatility expected due to upcoming Fed announcement. Consider \
         reducing position size temporarily.",
        82,
    ),
];

pub fn all() -> Vec<Insight> {
    INSIGHTS
        .iter()
        .map(|&(kind, title, description, confidence)| Insight {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            confidence,
        })
        .collect()
}

pub fn panel() -> InsightsPanel {
    InsightsPanel {
        insights: all(),
        recommendation: RECOMMENDATION.to_string(),
    }
}
