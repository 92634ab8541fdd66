//! Fixed-width text adapter for terminal output.

use std::io::Write;

use chrono::SecondsFormat;

use crate::domain::error::GoldcastError;
use crate::domain::forecast::{ForecastPoint, ForecastSummary};
use crate::domain::history::HistoricalSeries;
use crate::domain::insights::InsightsPanel;
use crate::domain::live::PricePoint;
use crate::domain::model_metrics::ModelMetrics;
use crate::domain::news::NewsItem;
use crate::ports::export_port::ExportPort;

const COLUMN_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy, Default)]
pub struct TableExporter;

impl TableExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_summary(
        &self,
        summary: &ForecastSummary,
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        writeln!(out, "\n=== {}-Day Outlook ===", summary.horizon_days)?;
        writeln!(
            out,
            "Predicted Price:  {:.2} on {}",
            summary.final_price, summary.final_date
        )?;
        writeln!(out, "Confidence:       {}%", summary.average_confidence)?;
        writeln!(
            out,
            "Market Trend:     {}",
            summary.outlook.as_str().to_uppercase()
        )?;
        Ok(())
    }

    pub fn write_news(&self, items: &[NewsItem], out: &mut dyn Write) -> Result<(), GoldcastError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}", item.title)?;
            writeln!(out, "  {}", item.description)?;
            writeln!(
                out,
                "  {} | {}",
                item.source,
                item.published_at.format("%b %d, %H:%M")
            )?;
        }
        Ok(())
    }

    pub fn write_insights(
        &self,
        panel: &InsightsPanel,
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        for insight in &panel.insights {
            writeln!(
                out,
                "[{}] {} ({}% confidence)",
                insight.kind.as_str().to_uppercase(),
                insight.title,
                insight.confidence
            )?;
            writeln!(out, "  {}", insight.description)?;
            writeln!(out)?;
        }
        writeln!(out, "AI Recommendation: {}", panel.recommendation)?;
        Ok(())
    }

    pub fn write_metrics(
        &self,
        metrics: &ModelMetrics,
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        writeln!(out, "Accuracy:                {}%", metrics.accuracy)?;
        writeln!(out, "Mean Absolute Error:     ${}", metrics.mae)?;
        writeln!(out, "Root Mean Square Error:  ${}", metrics.rmse)?;
        writeln!(out, "R² Score:                {:.3}", metrics.r2_score)?;
        Ok(())
    }
}

fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}

impl ExportPort for TableExporter {
    fn write_history(
        &self,
        series: &HistoricalSeries,
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        let assets = series.assets();

        write!(out, "{:<10}", "Date")?;
        for asset in &assets {
            write!(out, "{:>w$}", asset.label(), w = COLUMN_WIDTH)?;
        }
        writeln!(out)?;

        for point in series {
            write!(out, "{:<10}", point.date)?;
            for &asset in &assets {
                match point.value(asset) {
                    Some(v) => write!(out, "{:>w$.2}", v, w = COLUMN_WIDTH)?,
                    None => write!(out, "{:>w$}", "-", w = COLUMN_WIDTH)?,
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_forecast(
        &self,
        points: &[ForecastPoint],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        writeln!(
            out,
            "{:<10}{:>12}{:>12}{:>8}",
            "Date", "Predicted", "Confidence", "Trend"
        )?;
        for p in points {
            writeln!(
                out,
                "{:<10}{:>12.2}{:>11}%{:>8}",
                p.date,
                p.predicted,
                p.confidence,
                p.trend.as_str()
            )?;
        }
        Ok(())
    }

    fn write_price(&self, point: &PricePoint, out: &mut dyn Write) -> Result<(), GoldcastError> {
        writeln!(
            out,
            "{}  Gold {:.2}  {:<6} {} ({}%)",
            point.as_of.to_rfc3339_opts(SecondsFormat::Secs, true),
            point.price,
            point.direction().as_str(),
            signed(point.change),
            signed(point.change_percent),
        )?;
        Ok(())
    }
}
