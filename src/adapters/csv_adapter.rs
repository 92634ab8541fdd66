//! CSV export adapter.

use std::io::Write;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::domain::error::GoldcastError;
use crate::domain::forecast::ForecastPoint;
use crate::domain::history::HistoricalSeries;
use crate::domain::live::PricePoint;
use crate::domain::upload::{SAMPLE_HEADERS, SampleRow};
use crate::ports::export_port::ExportPort;

const PRICE_HEADERS: [&str; 4] = ["as_of", "price", "change", "change_percent"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// Write the downloadable upload template.
    pub fn write_sample_template(
        &self,
        rows: &[SampleRow],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(SAMPLE_HEADERS)?;
        for row in rows {
            wtr.write_record([
                row.date.to_string(),
                format!("{:.2}", row.price),
                row.volume.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write flat serializable records, header taken from the field names.
    pub fn write_records<T: Serialize>(
        &self,
        rows: &[T],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        let mut wtr = csv::Writer::from_writer(out);
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn price_record(point: &PricePoint) -> [String; 4] {
        [
            point.as_of.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.2}", point.price),
            format!("{:.2}", point.change),
            format!("{:.2}", point.change_percent),
        ]
    }
}

impl ExportPort for CsvExporter {
    fn write_history(
        &self,
        series: &HistoricalSeries,
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        let assets = series.assets();
        let mut wtr = csv::Writer::from_writer(out);

        let mut header = vec!["date"];
        header.extend(assets.iter().map(|a| a.key()));
        wtr.write_record(&header)?;

        for point in series {
            let mut record = vec![point.date.to_string()];
            record.extend(
                assets
                    .iter()
                    .map(|&a| point.value(a).map(|v| format!("{v:.2}")).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_forecast(
        &self,
        points: &[ForecastPoint],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(["date", "predicted", "confidence", "trend"])?;
        for p in points {
            wtr.write_record([
                p.date.to_string(),
                format!("{:.2}", p.predicted),
                p.confidence.to_string(),
                p.trend.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_price(&self, point: &PricePoint, out: &mut dyn Write) -> Result<(), GoldcastError> {
        self.write_prices(std::slice::from_ref(point), out)
    }

    fn write_prices(
        &self,
        points: &[PricePoint],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(PRICE_HEADERS)?;
        for point in points {
            wtr.write_record(Self::price_record(point))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
