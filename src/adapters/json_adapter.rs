//! JSON export adapter.
//!
//! Field names follow the chart layer's camelCase convention.

use std::io::Write;

use serde::Serialize;

use crate::domain::error::GoldcastError;
use crate::domain::forecast::ForecastPoint;
use crate::domain::history::HistoricalSeries;
use crate::domain::live::PricePoint;
use crate::ports::export_port::ExportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    /// Pretty-print any serializable value followed by a newline.
    pub fn write_value<T: Serialize + ?Sized>(
        &self,
        value: &T,
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }
}

impl ExportPort for JsonExporter {
    fn write_history(
        &self,
        series: &HistoricalSeries,
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        self.write_value(series, out)
    }

    fn write_forecast(
        &self,
        points: &[ForecastPoint],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        self.write_value(points, out)
    }

    fn write_price(&self, point: &PricePoint, out: &mut dyn Write) -> Result<(), GoldcastError> {
        self.write_value(point, out)
    }

    fn write_prices(
        &self,
        points: &[PricePoint],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        self.write_value(points, out)
    }
}
