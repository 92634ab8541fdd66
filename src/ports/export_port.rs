//! Export port trait.

use std::io::Write;

use crate::domain::error::GoldcastError;
use crate::domain::forecast::ForecastPoint;
use crate::domain::history::HistoricalSeries;
use crate::domain::live::PricePoint;

/// Port for rendering generated data to an output stream.
pub trait ExportPort {
    fn write_history(
        &self,
        series: &HistoricalSeries,
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError>;

    fn write_forecast(
        &self,
        points: &[ForecastPoint],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError>;

    fn write_price(&self, point: &PricePoint, out: &mut dyn Write) -> Result<(), GoldcastError>;

    /// Default implementation: one `write_price` call per reading.
    fn write_prices(
        &self,
        points: &[PricePoint],
        out: &mut dyn Write,
    ) -> Result<(), GoldcastError> {
        for point in points {
            self.write_price(point, out)?;
        }
        Ok(())
    }
}
