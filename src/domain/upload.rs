//! Sample upload template offered for download next to the file drop zone.

use chrono::NaiveDate;

/// Column headers of the upload template.
pub const SAMPLE_HEADERS: [&str; 3] = ["Date", "Price", "Volume"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRow {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: u64,
}

pub fn sample_rows() -> Vec<SampleRow> {
    [
        (1, 2045.50, 1_500_000),
        (2, 2048.20, 1_650_000),
        (3, 2052.80, 1_720_000),
        (4, 2049.40, 1_580_000),
        (5, 2055.10, 1_690_000),
    ]
    .into_iter()
    .filter_map(|(day, price, volume)| {
        NaiveDate::from_ymd_opt(2024, 1, day).map(|date| SampleRow {
            date,
            price,
            volume,
        })
    })
    .collect()
}
