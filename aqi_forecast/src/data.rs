//! AQI history and dated pollutant dataset handling

use crate::error::{AdvisorError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// ISO calendar date format used for query dates and dataset rows
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ordered AQI observations, optionally paired with calendar dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiHistory {
    values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dates: Option<Vec<NaiveDate>>,
}

impl AqiHistory {
    /// Create an undated history; every value must be finite and non-negative
    pub fn new(values: Vec<f64>) -> Result<Self> {
        validate_values(&values)?;
        Ok(Self {
            values,
            dates: None,
        })
    }

    /// Create a dated history; dates must be strictly increasing
    pub fn with_dates(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(AdvisorError::DataError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }
        validate_values(&values)?;

        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(AdvisorError::DataError(format!(
                "History is not in chronological order: {} is followed by {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self {
            values,
            dates: Some(dates),
        })
    }

    /// Parse a comma-separated list of AQI values, e.g. `"45, 60, 80"`
    pub fn parse(input: &str) -> Result<Self> {
        let values = input
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| {
                field.parse::<f64>().map_err(|_| {
                    AdvisorError::DataError(format!("'{}' is not a number", field))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Self::new(values)
    }

    /// Get the observations
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the dates, if the history is dated
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    /// Date of the most recent observation, if dated
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|d| d.last().copied())
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the history has no observations
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromStr for AqiHistory {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn validate_values(values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        Some(bad) => Err(AdvisorError::DataError(format!(
            "AQI values must be finite and non-negative, got {}",
            bad
        ))),
        None => Ok(()),
    }
}

/// Parse a query date in ISO `YYYY-MM-DD` form
pub fn parse_query_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| AdvisorError::InvalidDate(input.trim().to_string()))
}

/// One day of the pollutant dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    /// Calendar date of the reading
    pub date: NaiveDate,
    /// Air Quality Index for the day
    pub aqi: f64,
    /// Other numeric readings keyed by column name (e.g. `PM2.5`)
    pub pollutants: BTreeMap<String, f64>,
}

/// Pollutant dataset indexed by calendar date
#[derive(Debug, Clone)]
pub struct AqiDataset {
    records: Vec<DailyRecord>,
}

/// Data loader for dated AQI datasets
#[derive(Debug)]
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<AqiDataset> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a dataset from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<AqiDataset> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let date_idx = Self::detect_date_column(&headers)?;
        let aqi_idx = Self::detect_aqi_column(&headers)?;

        let mut records = Vec::new();
        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            // Header is line 1
            let line = row + 2;

            let date_field = record.get(date_idx).unwrap_or_default();
            let date = NaiveDate::parse_from_str(date_field, DATE_FORMAT).map_err(|_| {
                AdvisorError::DataError(format!("Line {}: invalid date '{}'", line, date_field))
            })?;

            let aqi_field = record.get(aqi_idx).unwrap_or_default();
            if aqi_field.is_empty() {
                debug!(line, %date, "skipping row without AQI value");
                continue;
            }
            let aqi = aqi_field.parse::<f64>().map_err(|_| {
                AdvisorError::DataError(format!("Line {}: invalid AQI '{}'", line, aqi_field))
            })?;
            validate_values(&[aqi])?;

            let pollutants = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(idx, _)| *idx != date_idx && *idx != aqi_idx)
                .filter_map(|(_, (name, cell))| {
                    cell.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| (name.to_string(), v))
                })
                .collect();

            records.push(DailyRecord {
                date,
                aqi,
                pollutants,
            });
        }

        AqiDataset::new(records)
    }

    /// Find the date column (name contains "date")
    fn detect_date_column(headers: &csv::StringRecord) -> Result<usize> {
        headers
            .iter()
            .position(|name| name.to_lowercase().contains("date"))
            .ok_or_else(|| AdvisorError::DataError("No date column found in data".to_string()))
    }

    /// Find the AQI column, preferring an exact "AQI" header over partial matches
    fn detect_aqi_column(headers: &csv::StringRecord) -> Result<usize> {
        headers
            .iter()
            .position(|name| name.eq_ignore_ascii_case("aqi"))
            .or_else(|| {
                headers
                    .iter()
                    .position(|name| name.to_lowercase().contains("aqi"))
            })
            .ok_or_else(|| AdvisorError::DataError("No AQI column found in data".to_string()))
    }
}

impl AqiDataset {
    /// Create a dataset from records in strictly increasing date order
    pub fn new(records: Vec<DailyRecord>) -> Result<Self> {
        if let Some(pair) = records.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(AdvisorError::DataError(format!(
                "Dataset is not in chronological order: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self { records })
    }

    /// Get all records
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// Number of dated records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find the record for `date`
    pub fn lookup(&self, date: NaiveDate) -> Result<&DailyRecord> {
        self.position(date).map(|idx| &self.records[idx])
    }

    /// Dated AQI history from the first record up to and including `date`
    pub fn history_through(&self, date: NaiveDate) -> Result<AqiHistory> {
        let end = self.position(date)? + 1;
        let (dates, values) = self.records[..end]
            .iter()
            .map(|record| (record.date, record.aqi))
            .unzip();

        AqiHistory::with_dates(dates, values)
    }

    fn position(&self, date: NaiveDate) -> Result<usize> {
        self.records
            .binary_search_by_key(&date, |record| record.date)
            .map_err(|_| AdvisorError::DateNotFound(date))
    }
}
