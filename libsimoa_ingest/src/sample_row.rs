use std::fmt;
use std::str::FromStr;

use super::error::RowError;
use super::export_file::REQUIRED_COLUMNS;
use super::well_location::WellLocation;

/// A normalized sample barcode.
///
/// Study samples carry numeric barcodes; calibrators and QC wells carry free
/// text. Text barcodes are uppercased so later matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Barcode {
    Numeric(i64),
    Label(String),
}

impl Barcode {
    /// Normalize a raw barcode field.
    ///
    /// Only a string that is digits from end to end converts to a number. A
    /// digit-prefixed string with trailing text (e.g. "12a") is a label like
    /// any other, and a digit run too long for i64 also falls back to a
    /// label. Normalization is total; there is no error case.
    pub fn normalize(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = raw.parse::<i64>() {
                return Barcode::Numeric(value);
            }
        }
        Barcode::Label(raw.to_uppercase())
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Barcode::Numeric(value) => write!(f, "{value}"),
            Barcode::Label(label) => write!(f, "{label}"),
        }
    }
}

/// One experiment-design slot on a sample row.
///
/// Unset until a design template is applied to the owning plate; Unassigned
/// when the applied template does not map this row's coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DesignValue {
    #[default]
    Unset,
    Unassigned,
    Assigned(String),
}

impl fmt::Display for DesignValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignValue::Unset => write!(f, "unset"),
            DesignValue::Unassigned => write!(f, "unassigned"),
            DesignValue::Assigned(label) => write!(f, "{label}"),
        }
    }
}

/// Convert a raw numeric field to a float.
///
/// The instrument leaves these fields blank or "NaN" for failed wells, so
/// empty, non-numeric and non-finite text all degrade to None rather than
/// erroring.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Concentration unit conversion, pg/ml to fg/ml. Absent propagates.
pub fn pg_to_fg(pg_per_ml: Option<f64>) -> Option<f64> {
    pg_per_ml.map(|value| value * 1000.0)
}

/// One normalized sample measurement.
///
/// Rows are immutable once normalized, except for the three design fields
/// written by template application.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub barcode: Barcode,
    /// The raw instrument location string the well coordinates were decoded from
    pub location: String,
    pub well: WellLocation,
    pub sample_type: String,
    pub batch_name: String,
    pub aeb: Option<f64>,
    pub concentration_pg_ml: Option<f64>,
    /// Always 1000x the pg/ml value, absent in lockstep with it
    pub concentration_fg_ml: Option<f64>,
    pub flags: String,
    pub dilution: DesignValue,
    pub feeders: DesignValue,
    pub replicate: DesignValue,
}

impl SampleRow {
    /// Build a normalized row from a projected export record.
    ///
    /// The record must already be projected to the required columns in
    /// canonical order; that projection is the ingestion boundary's contract
    /// and is not re-checked here beyond the field count.
    pub fn from_record(record: &[String]) -> Result<Self, RowError> {
        if record.len() != REQUIRED_COLUMNS.len() {
            return Err(RowError::ShortRecord(record.len()));
        }
        let location = record[1].clone();
        let well = WellLocation::from_str(&location)?;
        let concentration_pg_ml = coerce_numeric(&record[5]);
        Ok(SampleRow {
            barcode: Barcode::normalize(&record[0]),
            location,
            well,
            sample_type: record[2].clone(),
            batch_name: record[3].clone(),
            aeb: coerce_numeric(&record[4]),
            concentration_pg_ml,
            concentration_fg_ml: pg_to_fg(concentration_pg_ml),
            flags: record[6].clone(),
            dilution: DesignValue::Unset,
            feeders: DesignValue::Unset,
            replicate: DesignValue::Unset,
        })
    }
}
