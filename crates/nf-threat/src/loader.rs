//! CSV threshold-table loader.
//!
//! # CSV format
//!
//! One row per threshold.  Row order does not matter; thresholds are always
//! evaluated highest `points` first.
//!
//! ```csv
//! name,points,cooldown_mins,delay_min_mins,delay_max_mins,priority
//! mongrel_investigation,50,120,30,90,1
//! mongrel_attack,100,240,10,30,2
//! marauder_raid,150,720,0,0,3
//! ```
//!
//! The `priority` column may be omitted; it then defaults to 0.

use std::io::Read;
use std::path::Path;

use crate::threat::validate_thresholds;
use crate::{ThreatError, ThreatResult, ThresholdSpec};

/// Load a threshold table from a CSV file.
pub fn load_thresholds_csv(path: &Path) -> ThreatResult<Vec<ThresholdSpec>> {
    let file = std::fs::File::open(path).map_err(ThreatError::Io)?;
    load_thresholds_reader(file)
}

/// Like [`load_thresholds_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for tables embedded in
/// the binary.
pub fn load_thresholds_reader<R: Read>(reader: R) -> ThreatResult<Vec<ThresholdSpec>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let specs = csv_reader
        .deserialize::<ThresholdSpec>()
        .map(|row| row.map_err(|e| ThreatError::Parse(e.to_string())))
        .collect::<ThreatResult<Vec<_>>>()?;

    validate_thresholds(&specs, f32::MAX)?;
    tracing::debug!(count = specs.len(), "loaded threshold table");
    Ok(specs)
}
