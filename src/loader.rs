// 📂 Loader - SWIFT code sheet (CSV export) → SwiftCode records
//
// Produces the full replacement dataset or fails as a whole. Nothing here touches
// the registry; callers adopt the result.

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::entities::SwiftCode;
use crate::error::LoadError;

/// One row of the source sheet.
///
/// Columns that are absent default to empty strings. `CODE TYPE`, `TOWN NAME` and
/// `TIME ZONE` are read but not carried into the record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceRow {
    #[serde(rename = "COUNTRY ISO2 CODE")]
    pub country_iso2: String,

    #[serde(rename = "SWIFT CODE")]
    pub swift_code: String,

    #[serde(rename = "CODE TYPE")]
    pub code_type: String,

    #[serde(rename = "NAME")]
    pub name: String,

    #[serde(rename = "ADDRESS")]
    pub address: String,

    #[serde(rename = "TOWN NAME")]
    pub town_name: String,

    #[serde(rename = "COUNTRY NAME")]
    pub country_name: String,

    #[serde(rename = "TIME ZONE")]
    pub time_zone: String,
}

impl SourceRow {
    /// Map to a record; `None` when the row has no code
    pub fn into_record(self) -> Option<SwiftCode> {
        if self.swift_code.trim().is_empty() {
            return None;
        }

        Some(SwiftCode::from_source(
            &self.swift_code,
            &self.name,
            &self.address,
            &self.country_iso2,
            &self.country_name,
        ))
    }
}

/// Parse every row from `reader`
pub fn load_reader<R: Read>(reader: R) -> Result<Vec<SwiftCode>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    rdr.headers().map_err(LoadError::Header)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, result) in rdr.deserialize::<SourceRow>().enumerate() {
        let row = result.map_err(|source| LoadError::Csv {
            line: source
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 2), // 1-indexed + header row
            source,
        })?;

        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                tracing::debug!(line = index + 2, "skipping row without SWIFT code");
            }
        }
    }

    tracing::info!(count = records.len(), skipped, "parsed SWIFT code rows");
    Ok(records)
}

/// Largest source file `load_csv` accepts (64 MiB)
pub const MAX_SOURCE_BYTES: u64 = 64 * 1024 * 1024;

/// Open and parse a CSV file of at most `MAX_SOURCE_BYTES`
pub fn load_csv(path: &Path) -> Result<Vec<SwiftCode>, LoadError> {
    load_csv_with_limit(path, MAX_SOURCE_BYTES)
}

/// Open and parse a CSV file, failing once more than `limit` bytes are read.
///
/// The read is bounded even for endless sources such as `/dev/zero`.
pub fn load_csv_with_limit(path: &Path, limit: u64) -> Result<Vec<SwiftCode>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut contents = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut contents)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if contents.len() as u64 > limit {
        return Err(LoadError::TooLarge {
            path: path.to_path_buf(),
            limit,
        });
    }

    load_reader(contents.as_slice())
}

// ============================================================================
// TESTS
// ============================================================================
