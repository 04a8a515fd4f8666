// ⚠️ Error types for the registry and the loader
// Every failure is returned as a value; the API layer decides the transport status.

use std::path::PathBuf;

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
}

/// Failures of registry queries and mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("SWIFT code not found.")]
    CodeNotFound { code: String },

    #[error("No SWIFT codes found for the country.")]
    CountryNotFound { country_iso2: String },

    #[error("SWIFT code already exists.")]
    AlreadyExists { code: String },

    /// A second headquarters record for the same 8-character prefix
    #[error("A headquarters record already exists for this institution.")]
    DuplicateHeadquarters { prefix: String, existing: String },

    #[error("Missing required fields.")]
    MissingFields { fields: Vec<&'static str> },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::CodeNotFound { .. } | RegistryError::CountryNotFound { .. } => {
                ErrorKind::NotFound
            }
            RegistryError::AlreadyExists { .. } | RegistryError::DuplicateHeadquarters { .. } => {
                ErrorKind::Conflict
            }
            RegistryError::MissingFields { .. } => ErrorKind::Validation,
        }
    }
}

/// Failures while reading a tabular source
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to open SWIFT code file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse SWIFT code row at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// Headers could not be read at all
    #[error("Failed to read SWIFT code header row: {0}")]
    Header(#[source] csv::Error),

    #[error("Failed to read SWIFT code file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SWIFT code file {} exceeds the {limit}-byte limit", .path.display())]
    TooLarge { path: PathBuf, limit: u64 },
}
