// SWIFT Code Registry - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod entities;
pub mod error;
pub mod loader;
pub mod logging;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::ServerConfig;
pub use entities::{
    CountrySwiftCodes, NewSwiftCode, SwiftCode, SwiftCodeDetails, SwiftCodeRegistry,
    SwiftCodeSummary,
};
pub use error::{ErrorKind, LoadError, RegistryError};
pub use loader::{load_csv, load_csv_with_limit, load_reader, SourceRow, MAX_SOURCE_BYTES};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
