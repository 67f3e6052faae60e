pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::schema_file::SchemaFile;
pub use core::engine::{CsvEngine, ImportReport};
pub use domain::model::{
    CellValue, ColumnKind, ColumnSchema, DiagnosticKind, MapOutcome, ParseOutcome, RowDiagnostic,
    TypedRecord,
};
pub use utils::error::{CsvBridgeError, Result};
