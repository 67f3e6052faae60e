use crate::domain::model::ColumnSchema;
use crate::utils::error::Result;
use crate::utils::validation::{validate_encoding_label, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative column schema authored as a TOML file:
///
/// ```toml
/// encoding = "utf-8"
///
/// [[columns]]
/// source_header = "name"
/// target_key = "name"
/// kind = "str"
///
/// [[columns]]
/// source_header = "age"
/// target_key = "age"
/// kind = "int"
/// optional = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Encoding label for the CSV document; the CLI flag wins when given.
    pub encoding: Option<String>,
    pub columns: Vec<ColumnSchema>,
}

impl SchemaFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let schema: SchemaFile = toml::from_str(&text)?;
        schema.validate()?;
        Ok(schema)
    }

    /// The header row this schema expects, in column order. Used when the
    /// caller opts into header validation.
    pub fn expected_headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.source_header.clone())
            .collect()
    }
}

impl Validate for SchemaFile {
    fn validate(&self) -> Result<()> {
        if let Some(encoding) = &self.encoding {
            validate_encoding_label("encoding", encoding)?;
        }
        for column in &self.columns {
            validate_non_empty_string("columns.source_header", &column.source_header)?;
            validate_non_empty_string("columns.target_key", &column.target_key)?;
        }
        Ok(())
    }
}
