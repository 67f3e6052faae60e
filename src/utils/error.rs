use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvBridgeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Schema file error: {0}")]
    SchemaFileError(#[from] toml::de::Error),

    #[error("CSV write error: {message}")]
    WriteError {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {field}: {reason}")]
    ConfigError { field: String, reason: String },

    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),
}

impl CsvBridgeError {
    pub fn write(message: impl Into<String>) -> Self {
        CsvBridgeError::WriteError {
            message: message.into(),
            source: None,
        }
    }

    pub fn write_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        CsvBridgeError::WriteError {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CsvBridgeError::ConfigError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CsvBridgeError>;
