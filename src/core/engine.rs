use crate::core::{header, mapper, tokenizer, writer};
use crate::domain::model::{ColumnSchema, RowDiagnostic, TypedRecord};
use crate::utils::error::Result;
use std::io::{Read, Write};

/// Everything one import call produced. Mirrors the stage results: parse can
/// fail structurally, header validation can reject the document, mapping
/// always yields records plus diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub headers: Option<Vec<String>>,
    pub records: Vec<TypedRecord>,
    pub diagnostics: Vec<RowDiagnostic>,
    pub error: Option<String>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Composes the pipeline stages: tokenize, optionally validate headers, map
/// rows on import; write records on export. Holds only the encoding label, so
/// one engine value is shareable across calls and threads.
#[derive(Debug, Clone)]
pub struct CsvEngine {
    encoding: String,
}

impl Default for CsvEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvEngine {
    pub fn new() -> Self {
        Self::with_encoding(tokenizer::DEFAULT_ENCODING)
    }

    pub fn with_encoding(encoding: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
        }
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Runs the import pipeline against one stream. When `expected_headers`
    /// is given, a header mismatch fails the whole import; pass `None` to
    /// skip validation, as callers that trust the source do.
    pub fn import<R: Read>(
        &self,
        reader: &mut R,
        expected_headers: Option<&[String]>,
        schema: &[ColumnSchema],
    ) -> ImportReport {
        tracing::debug!("parsing input stream as {}", self.encoding);
        let outcome = tokenizer::parse(reader, &self.encoding);
        let headers = match outcome.headers {
            Some(headers) => headers,
            None => {
                let message = outcome
                    .error
                    .unwrap_or_else(|| "parse failed".to_string());
                tracing::warn!("import aborted: {}", message);
                return ImportReport::failure(message);
            }
        };

        if let Some(expected) = expected_headers {
            if let Some(cause) = header::mismatch(Some(&headers), expected) {
                tracing::warn!("import aborted: {}", cause);
                return ImportReport::failure(format!("header validation failed: {}", cause));
            }
        }

        let mapped = mapper::map_rows(&outcome.data_rows, &headers, schema);
        tracing::info!(
            "imported {} records ({} diagnostics)",
            mapped.records.len(),
            mapped.diagnostics.len()
        );

        ImportReport {
            headers: Some(headers),
            records: mapped.records,
            diagnostics: mapped.diagnostics,
            error: None,
        }
    }

    /// Serializes records to the sink in this engine's encoding.
    pub fn export<W: Write>(
        &self,
        writer: &mut W,
        headers: &[String],
        records: &[TypedRecord],
    ) -> Result<()> {
        tracing::debug!("writing {} records as {}", records.len(), self.encoding);
        writer::write(writer, headers, records, &self.encoding)
    }
}
