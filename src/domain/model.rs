use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One typed cell. Closed set of variants so every consumer has to handle
/// all five data kinds plus null exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Str(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    Null,
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text rendering used by the record writer. Null renders as the empty
    /// string, same as an absent key.
    pub fn render(&self) -> String {
        match self {
            CellValue::Str(s) => s.clone(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Long(v) => v.to_string(),
            CellValue::Double(v) => v.to_string(),
            CellValue::Bool(v) => v.to_string(),
            CellValue::Null => String::new(),
        }
    }

    /// Maps a JSON value onto a cell. Whole numbers come back as `Long`,
    /// fractional ones as `Double`; composite values are flattened to their
    /// JSON text since records are flat by contract.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Long(i)
                } else {
                    CellValue::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => CellValue::Str(s.clone()),
            other => CellValue::Str(other.to_string()),
        }
    }
}

/// Expected type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Str,
    Int,
    Long,
    Double,
    Bool,
}

/// One expected CSV column: which header it reads from, which key it writes
/// to, and how the raw cell is coerced. Plain immutable value type; shareable
/// across concurrent calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub source_header: String,
    pub target_key: String,
    pub kind: ColumnKind,
    #[serde(default)]
    pub optional: bool,
}

impl ColumnSchema {
    pub fn new(
        source_header: impl Into<String>,
        target_key: impl Into<String>,
        kind: ColumnKind,
        optional: bool,
    ) -> Self {
        Self {
            source_header: source_header.into(),
            target_key: target_key.into(),
            kind,
            optional,
        }
    }
}

/// A typed record with insertion-ordered keys (schema order for the columns
/// present in the row). Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedRecord {
    fields: Vec<(String, CellValue)>,
}

impl TypedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value. Replacing keeps the key's original
    /// position so key order stays stable.
    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when the record carries no non-null value. This is the emptiness
    /// the row-acceptance rule checks: nulls stored for blank or failed cells
    /// do not make a row worth keeping on their own.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_null())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for TypedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Result of tokenizing one stream. Constructed once, immutable afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// Absent exactly when the parse failed.
    pub headers: Option<Vec<String>>,
    /// Never absent; empty on failure.
    pub data_rows: Vec<Vec<String>>,
    /// Present exactly when the parse failed.
    pub error: Option<String>,
}

impl ParseOutcome {
    pub fn success(headers: Vec<String>, data_rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: Some(headers),
            data_rows,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            headers: None,
            data_rows: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// What went wrong with one row or column during mapping. Non-fatal by
/// definition; fatal conditions never reach this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Row field count differs from the header count; row skipped.
    ColumnCountMismatch,
    /// A header had no schema entry; column skipped for every row.
    UnmappedHeader,
    /// A cell failed to coerce on an optional column; null stored.
    CoercionFailure,
    /// A cell failed to coerce on a mandatory column; null stored, row marked.
    MandatoryFieldDefect,
    /// Row was blank after defects and got dropped from the result.
    RowDropped,
}

/// One structured defect, returned alongside the typed records so callers and
/// tests can assert on exact counts instead of scraping logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiagnostic {
    /// Zero-based index into the data rows handed to the mapper. `None` for
    /// defects that are not tied to a row, such as unmapped headers.
    pub row_index: Option<usize>,
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl RowDiagnostic {
    pub fn row(row_index: usize, kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            row_index: Some(row_index),
            kind,
            detail: detail.into(),
        }
    }

    pub fn schema(kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            row_index: None,
            kind,
            detail: detail.into(),
        }
    }
}

/// Typed records plus the structured defect trail for one mapping call.
#[derive(Debug, Clone, Default)]
pub struct MapOutcome {
    pub records: Vec<TypedRecord>,
    pub diagnostics: Vec<RowDiagnostic>,
}

impl MapOutcome {
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}
