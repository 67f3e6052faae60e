use crate::domain::model::{
    CellValue, ColumnKind, ColumnSchema, DiagnosticKind, MapOutcome, RowDiagnostic, TypedRecord,
};
use std::collections::HashMap;

const TRUTHY: [&str; 6] = ["true", "1", "yes", "t", "〇", "有効"];
const FALSY: [&str; 6] = ["false", "0", "no", "f", "×", "無効"];

/// Converts raw rows into typed records using per-column rules.
///
/// Builds the header-to-schema lookup once per call; duplicate
/// `source_header` entries resolve last-wins. Nothing here aborts the call:
/// every defect becomes a [`RowDiagnostic`] and processing moves on to the
/// next cell or row.
pub fn map_rows(
    data_rows: &[Vec<String>],
    actual_headers: &[String],
    schema: &[ColumnSchema],
) -> MapOutcome {
    let mut lookup: HashMap<&str, &ColumnSchema> = HashMap::with_capacity(schema.len());
    for column in schema {
        lookup.insert(column.source_header.as_str(), column);
    }

    let mut outcome = MapOutcome::default();

    for header in actual_headers {
        if !lookup.contains_key(header.as_str()) {
            tracing::warn!("no schema entry for header '{}', column skipped", header);
            outcome.diagnostics.push(RowDiagnostic::schema(
                DiagnosticKind::UnmappedHeader,
                format!("no schema entry for header '{}'", header),
            ));
        }
    }

    for (row_index, row) in data_rows.iter().enumerate() {
        if row.len() != actual_headers.len() {
            tracing::warn!(
                "row {}: {} fields, expected {}, row skipped",
                row_index,
                row.len(),
                actual_headers.len()
            );
            outcome.diagnostics.push(RowDiagnostic::row(
                row_index,
                DiagnosticKind::ColumnCountMismatch,
                format!("{} fields, expected {}", row.len(), actual_headers.len()),
            ));
            continue;
        }

        let mut record = TypedRecord::new();
        let mut defective = false;

        for (col_index, header) in actual_headers.iter().enumerate() {
            let column = match lookup.get(header.as_str()) {
                Some(column) => *column,
                None => continue,
            };

            let cell = row[col_index].trim();
            match coerce(cell, column) {
                Ok(value) => record.insert(column.target_key.clone(), value),
                Err(reason) => {
                    record.insert(column.target_key.clone(), CellValue::Null);
                    if column.optional {
                        tracing::info!("row {}, column '{}': {}", row_index, header, reason);
                        outcome.diagnostics.push(RowDiagnostic::row(
                            row_index,
                            DiagnosticKind::CoercionFailure,
                            format!("column '{}': {}", header, reason),
                        ));
                    } else {
                        defective = true;
                        tracing::warn!(
                            "row {}, mandatory column '{}': {}",
                            row_index,
                            header,
                            reason
                        );
                        outcome.diagnostics.push(RowDiagnostic::row(
                            row_index,
                            DiagnosticKind::MandatoryFieldDefect,
                            format!("column '{}': {}", header, reason),
                        ));
                    }
                }
            }
        }

        if !record.is_blank() || !defective {
            outcome.records.push(record);
        } else {
            tracing::warn!("row {}: blank after mandatory-field defects, dropped", row_index);
            outcome.diagnostics.push(RowDiagnostic::row(
                row_index,
                DiagnosticKind::RowDropped,
                "blank after mandatory-field defects".to_string(),
            ));
        }
    }

    outcome
}

/// Coerces one trimmed cell per its column's expected type. Blank cells on
/// optional non-string columns yield null; anything unparseable is an error
/// the caller downgrades to a diagnostic.
fn coerce(cell: &str, column: &ColumnSchema) -> Result<CellValue, String> {
    match column.kind {
        ColumnKind::Str => Ok(CellValue::Str(cell.to_string())),
        ColumnKind::Int => {
            if cell.is_empty() && column.optional {
                return Ok(CellValue::Null);
            }
            cell.parse::<i32>()
                .map(CellValue::Int)
                .map_err(|_| format!("'{}' is not a valid integer", cell))
        }
        ColumnKind::Long => {
            if cell.is_empty() && column.optional {
                return Ok(CellValue::Null);
            }
            cell.parse::<i64>()
                .map(CellValue::Long)
                .map_err(|_| format!("'{}' is not a valid long", cell))
        }
        ColumnKind::Double => {
            if cell.is_empty() && column.optional {
                return Ok(CellValue::Null);
            }
            cell.parse::<f64>()
                .map(CellValue::Double)
                .map_err(|_| format!("'{}' is not a valid double", cell))
        }
        ColumnKind::Bool => {
            if cell.is_empty() && column.optional {
                return Ok(CellValue::Null);
            }
            let lowered = cell.to_lowercase();
            if TRUTHY.contains(&lowered.as_str()) {
                Ok(CellValue::Bool(true))
            } else if FALSY.contains(&lowered.as_str()) {
                Ok(CellValue::Bool(false))
            } else {
                Err(format!("'{}' is not a recognized boolean token", cell))
            }
        }
    }
}
