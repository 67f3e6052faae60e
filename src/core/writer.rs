use crate::core::tokenizer::{BOM, DELIMITER};
use crate::domain::model::TypedRecord;
use crate::utils::error::{CsvBridgeError, Result};
use encoding_rs::{Encoding, UTF_8};
use std::io::Write;

/// Serializes typed records into escaped CSV text on the given sink.
///
/// Emits the BOM (UTF-8 output only), the escaped header line, then one line
/// per record with values rendered in header order; absent and null values
/// render as empty fields. The sink is flushed before returning; any I/O
/// fault is wrapped into a write error carrying the cause.
pub fn write<W: Write>(
    writer: &mut W,
    headers: &[String],
    records: &[TypedRecord],
    encoding_label: &str,
) -> Result<()> {
    if headers.is_empty() && !records.is_empty() {
        return Err(CsvBridgeError::write("cannot write data without headers"));
    }

    let encoding = Encoding::for_label(encoding_label.as_bytes())
        .ok_or_else(|| CsvBridgeError::UnknownEncoding(encoding_label.to_string()))?;

    let mut text = String::new();
    // Legacy encodings have no BOM to emit; U+FEFF would come out as a
    // numeric character reference there.
    if encoding == UTF_8 {
        text.push(BOM);
    }

    if !headers.is_empty() {
        push_line(&mut text, headers.iter().map(String::as_str));
        for record in records {
            let values: Vec<String> = headers
                .iter()
                .map(|header| record.get(header).map(|v| v.render()).unwrap_or_default())
                .collect();
            push_line(&mut text, values.iter().map(String::as_str));
        }
    }

    let (bytes, _, _) = encoding.encode(&text);
    writer
        .write_all(&bytes)
        .map_err(|e| CsvBridgeError::write_with_source("failed to write CSV output", e))?;
    writer
        .flush()
        .map_err(|e| CsvBridgeError::write_with_source("failed to flush CSV output", e))?;
    Ok(())
}

fn push_line<'a>(text: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            text.push(DELIMITER);
        }
        text.push_str(&escape_csv_field(field));
        first = false;
    }
    text.push('\n');
}

/// RFC4180-style minimal quoting: quotes are doubled, and the field is
/// wrapped in quotes only when the original contains the delimiter, a quote,
/// or a line break. Not idempotent; apply exactly once per field.
pub fn escape_csv_field(field: &str) -> String {
    let doubled = field.replace('"', "\"\"");
    if field.contains(DELIMITER)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
    {
        format!("\"{}\"", doubled)
    } else {
        doubled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CellValue;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn record(entries: &[(&str, CellValue)]) -> TypedRecord {
        let mut record = TypedRecord::new();
        for (key, value) in entries {
            record.insert(*key, value.clone());
        }
        record
    }

    fn write_to_string(headers: &[String], records: &[TypedRecord]) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer, headers, records, "utf-8").unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_escape_plain_field_unchanged() {
        assert_eq!(escape_csv_field("Alice"), "Alice");
        assert_eq!(escape_csv_field(""), "");
    }

    #[test]
    fn test_escape_quote_doubling() {
        assert_eq!(escape_csv_field("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_escape_delimiter_and_line_breaks() {
        assert_eq!(escape_csv_field("Smith, J."), "\"Smith, J.\"");
        assert_eq!(escape_csv_field("a\nb"), "\"a\nb\"");
        assert_eq!(escape_csv_field("a\rb"), "\"a\rb\"");
    }

    #[test]
    fn test_escape_is_not_idempotent() {
        let once = escape_csv_field("a\"b");
        let twice = escape_csv_field(&once);
        assert_ne!(once, twice);
    }

    #[test]
    fn test_write_bom_header_and_rows() {
        let output = write_to_string(
            &headers(&["name", "age"]),
            &[record(&[
                ("name", CellValue::Str("Alice".to_string())),
                ("age", CellValue::Int(30)),
            ])],
        );

        assert_eq!(output, "\u{feff}name,age\nAlice,30\n");
    }

    #[test]
    fn test_write_quotes_field_with_delimiter() {
        let output = write_to_string(
            &headers(&["name"]),
            &[record(&[("name", CellValue::Str("Smith, J.".to_string()))])],
        );

        assert_eq!(output, "\u{feff}name\n\"Smith, J.\"\n");
    }

    #[test]
    fn test_write_null_and_absent_values_as_empty() {
        let output = write_to_string(
            &headers(&["name", "age", "note"]),
            &[record(&[
                ("name", CellValue::Str("Bob".to_string())),
                ("age", CellValue::Null),
            ])],
        );

        assert_eq!(output, "\u{feff}name,age,note\nBob,,\n");
    }

    #[test]
    fn test_write_fails_without_headers() {
        let mut buffer = Vec::new();
        let result = write(
            &mut buffer,
            &[],
            &[record(&[("name", CellValue::Str("x".to_string()))])],
            "utf-8",
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("cannot write data without headers"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_write_empty_headers_and_records_is_just_bom() {
        let output = write_to_string(&[], &[]);
        assert_eq!(output, "\u{feff}");
    }

    #[test]
    fn test_write_wraps_io_failure() {
        struct FailingSink;
        impl std::io::Write for FailingSink {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "sink broke"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let result = write(&mut FailingSink, &headers(&["a"]), &[], "utf-8");
        match result {
            Err(CsvBridgeError::WriteError { source, .. }) => {
                assert!(source.is_some());
            }
            other => panic!("expected WriteError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_write_shift_jis_without_bom() {
        let mut buffer = Vec::new();
        write(
            &mut buffer,
            &headers(&["名前"]),
            &[record(&[("名前", CellValue::Str("テスト".to_string()))])],
            "shift_jis",
        )
        .unwrap();

        let (decoded, _, _) = encoding_rs::SHIFT_JIS.decode(&buffer);
        assert_eq!(decoded, "名前\nテスト\n");
    }
}
