use crate::domain::model::ParseOutcome;
use encoding_rs::Encoding;
use std::io::Read;

pub const DEFAULT_ENCODING: &str = "utf-8";

pub(crate) const DELIMITER: char = ',';
pub(crate) const BOM: char = '\u{feff}';

/// Tokenizes a raw byte stream into a header row and data rows.
///
/// Reads the whole stream into memory, decodes it with the named encoding,
/// strips a single leading BOM, normalizes CRLF and lone CR to LF, and splits
/// on the delimiter with per-field trimming. No quote-aware splitting: a
/// quoted field produced by the writer is not unescaped here, so round trips
/// only hold for cells without delimiter, quote, or line-break characters.
///
/// Never returns an error: every failure (unknown encoding, read fault,
/// decode fault, blank input) becomes a failed `ParseOutcome`.
pub fn parse<R: Read>(reader: &mut R, encoding_label: &str) -> ParseOutcome {
    let encoding = match Encoding::for_label(encoding_label.as_bytes()) {
        Some(encoding) => encoding,
        None => {
            return ParseOutcome::failure(format!("Unknown encoding label: {}", encoding_label))
        }
    };

    let mut raw = Vec::new();
    if let Err(e) = reader.read_to_end(&mut raw) {
        tracing::warn!("CSV read failed: {}", e);
        return ParseOutcome::failure(format!("Failed to read CSV stream: {}", e));
    }

    // decode() sniffs and removes a matching BOM; the explicit strip below
    // covers a U+FEFF that survives, e.g. a UTF-8 BOM under a legacy label.
    let (decoded, _, had_errors) = encoding.decode(&raw);
    if had_errors {
        tracing::warn!("CSV decode failed for encoding {}", encoding.name());
        return ParseOutcome::failure(format!(
            "Input is not valid {} text",
            encoding.name()
        ));
    }

    let text = decoded.strip_prefix(BOM).unwrap_or(&decoded);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<&str> = normalized
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return ParseOutcome::failure("CSV file is empty or contains only whitespace.");
    }

    let headers = split_line(lines[0]);
    let mut data_rows = Vec::with_capacity(lines.len() - 1);

    for (line_index, line) in lines.iter().enumerate().skip(1) {
        let fields = split_line(line);
        if fields.len() != headers.len() {
            // Never fatal at this stage; the mapper decides what to do.
            tracing::warn!(
                "line {}: {} fields, expected {}",
                line_index + 1,
                fields.len(),
                headers.len()
            );
        }
        data_rows.push(fields);
    }

    ParseOutcome::success(headers, data_rows)
}

fn split_line(line: &str) -> Vec<String> {
    line.split(DELIMITER)
        .map(|field| field.trim().to_string())
        .collect()
}
