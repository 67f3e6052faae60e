use crate::utils::error::{CsvBridgeError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CsvBridgeError::config(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_encoding_label(field_name: &str, label: &str) -> Result<()> {
    if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
        return Err(CsvBridgeError::config(
            field_name,
            format!("Unknown encoding label: {}", label),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("source_header", "name").is_ok());
        assert!(validate_non_empty_string("source_header", "").is_err());
        assert!(validate_non_empty_string("source_header", "   ").is_err());
    }

    #[test]
    fn test_validate_encoding_label() {
        assert!(validate_encoding_label("encoding", "utf-8").is_ok());
        assert!(validate_encoding_label("encoding", "shift_jis").is_ok());
        assert!(validate_encoding_label("encoding", "not-a-charset").is_err());
    }
}
