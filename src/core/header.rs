use std::fmt;

/// Why a header check failed. Exposed so callers and tests can see the cause
/// without changing the boolean contract of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMismatch {
    /// No headers at all (failed parse upstream).
    Missing,
    LengthMismatch { actual: usize, expected: usize },
    ValueMismatch {
        index: usize,
        actual: String,
        expected: String,
    },
}

impl fmt::Display for HeaderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderMismatch::Missing => write!(f, "headers are absent"),
            HeaderMismatch::LengthMismatch { actual, expected } => {
                write!(f, "{} headers, expected {}", actual, expected)
            }
            HeaderMismatch::ValueMismatch {
                index,
                actual,
                expected,
            } => write!(
                f,
                "header {} is '{}', expected '{}'",
                index, actual, expected
            ),
        }
    }
}

/// Returns the first difference between actual and expected headers, or
/// `None` when they match element-wise. Case-sensitive; no extra trimming
/// beyond what the tokenizer already did.
pub fn mismatch(actual: Option<&[String]>, expected: &[String]) -> Option<HeaderMismatch> {
    let actual = match actual {
        Some(actual) => actual,
        None => return Some(HeaderMismatch::Missing),
    };

    if actual.len() != expected.len() {
        return Some(HeaderMismatch::LengthMismatch {
            actual: actual.len(),
            expected: expected.len(),
        });
    }

    for (index, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        if a != e {
            return Some(HeaderMismatch::ValueMismatch {
                index,
                actual: a.clone(),
                expected: e.clone(),
            });
        }
    }

    None
}

/// Boolean header check. Logs the cause of any false result.
pub fn validate(actual: Option<&[String]>, expected: &[String]) -> bool {
    match mismatch(actual, expected) {
        Some(cause) => {
            tracing::warn!("header validation failed: {}", cause);
            false
        }
        None => true,
    }
}
