//! Report error types.

/// Errors raised while decoding, validating or serializing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid JSON report: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Missing required field `{field}`")]
    MissingField { field: String },

    #[error("Field `{field}` must be {expected}")]
    InvalidField { field: String, expected: &'static str },

    #[error("Field `{field}` is not a valid count: {value}")]
    MalformedCount { field: String, value: String },

    #[error("Check {index} of test case `{testcase}` has a result but no `{field}`")]
    MalformedCheck {
        testcase: String,
        index: usize,
        field: &'static str,
    },

    #[error("Failed to serialize JUnit XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl ReportError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        ReportError::MissingField { field: field.into() }
    }

    pub(crate) fn invalid(field: impl Into<String>, expected: &'static str) -> Self {
        ReportError::InvalidField {
            field: field.into(),
            expected,
        }
    }

    /// Short machine-readable kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Decode(_) => "decode",
            ReportError::MissingField { .. } => "missing_field",
            ReportError::InvalidField { .. } => "invalid_field",
            ReportError::MalformedCount { .. } => "malformed_count",
            ReportError::MalformedCheck { .. } => "malformed_check",
            ReportError::Xml(_) => "xml",
        }
    }
}
