use thiserror::Error;

/// The reply could not be split into text and payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("the response does not contain the '---a2ui_JSON---' delimiter")]
    DelimiterMissing,
    #[error("the A2UI payload after the delimiter is empty")]
    EmptyPayload,
}

/// The payload is not a valid directive batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("failed to parse A2UI JSON at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        offset: usize,
        message: String,
    },
    #[error("A2UI JSON failed schema validation at '{violating_path}': {expected} (found {actual})")]
    Schema {
        violating_path: String,
        expected: String,
        actual: String,
    },
}

impl ValidationError {
    pub fn is_parse(&self) -> bool {
        matches!(self, ValidationError::Parse { .. })
    }
}
