//! Parses a repaired payload and checks it against the directive schema.

use super::directive::DirectiveBatch;
use super::error::ValidationError;
use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

/// JSON schema for a directive batch, shared with the prompt builder.
pub const BATCH_SCHEMA: &str = include_str!("../../../assets/a2ui_batch.schema.json");

const ACTUAL_PREVIEW_LIMIT: usize = 160;

static COMPILED_SCHEMA: Lazy<Result<Validator, String>> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(BATCH_SCHEMA).map_err(|e| e.to_string())?;
    jsonschema::validator_for(&schema).map_err(|e| e.to_string())
});

/// Same input, same outcome: no state is consulted besides the embedded schema.
pub fn validate(payload: &str) -> Result<DirectiveBatch, ValidationError> {
    let value: Value = serde_json::from_str(payload).map_err(|err| parse_error(payload, &err))?;
    check_schema(&value)?;

    serde_json::from_value(value.clone()).map_err(|err| ValidationError::Schema {
        violating_path: String::new(),
        expected: err.to_string(),
        actual: preview(&value),
    })
}

fn check_schema(value: &Value) -> Result<(), ValidationError> {
    let validator = COMPILED_SCHEMA
        .as_ref()
        .map_err(|reason| ValidationError::Schema {
            violating_path: String::new(),
            expected: format!("a usable directive schema ({reason})"),
            actual: "schema failed to compile".to_string(),
        })?;

    match validator.iter_errors(value).next() {
        None => Ok(()),
        Some(error) => {
            let path = error.instance_path.to_string();
            Err(ValidationError::Schema {
                violating_path: if path.is_empty() { "/".to_string() } else { path },
                expected: error.to_string(),
                actual: preview(&error.instance),
            })
        }
    }
}

fn parse_error(payload: &str, err: &serde_json::Error) -> ValidationError {
    let line = err.line();
    let column = err.column();
    ValidationError::Parse {
        line,
        column,
        offset: byte_offset(payload, line, column),
        message: err.to_string(),
    }
}

/// Converts serde_json's 1-based line/column into a byte offset.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

fn preview(value: &Value) -> String {
    let compact = value.to_string();
    if compact.len() <= ACTUAL_PREVIEW_LIMIT {
        return compact;
    }
    let mut cut = ACTUAL_PREVIEW_LIMIT;
    while !compact.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &compact[..cut])
}
