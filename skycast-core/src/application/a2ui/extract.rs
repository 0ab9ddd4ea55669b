//! Splits a model reply into its natural-language and payload segments.

use super::error::PayloadError;
use crate::constants::A2UI_DELIMITER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReply {
    pub text: String,
    pub payload: String,
}

/// Splits on the first delimiter. Purely textual: the payload is not parsed here.
pub fn extract(reply: &str) -> Result<ExtractedReply, PayloadError> {
    let (text, payload) = reply
        .split_once(A2UI_DELIMITER)
        .ok_or(PayloadError::DelimiterMissing)?;

    let payload = strip_code_fence(payload.trim()).trim();
    if payload.is_empty() {
        return Err(PayloadError::EmptyPayload);
    }

    Ok(ExtractedReply {
        text: text.trim().to_string(),
        payload: payload.to_string(),
    })
}

/// Removes a wrapping fenced block (optionally tagged, e.g. ```json) when one frames the text.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) if is_fence_tag(&rest[..newline]) => &rest[newline + 1..],
        Some(_) => rest,
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body)
}

fn is_fence_tag(candidate: &str) -> bool {
    candidate
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_and_payload() {
        let reply = "Here is the forecast.\n---a2ui_JSON---\n[{\"deleteSurface\":{\"surfaceId\":\"s\"}}]\n";
        let extracted = extract(reply).expect("extracts");
        assert_eq!(extracted.text, "Here is the forecast.");
        assert_eq!(extracted.payload, "[{\"deleteSurface\":{\"surfaceId\":\"s\"}}]");
    }

    #[test]
    fn missing_delimiter_is_never_inferred() {
        let reply = "[{\"deleteSurface\":{\"surfaceId\":\"s\"}}]";
        assert_eq!(extract(reply), Err(PayloadError::DelimiterMissing));
    }

    #[test]
    fn strips_tagged_code_fence() {
        let reply = "Done ---a2ui_JSON---\n```json\n[1, 2]\n```\n";
        assert_eq!(extract(reply).expect("extracts").payload, "[1, 2]");

        let untagged = "Done ---a2ui_JSON---```\n[]\n```";
        assert_eq!(extract(untagged).expect("extracts").payload, "[]");
    }

    #[test]
    fn empty_payload_is_reported() {
        assert_eq!(extract("text ---a2ui_JSON---   "), Err(PayloadError::EmptyPayload));
        assert_eq!(
            extract("text ---a2ui_JSON---\n```json\n```"),
            Err(PayloadError::EmptyPayload)
        );
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        let reply = "a ---a2ui_JSON--- [\"---a2ui_JSON---\"]";
        assert_eq!(extract(reply).expect("extracts").payload, "[\"---a2ui_JSON---\"]");
    }
}
