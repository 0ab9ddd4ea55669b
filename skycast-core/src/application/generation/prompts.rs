use super::error::GenerationFailure;
use crate::constants::A2UI_DELIMITER;

/// Follow-up query for the next attempt. Always carries the original request verbatim.
pub fn corrective_prompt(failure: &GenerationFailure, original_query: &str) -> String {
    if failure.is_silent() {
        return format!(
            "I received no response. Please try again. Please retry the original request: '{original_query}'"
        );
    }

    format!(
        "Your previous response was invalid. {failure} You MUST generate a valid response that \
         strictly follows the A2UI JSON SCHEMA. The response MUST be a JSON list of A2UI messages. \
         Ensure the response is split by '{A2UI_DELIMITER}' and the JSON part is well-formed. \
         Please retry the original request: '{original_query}'"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::PayloadError;

    #[test]
    fn invalid_reply_prompt_embeds_diagnostic_and_query() {
        let prompt = corrective_prompt(
            &GenerationFailure::Payload(PayloadError::DelimiterMissing),
            "Weather in Boston",
        );
        assert!(prompt.starts_with("Your previous response was invalid."));
        assert!(prompt.contains("does not contain the '---a2ui_JSON---' delimiter"));
        assert!(prompt.ends_with("Please retry the original request: 'Weather in Boston'"));
    }

    #[test]
    fn empty_reply_prompt_asks_to_retry() {
        let prompt = corrective_prompt(&GenerationFailure::GenerationEmpty, "Weather in Boston");
        assert_eq!(
            prompt,
            "I received no response. Please try again. Please retry the original request: 'Weather in Boston'"
        );
    }
}
