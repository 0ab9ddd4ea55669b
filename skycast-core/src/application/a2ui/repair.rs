//! Best-effort syntactic repair for malformed A2UI payloads.
//!
//! Well-formed JSON is always returned untouched. Otherwise the normal pass
//! applies four corrections:
//!
//! 1. drop separators that sit directly before a closer;
//! 2. collapse doubled closers while closers outnumber openers;
//! 3. insert missing closers (brackets first, then braces) before the last
//!    `]`, or append them in reverse opening order when the text has none;
//! 4. cut trailing prose that follows a final `]` standing alone on its line.
//!
//! Trailing prose is cut after the collapse and before counting, since a `]]`
//! line only becomes a lone `]` once collapsed. The pass is then repeated until
//! its output stops changing, so repairing a repaired payload is a no-op.
//! Brace counting is textual and does not skip string literals.
//! [`repair_intensified`] is the stricter fallback: it tracks strings and
//! nesting with a stack and closes structures in their real order.

use serde_json::Value;

/// Upper bound on normal passes; realistic payloads settle after two.
const MAX_NORMAL_PASSES: usize = 8;

pub fn repair(payload: &str) -> String {
    if is_well_formed(payload) {
        return payload.to_string();
    }

    let mut current = normal_pass(payload);
    for _ in 1..MAX_NORMAL_PASSES {
        if is_well_formed(&current) {
            break;
        }
        let next = normal_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normal_pass(text: &str) -> String {
    let text = strip_trailing_separators(text);
    let text = collapse_run_on_closers(&text);
    let (body, _trailing) = split_trailing_content(&text);
    balance_closers(body)
}

/// Stricter repair used once more after the normal pass still fails to parse.
pub fn repair_intensified(payload: &str) -> String {
    if is_well_formed(payload) {
        return payload.to_string();
    }

    let text = strip_trailing_separators(payload);
    let mut out = String::with_capacity(text.len() + 8);
    let mut expected: Vec<char> = Vec::new();
    let mut opened = false;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' => {
                expected.push('}');
                opened = true;
                out.push(c);
            }
            '[' => {
                expected.push(']');
                opened = true;
                out.push(c);
            }
            '}' | ']' if expected.contains(&c) => {
                while let Some(closer) = expected.pop() {
                    if closer == c {
                        out.push(c);
                        break;
                    }
                    trim_dangling_separators(&mut out);
                    out.push(closer);
                }
                if opened && expected.is_empty() {
                    break;
                }
            }
            // A closer with no matching opener is dropped.
            '}' | ']' => {}
            _ => out.push(c),
        }
    }

    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }
    trim_dangling_separators(&mut out);
    while let Some(closer) = expected.pop() {
        out.push(closer);
    }

    strip_trailing_separators(&out)
}

fn is_well_formed(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok()
}

fn is_closer(c: char) -> bool {
    c == '}' || c == ']'
}

fn trim_dangling_separators(out: &mut String) {
    let kept = out
        .trim_end_matches(|c: char| c.is_whitespace() || c == ',')
        .len();
    out.truncate(kept);
}

/// Step 1. Repeated until stable so runs like `,,]` are fully removed.
fn strip_trailing_separators(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let chars: Vec<char> = current.chars().collect();
        let mut next = String::with_capacity(current.len());
        for (index, &c) in chars.iter().enumerate() {
            if c == ',' {
                let following = chars[index + 1..].iter().find(|c| !c.is_whitespace());
                if following.is_some_and(|&c| is_closer(c)) {
                    continue;
                }
            }
            next.push(c);
        }
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Step 2.
fn collapse_run_on_closers(text: &str) -> String {
    let mut out = text.to_string();
    for (open, close) in [('{', '}'), ('[', ']')] {
        let opens = out.matches(open).count();
        let mut surplus = out.matches(close).count().saturating_sub(opens);
        let doubled: String = [close, close].iter().collect();
        while surplus > 0 {
            let Some(index) = out.rfind(&doubled) else {
                break;
            };
            out.remove(index + 1);
            surplus -= 1;
        }
    }
    out
}

/// Step 3.
fn balance_closers(text: &str) -> String {
    let missing_brackets = text.matches('[').count().saturating_sub(text.matches(']').count());
    let missing_braces = text.matches('{').count().saturating_sub(text.matches('}').count());
    if missing_brackets == 0 && missing_braces == 0 {
        return text.to_string();
    }

    let Some(last_bracket) = text.rfind(']') else {
        let head = text.trim_end_matches(|c: char| c.is_whitespace() || c == ',');
        let closers = closers_in_nesting_order(text, missing_brackets, missing_braces);
        return format!("{head}{closers}");
    };

    let closers = format!(
        "{}{}",
        "]".repeat(missing_brackets),
        "}".repeat(missing_braces)
    );

    let (before, after) = text.split_at(last_bracket);
    let spacing_start = before.trim_end().len();
    let spacing = &before[spacing_start..];
    let head = before.trim_end_matches(|c: char| c.is_whitespace() || c == ',');

    if spacing.contains('\n') {
        // Keep the final bracket on a line of its own.
        format!("{head}\n{closers}{spacing}{after}")
    } else {
        format!("{head}{closers}{spacing}{after}")
    }
}

/// Closers for the unmatched openers, innermost first.
fn closers_in_nesting_order(text: &str, mut brackets: usize, mut braces: usize) -> String {
    let mut open: Vec<char> = Vec::new();
    for c in text.chars() {
        match c {
            '{' | '[' => open.push(c),
            '}' | ']' => {
                let opener = if c == '}' { '{' } else { '[' };
                if let Some(index) = open.iter().rposition(|&o| o == opener) {
                    open.remove(index);
                }
            }
            _ => {}
        }
    }

    let mut closers = String::with_capacity(brackets + braces);
    for opener in open.iter().rev() {
        match opener {
            '[' if brackets > 0 => {
                closers.push(']');
                brackets -= 1;
            }
            '{' if braces > 0 => {
                closers.push('}');
                braces -= 1;
            }
            _ => {}
        }
    }
    closers.push_str(&"]".repeat(brackets));
    closers.push_str(&"}".repeat(braces));
    closers
}

/// Step 4. Returns the body and, when present, the discarded remainder.
fn split_trailing_content(text: &str) -> (&str, Option<&str>) {
    let mut offset = 0;
    let mut final_bracket_end = None;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if line.trim() == "]" {
            final_bracket_end = Some(offset);
        }
    }

    let Some(end) = final_bracket_end else {
        return (text, None);
    };
    let remainder = &text[end..];
    match remainder.trim_start().chars().next() {
        None | Some(',') | Some('}') | Some(']') => (text, None),
        Some(_) => (&text[..end], Some(remainder)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parses(text: &str) -> bool {
        serde_json::from_str::<Value>(text).is_ok()
    }

    #[test]
    fn test_well_formed_json_is_untouched() {
        let payload = r#"[{"surfaceUpdate":{"surfaceId":"s","components":[{"id":"t","component":{"Text":{"text":{"literalString":"a, }] {["}}}}]}}]"#;
        assert_eq!(repair(payload), payload);
        assert_eq!(repair_intensified(payload), payload);
    }

    #[test]
    fn test_repair_trailing_comma() {
        let repaired = repair(r#"[{"deleteSurface":{"surfaceId":"s",},},]"#);
        assert_eq!(repaired, r#"[{"deleteSurface":{"surfaceId":"s"}}]"#);
    }

    #[test]
    fn test_repair_run_on_closers() {
        let repaired = repair(r#"[{"deleteSurface":{"surfaceId":"s"}}}]"#);
        assert_eq!(repaired, r#"[{"deleteSurface":{"surfaceId":"s"}}]"#);
    }

    #[test]
    fn test_repair_one_missing_brace_and_bracket() {
        let payload = r#"[{"contents":[{"key":"k","valueString":"v"}]"#;
        let repaired = repair(payload);

        assert_eq!(repaired.matches('}').count(), payload.matches('}').count() + 1);
        assert_eq!(repaired.matches(']').count(), payload.matches(']').count() + 1);
        assert!(parses(&repaired), "{repaired}");
    }

    #[test]
    fn test_repair_appends_closers_in_nesting_order() {
        assert_eq!(repair(r#"[{"a":1"#), r#"[{"a":1}]"#);

        let nested = repair(r#"[{"a":{"b":1}"#);
        assert_eq!(nested, r#"[{"a":{"b":1}}]"#);
        assert!(parses(&nested));
    }

    #[test]
    fn test_repair_unclosed_surface_update() {
        let payload = r#"[{"surfaceUpdate":{"surfaceId":"s","components":[{"id":"t","component":{"Text":{"text":{"literalString":"hi"}}}}]"#;
        let repaired = repair(payload);
        assert!(repaired.ends_with("}}}}]}}]"), "{repaired}");
        assert!(parses(&repaired));
    }

    #[test]
    fn test_repair_appends_when_no_bracket_closes() {
        let repaired = repair(r#"{"a": [1, 2,"#);
        assert_eq!(repaired, r#"{"a": [1, 2]}"#);
    }

    #[test]
    fn test_repair_pretty_printed_keeps_final_bracket_line() {
        let payload = "[\n  {\"dataModelUpdate\": {\"surfaceId\": \"s\", \"contents\": [\n    {\"key\": \"k\", \"valueBoolean\": true}\n]\n";
        let repaired = repair(payload);
        assert!(repaired.ends_with("\n]\n"), "{repaired:?}");
        assert!(parses(&repaired), "{repaired}");
    }

    #[test]
    fn test_repair_truncates_trailing_prose() {
        let payload = "[\n  {\"deleteSurface\": {\"surfaceId\": \"s\"}}\n]\nLet me know if you need anything else!";
        let repaired = repair(payload);
        assert_eq!(repaired, "[\n  {\"deleteSurface\": {\"surfaceId\": \"s\"}}\n]\n");
    }

    #[test]
    fn test_repair_collapses_then_truncates_prose() {
        let payload = "[\n  {\"deleteSurface\": {\"surfaceId\": \"s\"}}\n]]\nHope this helps!";
        let repaired = repair(payload);
        assert_eq!(repaired, "[\n  {\"deleteSurface\": {\"surfaceId\": \"s\"}}\n]\n");
        assert_eq!(repair(&repaired), repaired);
    }

    #[test]
    fn test_repair_keeps_valid_continuation() {
        let payload = "{\"a\": [\n  1\n]\n, \"b\": 2";
        let repaired = repair(payload);
        assert!(repaired.contains("\"b\": 2"));
    }

    #[test]
    fn test_repair_is_idempotent() {
        let samples = [
            r#"[{"a":1,},]"#,
            r#"[{"a":1}}}]"#,
            r#"[{"contents":[{"key":"k"}]"#,
            r#"[{"a":1"#,
            "[\n {\"a\": [1,\n]\n]\nthanks {",
            "[\n  {\"a\": {\"b\": 1}\n]\n trailing ] text",
            "{\"a\": [\n  1\n]\n, \"b\": [2",
            ",,]]}}",
            "",
            "no json here",
            "[{\"text\": \"brace { inside\"}",
            "[\n  {\"deleteSurface\": {\"surfaceId\": \"s\"}}\n]]\nHope this helps!",
            "]]\na:,a]",
        ];
        for sample in samples {
            let once = repair(sample);
            assert_eq!(repair(&once), once, "normal pass on {sample:?}");
            let strict = repair_intensified(sample);
            assert_eq!(repair_intensified(&strict), strict, "strict pass on {sample:?}");
        }
    }

    #[test]
    fn test_intensified_closes_in_nesting_order() {
        assert_eq!(repair_intensified(r#"[{"a":1"#), r#"[{"a":1}]"#);
        assert_eq!(repair_intensified(r#"{"a":[1,2}"#), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_intensified_drops_content_after_top_level_value() {
        let repaired = repair_intensified(r#"[{"deleteSurface":{"surfaceId":"s"}}] Hope this helps {"#);
        assert_eq!(repaired, r#"[{"deleteSurface":{"surfaceId":"s"}}]"#);
    }

    #[test]
    fn test_intensified_closes_unterminated_string() {
        let repaired = repair_intensified(r#"[{"text":"hel"#);
        assert_eq!(repaired, r#"[{"text":"hel"}]"#);
        assert!(parses(&repaired));
    }

    #[test]
    fn test_intensified_ignores_braces_in_strings() {
        let repaired = repair_intensified(r#"[{"text":"a { b""#);
        assert_eq!(repaired, r#"[{"text":"a { b"}]"#);
    }
}
