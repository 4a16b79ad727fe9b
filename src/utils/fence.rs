//! Normalization applied to provider output before it is parsed as JSON.
//!
//! Models often wrap the payload in a markdown code fence, with or without a
//! language tag. [`strip_code_fence`] removes exactly that wrapping:
//!
//! 1. surrounding whitespace is trimmed;
//! 2. if the text opens with three backticks they are removed, followed by
//!    an optional language tag: a run of ASCII letters, digits, `-`, `_`, `+`
//!    (e.g. `json`), possibly preceded by spaces or a line break;
//! 3. a closing three backticks at the very end are removed;
//! 4. the remainder is trimmed again.
//!
//! Text that does not open with a fence is only trimmed.

const FENCE: &str = "```";

pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = body.trim_start();
    let tag_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
        .unwrap_or(body.len());
    let body = &body[tag_len..];

    let body = body.trim_end();
    let body = body.strip_suffix(FENCE).unwrap_or(body);
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_is_only_trimmed() {
        assert_eq!(strip_code_fence("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn strips_fence_with_language_tag() {
        let raw = "```json\n{\"question\":\"Q\"}\n```";
        assert_eq!(strip_code_fence(raw), "{\"question\":\"Q\"}");
    }

    #[test]
    fn strips_fence_with_uppercase_tag_on_same_line() {
        let raw = "```JSON {\"question\":\"Q\"}```";
        assert_eq!(strip_code_fence(raw), "{\"question\":\"Q\"}");
    }

    #[test]
    fn strips_tag_after_space() {
        assert_eq!(strip_code_fence("``` json\n{}\n```"), "{}");
    }

    #[test]
    fn strips_tag_on_its_own_line() {
        assert_eq!(strip_code_fence("```\njson\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n  JSON\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_bare_fence() {
        let raw = "\n```\n{\"a\":1}\n```\n";
        assert_eq!(strip_code_fence(raw), "{\"a\":1}");
    }

    #[test]
    fn tolerates_missing_closing_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn backticks_inside_payload_are_kept() {
        let raw = "{\"question\":\"What does ``` mean?\"}";
        assert_eq!(strip_code_fence(raw), raw);
    }
}
