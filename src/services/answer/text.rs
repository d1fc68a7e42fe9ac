//! Cleanup of answer texts returned by the unary methods.

/// Answer used when neither the answer nor the search summary has text.
pub const NO_ANSWER_FALLBACK: &str = "I couldn't find a relevant answer to your question.";

/// Cuts off metadata JSON that the service sometimes appends to the answer.
///
/// The text is truncated at the first `{"type":"metadata"`, at the first
/// `{"sessionId":"<digits>"`, or at the first `{"sessionId":"<any>"` that is
/// followed by `"relatedQuestions"` on the same line (whitespace around the
/// colon allowed), whichever comes first. Texts without any of these markers
/// are returned as is.
pub fn clean_answer_text(text: &str) -> &str {
    let cut = text
        .match_indices('{')
        .map(|(at, _)| at)
        .find(|&at| is_metadata_object(&text[at + 1..]));

    match cut {
        Some(at) => &text[..at],
        None => text,
    }
}

fn is_metadata_object(rest: &str) -> bool {
    if let Some(value) = field_value(rest, "type") {
        return value.starts_with("\"metadata\"");
    }
    if let Some(value) = field_value(rest, "sessionId") {
        let Some(id) = value.strip_prefix('"') else {
            return false;
        };
        let Some(close) = id.find('"') else {
            return false;
        };
        let numeric = close > 0 && id[..close].bytes().all(|b| b.is_ascii_digit());
        let line = id[close + 1..].split('\n').next().unwrap_or_default();
        return numeric || line.contains("\"relatedQuestions\"");
    }
    false
}

/// Returns what follows `"<key>" :` with surrounding whitespace skipped.
fn field_value<'a>(rest: &'a str, key: &str) -> Option<&'a str> {
    let after_key = rest
        .strip_prefix('"')?
        .strip_prefix(key)?
        .strip_prefix('"')?;
    let value = after_key.trim_start().strip_prefix(':')?;
    Some(value.trim_start())
}
