//! Incremental splitter for streams of concatenated JSON objects.
//!
//! `streamAnswer` responds with a JSON array of answer objects whose bytes
//! arrive in chunks that ignore object boundaries:
//! ```text
//! [{"answer":{"state":"STREAMING","answerText":"Hel
//! lo"}},{"answer":{"state":"SUCCEEDED", ...}}]
//! ```
//! The tokenizer tracks string literals, escapes and brace depth to find
//! every top-level `{...}` span. Array brackets, commas and whitespace
//! between objects are skipped.

use serde::de::IgnoredAny;

/// Lexical state of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any string literal.
    Normal,
    /// Inside a string literal.
    InString,
    /// After a backslash inside a string literal.
    Escaped,
}

/// Splits a byte stream into complete top-level JSON objects.
///
/// The buffer holds raw bytes, so a UTF-8 sequence split across chunks is
/// reassembled before anything is decoded. Every structural character is
/// ASCII and never appears inside a multi-byte sequence, which keeps
/// byte-wise scanning exact. Scan state survives between chunks, so each
/// byte is examined once.
#[derive(Debug)]
pub struct ObjectTokenizer {
    /// Unconsumed bytes. Index 0 is the start of the open object, if any.
    buffer: Vec<u8>,
    /// Next byte to scan.
    cursor: usize,
    state: ScanState,
    depth: usize,
    /// Start of the object currently open at depth >= 1.
    object_start: Option<usize>,
}

impl ObjectTokenizer {
    /// Creates an empty tokenizer.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            state: ScanState::Normal,
            depth: 0,
            object_start: None,
        }
    }

    /// Appends a chunk and returns every object completed by it, in order.
    ///
    /// Returned strings are byte-identical to their spans in the input.
    /// A completed span that is not valid UTF-8 JSON is dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut objects = Vec::new();

        while self.cursor < self.buffer.len() {
            let pos = self.cursor;
            let byte = self.buffer[pos];
            self.cursor += 1;

            match self.state {
                ScanState::Escaped => self.state = ScanState::InString,
                ScanState::InString => match byte {
                    b'\\' => self.state = ScanState::Escaped,
                    b'"' => self.state = ScanState::Normal,
                    _ => {}
                },
                ScanState::Normal => match byte {
                    b'"' => self.state = ScanState::InString,
                    b'{' => {
                        if self.depth == 0 {
                            self.object_start = Some(pos);
                        }
                        self.depth += 1;
                    }
                    // A stray `}` at depth zero is noise between objects.
                    b'}' if self.depth > 0 => {
                        self.depth -= 1;
                        if self.depth == 0 {
                            if let Some(start) = self.object_start.take() {
                                if let Some(object) = decode_span(&self.buffer[start..=pos]) {
                                    objects.push(object);
                                }
                            }
                        }
                    }
                    _ => {}
                },
            }
        }

        self.compact();
        objects
    }

    /// Number of bytes held for an object that has not closed yet.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if an object is open and waiting for more bytes.
    pub fn has_partial_object(&self) -> bool {
        self.object_start.is_some()
    }

    /// Drops consumed bytes: everything before the open object, or the
    /// whole buffer when no object is open.
    fn compact(&mut self) {
        let keep_from = self.object_start.unwrap_or(self.buffer.len());
        if keep_from == 0 {
            return;
        }
        self.buffer.drain(..keep_from);
        self.cursor -= keep_from;
        if self.object_start.is_some() {
            self.object_start = Some(0);
        }
    }
}

impl Default for ObjectTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a closed span; malformed upstream output is logged and skipped.
fn decode_span(span: &[u8]) -> Option<String> {
    if let Err(e) = serde_json::from_slice::<IgnoredAny>(span) {
        tracing::debug!(error = %e, span_len = span.len(), "Dropping malformed stream object");
        return None;
    }

    match String::from_utf8(span.to_vec()) {
        Ok(object) => Some(object),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping stream object with invalid UTF-8");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_object() {
        let mut tokenizer = ObjectTokenizer::new();
        let objects = tokenizer.push(br#"{"key": "value"}"#);
        assert_eq!(objects, vec![r#"{"key": "value"}"#.to_string()]);
        assert_eq!(tokenizer.buffered_len(), 0);
    }

    #[test]
    fn test_array_framing_is_skipped() {
        let mut tokenizer = ObjectTokenizer::new();
        let objects = tokenizer.push(b"[{\"a\":1},\n{\"b\":{\"c\":[1,2]}}]");
        assert_eq!(objects, vec![r#"{"a":1}"#.to_string(), r#"{"b":{"c":[1,2]}}"#.to_string()]);
        assert!(!tokenizer.has_partial_object());
    }

    #[test]
    fn test_braces_inside_strings() {
        let mut tokenizer = ObjectTokenizer::new();
        let objects = tokenizer.push(br#"{"key": "value with } brace and { another"}"#);
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn test_escaped_quote_and_backslash() {
        let mut tokenizer = ObjectTokenizer::new();
        let input = r#"{"q": "say \"}\" now", "p": "C:\\"}{"next": 1}"#;
        let objects = tokenizer.push(input.as_bytes());
        assert_eq!(
            objects,
            vec![r#"{"q": "say \"}\" now", "p": "C:\\"}"#.to_string(), r#"{"next": 1}"#.to_string()]
        );
    }

    #[test]
    fn test_incomplete_object_stays_buffered() {
        let mut tokenizer = ObjectTokenizer::new();
        assert!(tokenizer.push(br#"[{"key": "val"#).is_empty());
        assert!(tokenizer.has_partial_object());
        assert_eq!(tokenizer.buffered_len(), r#"{"key": "val"#.len());

        let objects = tokenizer.push(br#"ue"}]"#);
        assert_eq!(objects, vec![r#"{"key": "value"}"#.to_string()]);
    }

    #[test]
    fn test_split_escape_sequence() {
        let mut tokenizer = ObjectTokenizer::new();
        assert!(tokenizer.push(br#"{"k": "a\"#).is_empty());
        assert!(tokenizer.push(br#""}"#).is_empty());
        let objects = tokenizer.push(br#"" }"#);
        assert_eq!(objects, vec![r#"{"k": "a\"}" }"#.to_string()]);
    }

    #[test]
    fn test_malformed_object_is_dropped() {
        let mut tokenizer = ObjectTokenizer::new();
        let objects = tokenizer.push(br#"{"a": tru}{"b": true}"#);
        assert_eq!(objects, vec![r#"{"b": true}"#.to_string()]);
    }

    #[test]
    fn test_stray_closing_brace_ignored() {
        let mut tokenizer = ObjectTokenizer::new();
        let objects = tokenizer.push(br#"}]{"ok": 1}"#);
        assert_eq!(objects, vec![r#"{"ok": 1}"#.to_string()]);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let text = r#"{"t": "caf\u00e9 é"}"#;
        let bytes = text.as_bytes();
        let split = text.find('é').unwrap() + 1;

        let mut tokenizer = ObjectTokenizer::new();
        assert!(tokenizer.push(&bytes[..split]).is_empty());
        let objects = tokenizer.push(&bytes[split..]);
        assert_eq!(objects, vec![text.to_string()]);
    }
}
