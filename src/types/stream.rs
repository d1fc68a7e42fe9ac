//! Normalized references, citations and the events emitted to callers.

use serde::{Deserialize, Deserializer, Serialize};

/// Source document backing part of an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Document title.
    pub title: Option<String>,
    /// Document URI.
    pub uri: Option<String>,
    /// Extracted content snippet.
    pub content: Option<String>,
    /// Page number parsed from the leading token of `content`.
    pub page_number: Option<u32>,
}

/// Index-based citation into the final answer text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Start offset of the cited span, in characters.
    #[serde(default, deserialize_with = "lenient_index")]
    pub start_index: Option<usize>,
    /// End offset of the cited span, in characters. Markers go here.
    #[serde(default, deserialize_with = "lenient_index")]
    pub end_index: Option<usize>,
    /// Sources supporting the span.
    #[serde(default)]
    pub sources: Vec<CitationSource>,
}

impl Citation {
    /// Creates a citation ending at `end_index` backed by the given reference ids.
    pub fn new<I, S>(end_index: usize, reference_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start_index: None,
            end_index: Some(end_index),
            sources: reference_ids
                .into_iter()
                .map(|id| CitationSource { reference_id: Some(id.into()) })
                .collect(),
        }
    }
}

/// One source of a citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationSource {
    /// Position of the reference in the answer's `references` list.
    #[serde(default, deserialize_with = "lenient_id")]
    pub reference_id: Option<String>,
}

/// Event emitted by the answer stream.
///
/// A stream yields any number of `Content` events followed by exactly one
/// `Metadata` and one `Done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// Answer text. With `replace` unset, `text` is a delta to append;
    /// with it set, `text` supersedes everything shown so far.
    Content {
        /// Delta or replacement text.
        text: String,
        /// Whether previously emitted text must be discarded.
        replace: bool,
    },
    /// Session and source information, emitted once the answer is complete.
    Metadata {
        /// Session id to continue the conversation with.
        #[serde(rename = "sessionId")]
        session_id: Option<String>,
        /// Follow-up questions.
        #[serde(rename = "relatedQuestions")]
        related_questions: Vec<String>,
        /// References cited by the answer.
        references: Vec<Reference>,
    },
    /// End of stream.
    Done,
}

impl StreamChunk {
    /// Incremental text to append.
    pub fn delta(text: impl Into<String>) -> Self {
        StreamChunk::Content { text: text.into(), replace: false }
    }

    /// Text replacing everything emitted so far.
    pub fn replace(text: impl Into<String>) -> Self {
        StreamChunk::Content { text: text.into(), replace: true }
    }

    /// Text carried by a `Content` event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamChunk::Content { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

// int64 fields arrive as JSON strings in proto3 JSON, but hand-written
// fixtures use numbers. Unparseable values become `None`.
fn lenient_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer).unwrap_or(None);
    Ok(match value {
        Some(NumberOrString::Number(n)) => usize::try_from(n).ok(),
        Some(NumberOrString::String(s)) => s.trim().parse().ok(),
        None => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer).unwrap_or(None);
    Ok(match value {
        Some(NumberOrString::Number(n)) => Some(n.to_string()),
        Some(NumberOrString::String(s)) => Some(s),
        None => None,
    })
}
