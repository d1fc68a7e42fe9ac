//! Conversion of cumulative answer states into incremental text events.
//!
//! Each streamed object carries the whole answer generated so far. The
//! engine remembers the last text it emitted and turns every new state into
//! the suffix the consumer has not seen yet, or into a replacement when the
//! service rewrites its answer.

use crate::types::{AnswerEvent, AnswerState, Citation, Reference, StreamChunk};

use super::citations::inject_citations;
use super::references::extract_references;

const SESSION_SEPARATOR: &str = "/sessions/";

/// Tracks answer text and metadata across the objects of one stream.
///
/// Events must be applied in arrival order: a delta is only meaningful
/// relative to the text stored by the preceding event.
#[derive(Debug, Default)]
pub struct AnswerDeltaEngine {
    /// Text emitted so far, as the consumer sees it.
    last_text: String,
    /// Text of the `SUCCEEDED` state, once seen.
    final_text: Option<String>,
    session_id: Option<String>,
    related_questions: Vec<String>,
    references: Vec<Reference>,
    /// `None` until a citation list has been received.
    citations: Option<Vec<Citation>>,
}

impl AnswerDeltaEngine {
    /// Creates an engine with no text and no metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one decoded object and returns the content event it produces.
    pub fn apply(&mut self, event: AnswerEvent) -> Option<StreamChunk> {
        if let Some(name) = event.session.as_ref().and_then(|s| s.name.as_deref()) {
            match extract_session_id(name) {
                Some(id) => self.session_id = Some(id),
                None => tracing::debug!(session = name, "Session name without a session id"),
            }
        }

        let answer = event.answer?;
        let text = answer.text();

        let chunk = match answer.state {
            Some(AnswerState::Succeeded) if !text.is_empty() => {
                let chunk = self.advance_final(text);
                self.final_text = Some(text.to_string());
                chunk
            }
            Some(AnswerState::Streaming) if !text.is_empty() => self.advance_streaming(text),
            _ => None,
        };

        // Later values overwrite earlier ones; lists are never merged.
        if let Some(questions) = answer.related_questions {
            self.related_questions = questions;
        }
        if let Some(records) = answer.references.as_deref() {
            self.references = extract_references(records);
        }
        if let Some(citations) = answer.citations {
            self.citations = Some(citations);
        }

        chunk
    }

    fn advance_final(&mut self, text: &str) -> Option<StreamChunk> {
        if text == self.last_text {
            return None;
        }

        let chunk = match self.suffix_of(text) {
            Some(delta) => StreamChunk::delta(delta),
            None => {
                tracing::debug!(
                    streamed_len = self.last_text.len(),
                    final_len = text.len(),
                    "Final answer diverges from streamed text, replacing"
                );
                StreamChunk::replace(text)
            }
        };
        self.last_text = text.to_string();
        Some(chunk)
    }

    fn advance_streaming(&mut self, text: &str) -> Option<StreamChunk> {
        if self.last_text.is_empty() {
            self.last_text = text.to_string();
            return Some(StreamChunk::delta(text));
        }

        match self.suffix_of(text) {
            Some(delta) => {
                let chunk = StreamChunk::delta(delta);
                self.last_text = text.to_string();
                Some(chunk)
            }
            None => {
                // Divergent or shorter partial text; the final state settles it.
                tracing::debug!(
                    streamed_len = self.last_text.len(),
                    partial_len = text.len(),
                    "Ignoring partial answer that does not extend streamed text"
                );
                None
            }
        }
    }

    /// Suffix of `text` beyond `last_text` if `text` strictly extends it.
    fn suffix_of<'a>(&self, text: &'a str) -> Option<&'a str> {
        if text.len() > self.last_text.len() && text.starts_with(&self.last_text) {
            Some(&text[self.last_text.len()..])
        } else {
            None
        }
    }

    /// Text emitted so far.
    pub fn text(&self) -> &str {
        &self.last_text
    }

    /// Session id seen on the stream, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Last related questions received.
    pub fn related_questions(&self) -> &[String] {
        &self.related_questions
    }

    /// Last references received.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Last citations received, `None` if the stream carried none.
    pub fn citations(&self) -> Option<&[Citation]> {
        self.citations.as_deref()
    }

    /// Text used for citation injection: the final state when one arrived,
    /// otherwise whatever was streamed.
    pub fn final_text(&self) -> &str {
        self.final_text.as_deref().unwrap_or(&self.last_text)
    }

    /// Closes the stream: an optional corrective event carrying the cited
    /// answer, then `Metadata`, then `Done`.
    pub fn finish(self) -> Vec<StreamChunk> {
        let mut chunks = Vec::with_capacity(3);

        let final_text = self.final_text();
        let annotated = inject_citations(final_text, self.citations(), &self.references);
        if annotated != final_text {
            chunks.push(StreamChunk::replace(annotated));
        }

        chunks.push(StreamChunk::Metadata {
            session_id: self.session_id,
            related_questions: self.related_questions,
            references: self.references,
        });
        chunks.push(StreamChunk::Done);
        chunks
    }
}

/// Returns the id following the last `/sessions/` of a session resource name.
pub fn extract_session_id(name: &str) -> Option<String> {
    name.rsplit_once(SESSION_SEPARATOR)
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
