//! `Stream` adapter turning a response body into answer events.

use bytes::Bytes;
use futures::stream::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::DiscoveryEngineError;
use crate::types::{AnswerEvent, StreamChunk};

use super::delta::AnswerDeltaEngine;
use super::tokenizer::ObjectTokenizer;

/// Raw response body of a streaming call.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DiscoveryEngineError>> + Send>>;

/// Stream of answer events decoded from a `streamAnswer` response body.
///
/// Yields `Content` events as the answer grows, then an optional corrective
/// `Content` with citation markers, one `Metadata` and one `Done`. If the
/// body fails mid-way the error is yielded once and the stream ends without
/// metadata. Dropping the stream drops the body and closes the upstream
/// connection; wrap polling in `tokio::time::timeout` to bound its lifetime.
pub struct AnswerStream {
    inner: ByteStream,
    tokenizer: ObjectTokenizer,
    engine: Option<AnswerDeltaEngine>,
    pending: VecDeque<StreamChunk>,
    finished: bool,
}

impl AnswerStream {
    /// Creates an answer stream over a response body.
    pub fn new(inner: ByteStream) -> Self {
        Self {
            inner,
            tokenizer: ObjectTokenizer::new(),
            engine: Some(AnswerDeltaEngine::new()),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn ingest(&mut self, bytes: &[u8]) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        for object in self.tokenizer.push(bytes) {
            match serde_json::from_str::<AnswerEvent>(&object) {
                Ok(event) => {
                    if let Some(chunk) = engine.apply(event) {
                        self.pending.push_back(chunk);
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping object that is not an answer event");
                }
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;

        if self.tokenizer.has_partial_object() {
            tracing::debug!(
                buffered_bytes = self.tokenizer.buffered_len(),
                "Discarding unterminated object at end of stream"
            );
        }

        if let Some(engine) = self.engine.take() {
            tracing::debug!(answer_len = engine.text().len(), "Answer stream completed");
            self.pending.extend(engine.finish());
        }
    }
}

impl Stream for AnswerStream {
    type Item = Result<StreamChunk, DiscoveryEngineError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(chunk) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(chunk)));
            }

            if this.finished {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => this.ingest(&bytes),
                Poll::Ready(Some(Err(e))) => {
                    tracing::warn!(error = %e, "Answer stream interrupted");
                    this.finished = true;
                    this.engine = None;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => this.finish(),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn body(chunks: &[&'static str]) -> ByteStream {
        let items: Vec<Result<Bytes, DiscoveryEngineError>> =
            chunks.iter().map(|c| Ok(Bytes::from(*c))).collect();
        Box::pin(futures::stream::iter(items))
    }

    #[tokio::test]
    async fn test_three_chunk_scenario() {
        let stream = AnswerStream::new(body(&[
            r#"{"answer":{"state":"STREAMING","answerText":"Hel"#,
            r#"lo"}}{"answer":{"state":"SUCCEE"#,
            r#"DED","answerText":"Hello world","references":[]}}"#,
        ]));

        let chunks: Vec<StreamChunk> = stream.map(|r| r.unwrap()).collect().await;

        assert_eq!(
            chunks,
            vec![
                StreamChunk::delta("Hello"),
                StreamChunk::delta(" world"),
                StreamChunk::Metadata {
                    session_id: None,
                    related_questions: vec![],
                    references: vec![],
                },
                StreamChunk::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_body_still_terminates() {
        let chunks: Vec<_> = AnswerStream::new(body(&[])).collect().await;
        assert_eq!(chunks.len(), 2);
        assert!(matches!(chunks[1], Ok(StreamChunk::Done)));
    }
}
