//! Integration tests for answer stream decoding.

use bytes::Bytes;
use futures::stream;
use futures::StreamExt;
use integrations_discovery_engine::error::{DiscoveryEngineError, NetworkError};
use integrations_discovery_engine::streaming::{AnswerStream, ByteStream};
use integrations_discovery_engine::StreamChunk;
use pretty_assertions::assert_eq;
use std::time::Duration;

fn body(chunks: &[&str]) -> ByteStream {
    let items: Vec<Result<Bytes, DiscoveryEngineError>> = chunks
        .iter()
        .map(|c| Ok(Bytes::from(c.to_string())))
        .collect();
    Box::pin(stream::iter(items))
}

async fn collect(stream: AnswerStream) -> Vec<StreamChunk> {
    stream.map(|chunk| chunk.unwrap()).collect().await
}

fn concatenated_text(chunks: &[StreamChunk]) -> String {
    chunks.iter().fold(String::new(), |mut text, chunk| {
        if let StreamChunk::Content { text: part, replace } = chunk {
            if *replace {
                text.clear();
            }
            text.push_str(part);
        }
        text
    })
}

#[tokio::test]
async fn test_monotonic_states_become_deltas() {
    let chunks = collect(AnswerStream::new(body(&[
        r#"[{"answer":{"state":"STREAMING","answerText":"Caffeine"}},"#,
        r#"{"answer":{"state":"STREAMING","answerText":"Caffeine is"}},"#,
        r#"{"answer":{"state":"STREAMING","answerText":"Caffeine is bitter."}},"#,
        r#"{"answer":{"state":"SUCCEEDED","answerText":"Caffeine is bitter.","relatedQuestions":["Why?"]},"#,
        r#""session":{"name":"projects/p/locations/global/collections/c/engines/e/sessions/981"}}]"#,
    ])))
    .await;

    assert_eq!(
        chunks,
        vec![
            StreamChunk::delta("Caffeine"),
            StreamChunk::delta(" is"),
            StreamChunk::delta(" bitter."),
            StreamChunk::Metadata {
                session_id: Some("981".into()),
                related_questions: vec!["Why?".into()],
                references: vec![],
            },
            StreamChunk::Done,
        ]
    );
}

#[tokio::test]
async fn test_rewritten_final_answer_is_replacement() {
    let chunks = collect(AnswerStream::new(body(&[
        r#"{"answer":{"state":"STREAMING","answerText":"Aspirin is a"}}"#,
        r#"{"answer":{"state":"SUCCEEDED","answerText":"Acetylsalicylic acid is an NSAID."}}"#,
    ])))
    .await;

    assert_eq!(chunks[0], StreamChunk::delta("Aspirin is a"));
    assert_eq!(chunks[1], StreamChunk::replace("Acetylsalicylic acid is an NSAID."));
    assert_eq!(concatenated_text(&chunks), "Acetylsalicylic acid is an NSAID.");
    assert!(matches!(chunks[2], StreamChunk::Metadata { .. }));
    assert_eq!(chunks[3], StreamChunk::Done);
}

#[tokio::test]
async fn test_index_citations_produce_final_correction() {
    let chunks = collect(AnswerStream::new(body(&[
        r#"{"answer":{"state":"STREAMING","answerText":"Water boils at 100C"}}"#,
        r#"{"answer":{"state":"SUCCEEDED","answerText":"Water boils at 100C and freezes at 0C.","#,
        r#""citations":[{"startIndex":"0","endIndex":"19","sources":[{"referenceId":"0"}]}],"#,
        r#""references":[{"unstructuredDocumentInfo":{"title":"Water","uri":"gs://b/water.pdf","#,
        r#""chunkContents":[{"content":"12 Phase changes"}]}}]}}"#,
    ])))
    .await;

    assert_eq!(
        chunks,
        vec![
            StreamChunk::delta("Water boils at 100C"),
            StreamChunk::delta(" and freezes at 0C."),
            StreamChunk::replace("Water boils at 100C[1] and freezes at 0C."),
            StreamChunk::Metadata {
                session_id: None,
                related_questions: vec![],
                references: vec![integrations_discovery_engine::Reference {
                    title: Some("Water".into()),
                    uri: Some("gs://b/water.pdf".into()),
                    content: Some("12 Phase changes".into()),
                    page_number: Some(12),
                }],
            },
            StreamChunk::Done,
        ]
    );
}

#[tokio::test]
async fn test_paragraph_fallback_without_citations() {
    let references: String = (0..4)
        .map(|i| format!(r#"{{"chunkInfo":{{"content":"doc {i}"}}}}"#))
        .collect::<Vec<_>>()
        .join(",");
    let final_object = format!(
        r#"{{"answer":{{"state":"SUCCEEDED","answerText":"First part.\n\nSecond part.","references":[{references}]}}}}"#
    );

    let chunks = collect(AnswerStream::new(body(&[final_object.as_str()]))).await;

    assert_eq!(chunks[0], StreamChunk::delta("First part.\n\nSecond part."));
    assert_eq!(chunks[1], StreamChunk::replace("First part.[1][2]\n\nSecond part.[3][4]"));
}

#[tokio::test]
async fn test_existing_markers_suppress_injection() {
    let chunks = collect(AnswerStream::new(body(&[
        r#"{"answer":{"state":"SUCCEEDED","answerText":"Already cited [1].","references":[{"chunkInfo":{"content":"x"}}]}}"#,
    ])))
    .await;

    assert_eq!(chunks.len(), 3);
    assert_eq!(concatenated_text(&chunks), "Already cited [1].");
}

#[tokio::test]
async fn test_malformed_object_is_dropped() {
    let chunks = collect(AnswerStream::new(body(&[
        r#"{"answer":{"state":"STREAMING","answerText":"One"}}"#,
        r#"{"answer":{"state":"STREAMING","answerText":"One two",}}"#,
        r#"{"answer":{"state":"STREAMING","answerText":"One two three"}}"#,
    ])))
    .await;

    assert_eq!(chunks[0], StreamChunk::delta("One"));
    assert_eq!(chunks[1], StreamChunk::delta(" two three"));
    assert!(matches!(chunks[2], StreamChunk::Metadata { .. }));
}

#[tokio::test]
async fn test_mistyped_metadata_keeps_answer_text() {
    let chunks = collect(AnswerStream::new(body(&[
        r#"{"answer":{"state":"STREAMING","answerText":"Hi","relatedQuestions":[1]}}"#,
        r#"{"answer":{"state":"SUCCEEDED","answerText":"Hi there","citations":"n/a","relatedQuestions":["Why?"]}}"#,
    ])))
    .await;

    assert_eq!(
        chunks,
        vec![
            StreamChunk::delta("Hi"),
            StreamChunk::delta(" there"),
            StreamChunk::Metadata {
                session_id: None,
                related_questions: vec!["Why?".to_string()],
                references: vec![],
            },
            StreamChunk::Done,
        ]
    );
}

#[tokio::test]
async fn test_mid_stream_error_ends_without_metadata() {
    let items: Vec<Result<Bytes, DiscoveryEngineError>> = vec![
        Ok(Bytes::from(r#"{"answer":{"state":"STREAMING","answerText":"Partial"}}"#)),
        Err(DiscoveryEngineError::Network(NetworkError::StreamInterrupted {
            message: "connection reset".into(),
        })),
        Ok(Bytes::from(r#"{"answer":{"state":"STREAMING","answerText":"Partial more"}}"#)),
    ];

    let results: Vec<_> = AnswerStream::new(Box::pin(stream::iter(items))).collect().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0], Ok(StreamChunk::delta("Partial")));
    assert!(matches!(
        results[1],
        Err(DiscoveryEngineError::Network(NetworkError::StreamInterrupted { .. }))
    ));
}

#[tokio::test]
async fn test_deadline_cancels_stalled_stream() {
    let head = stream::iter(vec![Ok::<_, DiscoveryEngineError>(Bytes::from(
        r#"{"answer":{"state":"STREAMING","answerText":"Slow"}}"#,
    ))]);
    let stalled: ByteStream = Box::pin(head.chain(stream::pending()));
    let mut answer = AnswerStream::new(stalled);

    assert_eq!(answer.next().await, Some(Ok(StreamChunk::delta("Slow"))));

    let waited = tokio::time::timeout(Duration::from_millis(50), answer.next()).await;
    assert!(waited.is_err(), "stalled stream should hit the deadline");
}

#[tokio::test]
async fn test_chunk_events_serialize_for_relay() {
    let json: Vec<String> = [
        StreamChunk::delta("Hi"),
        StreamChunk::Metadata {
            session_id: Some("1".into()),
            related_questions: vec![],
            references: vec![],
        },
        StreamChunk::Done,
    ]
    .iter()
    .map(|chunk| serde_json::to_string(chunk).unwrap())
    .collect();

    assert_eq!(json[0], r#"{"type":"content","text":"Hi","replace":false}"#);
    assert_eq!(
        json[1],
        r#"{"type":"metadata","sessionId":"1","relatedQuestions":[],"references":[]}"#
    );
    assert_eq!(json[2], r#"{"type":"done"}"#);
}
