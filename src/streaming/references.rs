//! Normalization of the reference records attached to answers.
//!
//! The service describes sources in one of two shapes:
//! - `unstructuredDocumentInfo` with a title, a uri and a list of chunk contents
//! - `chunkInfo` with nested `documentMetadata` and a direct content string
//!
//! Both collapse into a single `Reference`. Records of any other shape are
//! skipped.

use serde::Deserialize;
use serde_json::Value;

use crate::types::Reference;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReference {
    #[serde(default)]
    unstructured_document_info: Option<DocumentInfo>,
    #[serde(default)]
    chunk_info: Option<ChunkInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    chunk_contents: Option<Vec<ChunkContent>>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChunkInfo {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    document_metadata: Option<DocumentMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

/// Normalizes a list of raw reference records, skipping unknown shapes.
pub fn extract_references(records: &[Value]) -> Vec<Reference> {
    records.iter().filter_map(extract_reference).collect()
}

/// Normalizes one raw reference record.
pub fn extract_reference(record: &Value) -> Option<Reference> {
    let raw = match RawReference::deserialize(record) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping reference record with unexpected layout");
            return None;
        }
    };

    let (title, uri, content) = if let Some(info) = raw.unstructured_document_info {
        let content = info
            .chunk_contents
            .and_then(|chunks| chunks.into_iter().next())
            .and_then(|chunk| chunk.content);
        (info.title, info.uri, content)
    } else if let Some(info) = raw.chunk_info {
        let metadata = info.document_metadata.unwrap_or_default();
        (metadata.title, metadata.uri, info.content)
    } else {
        tracing::debug!("Skipping reference record of unknown shape");
        return None;
    };

    let page_number = content.as_deref().and_then(page_number);

    Some(Reference {
        title,
        uri,
        content,
        page_number,
    })
}

/// Reads a page number embedded as the leading token of extracted content.
///
/// After leading whitespace the content must start with ASCII digits
/// followed by whitespace, e.g. `"12 Results were..."`.
pub fn page_number(content: &str) -> Option<u32> {
    let trimmed = content.trim_start();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let rest = &trimmed[digits..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    trimmed[..digits].parse().ok()
}
