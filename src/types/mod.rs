//! Core types for the Discovery Engine answer API.
//!
//! - `answer` - wire model of the objects streamed by `streamAnswer`
//! - `stream` - normalized references, citations and the emitted `StreamChunk`
//! - `request` - request bodies and the caller-facing query/response types

mod answer;
mod request;
mod stream;

pub use answer::{AnswerEvent, AnswerPayload, AnswerState, SessionInfo, SearchResponse, SearchSummary};
pub use request::{
    AnswerGenerationSpec, AnswerQuery, AnswerRequest, AnswerResponse, ContentSearchSpec,
    QueryExpansionSpec, QueryText, RelatedQuestionsSpec, SearchRequest, SnippetSpec,
    SpellCorrectionSpec,
};
pub use stream::{Citation, CitationSource, Reference, StreamChunk};
