//! Request bodies and caller-facing query/response types.

use serde::Serialize;

use super::stream::Reference;

/// A question to relay to the answer service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerQuery {
    /// The user's question.
    pub text: String,
    /// Session id from a previous answer, for follow-up questions.
    pub session_id: Option<String>,
    /// Extra context (e.g. looked up from a database) appended to the query.
    pub context: Option<String>,
}

impl AnswerQuery {
    /// Creates a query with no session and no context.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: None,
            context: None,
        }
    }

    /// Continues the given session.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Attaches context text.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Session id, treating an empty string as absent.
    pub fn session(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|s| !s.is_empty())
    }

    /// Query text as sent upstream, with the context appended when present.
    pub fn final_text(&self) -> String {
        match self.context.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(context) => format!("{}\n\nContext: {}", self.text, context),
            None => self.text.clone(),
        }
    }
}

/// Result of a non-streaming answer call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    /// Final answer text.
    pub answer: String,
    /// Session id to continue the conversation with.
    pub session_id: Option<String>,
    /// Query id assigned by the search step.
    pub query_id: Option<String>,
    /// Follow-up questions.
    pub related_questions: Vec<String>,
    /// References cited by the answer.
    pub references: Vec<Reference>,
}

/// Body of `streamAnswer` and `answer` requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// Query.
    pub query: QueryText,
    /// Session resource path (`.../sessions/-` starts a new session).
    pub session: String,
    /// Related questions settings.
    pub related_questions_spec: RelatedQuestionsSpec,
    /// Generation settings.
    pub answer_generation_spec: AnswerGenerationSpec,
}

impl AnswerRequest {
    /// Creates a request with the default generation settings.
    pub fn new(text: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            query: QueryText {
                text: text.into(),
                query_id: None,
            },
            session: session.into(),
            related_questions_spec: RelatedQuestionsSpec { enable: true },
            answer_generation_spec: AnswerGenerationSpec::default(),
        }
    }

    /// Ties the request to the query id of a previous search.
    pub fn with_query_id(mut self, query_id: Option<String>) -> Self {
        self.query.query_id = query_id;
        self
    }
}

/// Query text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryText {
    /// Question text.
    pub text: String,
    /// Query id from a previous search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
}

/// Related questions settings.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedQuestionsSpec {
    /// Whether to generate related questions.
    pub enable: bool,
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerGenerationSpec {
    /// Skip adversarial queries.
    pub ignore_adversarial_query: bool,
    /// Skip queries that do not seek an answer.
    pub ignore_non_answer_seeking_query: bool,
    /// Skip answering when retrieved content has low relevance.
    pub ignore_low_relevant_content: bool,
    /// Ask for index-based citations.
    pub include_citations: bool,
}

impl Default for AnswerGenerationSpec {
    fn default() -> Self {
        Self {
            ignore_adversarial_query: true,
            ignore_non_answer_seeking_query: false,
            ignore_low_relevant_content: true,
            include_citations: true,
        }
    }
}

/// Body of `search` requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Number of results.
    pub page_size: u32,
    /// Query expansion.
    pub query_expansion_spec: QueryExpansionSpec,
    /// Spell correction.
    pub spell_correction_spec: SpellCorrectionSpec,
    /// Language code.
    pub language_code: String,
    /// Content settings.
    pub content_search_spec: ContentSearchSpec,
    /// Session resource path.
    pub session: String,
}

impl SearchRequest {
    /// Creates a search request with automatic expansion and spell correction.
    pub fn new(
        query: impl Into<String>,
        session: impl Into<String>,
        page_size: u32,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            page_size,
            query_expansion_spec: QueryExpansionSpec { condition: "AUTO".to_string() },
            spell_correction_spec: SpellCorrectionSpec { mode: "AUTO".to_string() },
            language_code: language_code.into(),
            content_search_spec: ContentSearchSpec {
                snippet_spec: SnippetSpec { return_snippet: true },
            },
            session: session.into(),
        }
    }
}

/// Query expansion settings.
#[derive(Debug, Clone, Serialize)]
pub struct QueryExpansionSpec {
    /// Expansion condition.
    pub condition: String,
}

/// Spell correction settings.
#[derive(Debug, Clone, Serialize)]
pub struct SpellCorrectionSpec {
    /// Correction mode.
    pub mode: String,
}

/// Content settings for search results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSearchSpec {
    /// Snippet settings.
    pub snippet_spec: SnippetSpec,
}

/// Snippet settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetSpec {
    /// Whether to return snippets.
    pub return_snippet: bool,
}
