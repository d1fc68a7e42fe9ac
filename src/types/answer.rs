//! Wire model of the answer objects returned by the Discovery Engine.
//!
//! Every field is optional: the stream carries partial states and the
//! upstream schema grows over time, so unknown fields are ignored and
//! missing ones default. A field holding a value of an unexpected type
//! decodes as absent instead of failing the whole object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::stream::Citation;

/// Generation state of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerState {
    /// Partial answer; `answerText` is the text generated so far.
    Streaming,
    /// Final answer.
    Succeeded,
    /// Any other state (`FAILED`, `STATE_UNSPECIFIED`, ...).
    #[serde(other)]
    Other,
}

/// One decoded object of the answer stream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvent {
    /// The answer sub-record.
    #[serde(default, deserialize_with = "lenient")]
    pub answer: Option<AnswerPayload>,
    /// Session the answer belongs to.
    #[serde(default, deserialize_with = "lenient")]
    pub session: Option<SessionInfo>,
}

/// Answer sub-record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    /// Generation state.
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<AnswerState>,
    /// Cumulative answer text, not a delta.
    #[serde(default, deserialize_with = "lenient")]
    pub answer_text: Option<String>,
    /// Follow-up questions suggested by the service. Non-string entries
    /// are skipped.
    #[serde(default, deserialize_with = "lenient_list")]
    pub related_questions: Option<Vec<String>>,
    /// Raw reference records, kept untyped so one unknown shape cannot
    /// invalidate the whole object.
    #[serde(default, deserialize_with = "lenient_list")]
    pub references: Option<Vec<Value>>,
    /// Index-based citation records. Records that do not decode are skipped.
    #[serde(default, deserialize_with = "lenient_list")]
    pub citations: Option<Vec<Citation>>,
}

impl AnswerPayload {
    /// Answer text, or the empty string when absent.
    pub fn text(&self) -> &str {
        self.answer_text.as_deref().unwrap_or_default()
    }
}

/// Session record attached to an answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInfo {
    /// Full resource name, `.../sessions/{id}`.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// Response of the `search` method, reduced to what the answer flow needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Session created or continued by the search.
    #[serde(default)]
    pub session: Option<SessionInfo>,
    /// Query id to hand to the follow-up `answer` call.
    #[serde(default)]
    pub query_id: Option<String>,
    /// Search summary.
    #[serde(default)]
    pub summary: Option<SearchSummary>,
}

/// Search summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    /// Summary text.
    #[serde(default)]
    pub summary_text: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// `None` unless the value is an array; undecodable items are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_streaming_event() {
        let event: AnswerEvent = serde_json::from_str(
            r#"{"answer":{"state":"STREAMING","answerText":"Hel"},"session":{"name":"projects/p/sessions/123"}}"#,
        )
        .unwrap();

        let answer = event.answer.unwrap();
        assert_eq!(answer.state, Some(AnswerState::Streaming));
        assert_eq!(answer.text(), "Hel");
        assert!(answer.references.is_none());
        assert_eq!(event.session.unwrap().name.as_deref(), Some("projects/p/sessions/123"));
    }

    #[test]
    fn test_unknown_state_and_fields() {
        let event: AnswerEvent = serde_json::from_str(
            r#"{"answer":{"state":"FAILED","answerSkippedReasons":["NO_RELEVANT_CONTENT"]},"answerQueryToken":"x"}"#,
        )
        .unwrap();

        let answer = event.answer.unwrap();
        assert_eq!(answer.state, Some(AnswerState::Other));
        assert_eq!(answer.text(), "");
    }

    #[test]
    fn test_present_but_empty_lists() {
        let event: AnswerEvent =
            serde_json::from_str(r#"{"answer":{"references":[],"citations":[]}}"#).unwrap();
        let answer = event.answer.unwrap();
        assert_eq!(answer.references.map(|r| r.len()), Some(0));
        assert_eq!(answer.citations.map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_mistyped_fields_do_not_invalidate_answer() {
        let event: AnswerEvent = serde_json::from_str(
            r#"{"answer":{"state":"STREAMING","answerText":"Hi","relatedQuestions":[1,"Why?"],"citations":{"bad":true}},"session":"oops"}"#,
        )
        .unwrap();

        let answer = event.answer.unwrap();
        assert_eq!(answer.text(), "Hi");
        assert_eq!(answer.related_questions, Some(vec!["Why?".to_string()]));
        assert!(answer.citations.is_none());
        assert!(event.session.is_none());
    }

    #[test]
    fn test_mistyped_state_and_text_decode_as_absent() {
        let event: AnswerEvent =
            serde_json::from_str(r#"{"answer":{"state":7,"answerText":null,"references":"none"}}"#).unwrap();

        let answer = event.answer.unwrap();
        assert_eq!(answer.state, None);
        assert_eq!(answer.text(), "");
        assert!(answer.references.is_none());
    }
}
