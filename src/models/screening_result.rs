use serde::{Deserialize, Serialize};

/// Per-question grade as returned by the LLM.
///
/// The LLM is asked for `questionId`; the API answers with `question_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    #[serde(alias = "questionId")]
    pub question_id: i64,
    pub score: i64,
    pub feedback: String,
}
