use crate::models::screening_result::QuestionResult;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuestionsRequest {
    #[validate(length(min = 1, message = "Instruction must not be empty"))]
    pub instruction: String,
    #[validate(range(min = 1, max = 20, message = "num_questions must be between 1 and 20"))]
    pub num_questions: Option<usize>,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub status: String,
    pub questions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScreeningRequest {
    #[validate(length(min = 1, message = "Instruction must not be empty"))]
    pub instruction: String,
    #[validate(length(min = 1, message = "At least one question is required"))]
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResponse {
    pub status: String,
    pub assessment: String,
    pub score: i64,
    pub passed: bool,
    pub detailed_results: Vec<QuestionResult>,
}
