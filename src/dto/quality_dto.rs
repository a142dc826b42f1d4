use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskAssessmentRequest {
    #[validate(length(min = 1, message = "Task instructions must not be empty"))]
    pub task_instructions: String,
    #[validate(length(min = 1, message = "Completed output must not be empty"))]
    pub completed_output: String,
    pub evaluation_rubric: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAssessmentResponse {
    pub status: String,
    pub quality_feedback: String,
    pub quality_score: i64,
}
