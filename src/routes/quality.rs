use crate::{
    dto::quality_dto::{TaskAssessmentRequest, TaskAssessmentResponse},
    error::Result,
    AppState,
};
use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

#[axum::debug_handler]
pub async fn assess_task_quality(
    State(state): State<AppState>,
    Json(payload): Json<TaskAssessmentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    tracing::info!("Received request to assess task quality");

    let assessment = state
        .quality_service
        .assess_task_quality(
            &payload.task_instructions,
            &payload.completed_output,
            payload.evaluation_rubric.as_deref(),
        )
        .await?;

    Ok(Json(TaskAssessmentResponse {
        status: "success".to_string(),
        quality_feedback: assessment.quality_feedback,
        quality_score: assessment.quality_score,
    }))
}
