use crate::{
    dto::screening_dto::{
        GenerateQuestionsRequest, QuestionsResponse, ScreeningRequest, ScreeningResponse,
    },
    error::Result,
    AppState,
};
use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionsRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    tracing::info!(instruction = %payload.instruction, "Received request to generate questions");

    let questions = state
        .screening_service
        .generate_questions(&payload.instruction, payload.num_questions)
        .await?;

    Ok(Json(QuestionsResponse {
        status: "success".to_string(),
        questions,
        project_id: payload.project_id,
    }))
}

#[axum::debug_handler]
pub async fn submit_screening(
    State(state): State<AppState>,
    Json(payload): Json<ScreeningRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    tracing::info!(instruction = %payload.instruction, "Received request to score screening");

    let result = state
        .screening_service
        .score_screening(&payload.instruction, &payload.questions, &payload.answers)
        .await?;

    Ok(Json(ScreeningResponse {
        status: "success".to_string(),
        assessment: result.assessment,
        score: result.score,
        passed: result.passed,
        detailed_results: result.detailed_results,
    }))
}
