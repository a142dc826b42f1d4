mod common;

use axum::http::StatusCode;
use common::{post_json, setup_app, CannedClient};
use serde_json::json;

#[tokio::test]
async fn assess_task_quality_returns_feedback_and_score() {
    let client = CannedClient::replying(
        "Here is the review.\n{\"quality_feedback\": \"Bounding boxes are tight.\", \"quality_score\": 95, \"notes\": []}",
    );
    let app = setup_app(client.clone());

    let (status, body) = post_json(
        &app,
        "/assess-task-quality",
        json!({
            "task_instructions": "Draw a box around every car.",
            "completed_output": "12 boxes drawn",
            "evaluation_rubric": "Boxes must not clip the car.",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "quality_feedback": "Bounding boxes are tight.",
            "quality_score": 95,
        })
    );

    let requests = client.requests.lock().unwrap();
    assert!(requests[0].user.contains("Boxes must not clip the car."));
    assert!(requests[0].json_mode);
}

#[tokio::test]
async fn assess_task_quality_requires_output() {
    let client = CannedClient::replying(r#"{"quality_feedback": "x", "quality_score": 1}"#);
    let app = setup_app(client.clone());

    let (status, body) = post_json(
        &app,
        "/assess-task-quality",
        json!({ "task_instructions": "Label cats", "completed_output": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn missing_quality_key_is_shape_mismatch() {
    let client = CannedClient::replying(r#"{"feedback": "looks fine", "score": 80}"#);
    let app = setup_app(client);

    let (status, body) = post_json(
        &app,
        "/assess-task-quality",
        json!({ "task_instructions": "Label cats", "completed_output": "3 cats" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error_message"].as_str().unwrap();
    assert!(message.contains("shape_mismatch"));
    assert!(message.contains("quality_feedback"));
}
