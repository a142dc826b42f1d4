use crate::error::{Error, Result};
use crate::models::shape::ShapeDescriptor;
use crate::services::llm_client::{ChatClient, ChatRequest};
use crate::services::reply_decoder::decode;
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_RUBRIC: &str = "N/A. Please use general best practices for quality.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QualityAssessment {
    pub quality_feedback: String,
    pub quality_score: i64,
}

fn quality_shape() -> ShapeDescriptor {
    ShapeDescriptor::new()
        .string("quality_feedback")
        .integer("quality_score")
}

#[derive(Clone)]
pub struct QualityService {
    llm: Arc<dyn ChatClient>,
}

impl QualityService {
    pub fn new(llm: Arc<dyn ChatClient>) -> Self {
        Self { llm }
    }

    pub async fn assess_task_quality(
        &self,
        task_instructions: &str,
        completed_output: &str,
        rubric: Option<&str>,
    ) -> Result<QualityAssessment> {
        let rubric = rubric
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_RUBRIC);

        let user_prompt = format!(
            "**Task Instructions:**\n{}\n\n**Evaluation Rubric:**\n{}\n\n\
             **Completed Task Output to Evaluate:**\n{}\n\n\
             Please evaluate the \"Completed Task Output\" based on the \"Task Instructions\" and \"Evaluation Rubric\".",
            task_instructions, rubric, completed_output
        );

        let system_prompt = r#"You are an expert Quality Assurance (QA) specialist. Your job is to evaluate a completed task.
Provide concise, constructive feedback and a numerical score from 0 to 100
(0 = completely wrong, 100 = perfect).
Output only a JSON object with two keys: "quality_feedback" (string) and "quality_score" (integer)."#;

        let request = ChatRequest::new(system_prompt, user_prompt).max_tokens(1024);
        let raw = self.llm.complete(&request).await?;
        tracing::debug!(reply = %raw, "Raw LLM reply for quality assessment");

        let decoded = decode(&raw, &quality_shape()).map_err(|failure| {
            tracing::error!(kind = %failure.kind(), "Quality assessment could not be decoded");
            Error::from(failure)
        })?;

        Ok(decoded.into_typed()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm_client::MockChatClient;
    use crate::services::reply_decoder::DecodeFailureKind;

    #[tokio::test]
    async fn assesses_with_default_rubric() {
        let mut mock = MockChatClient::new();
        mock.expect_complete()
            .withf(|req| req.user.contains(DEFAULT_RUBRIC) && req.user.contains("labelled 40 images"))
            .times(1)
            .returning(|_| {
                Ok(r#"{"quality_feedback": "Labels are consistent.", "quality_score": 92}"#.to_string())
            });
        let svc = QualityService::new(Arc::new(mock));

        let result = svc
            .assess_task_quality("Label every cat", "labelled 40 images", Some("   "))
            .await
            .unwrap();
        assert_eq!(
            result,
            QualityAssessment {
                quality_feedback: "Labels are consistent.".to_string(),
                quality_score: 92,
            }
        );
    }

    #[tokio::test]
    async fn custom_rubric_is_sent() {
        let mut mock = MockChatClient::new();
        mock.expect_complete()
            .withf(|req| req.user.contains("Penalize missing boxes") && !req.user.contains(DEFAULT_RUBRIC))
            .times(1)
            .returning(|_| Ok(r#"{"quality_feedback": "ok", "quality_score": 50}"#.to_string()));
        let svc = QualityService::new(Arc::new(mock));

        let result = svc
            .assess_task_quality("Draw boxes", "3 boxes", Some("Penalize missing boxes"))
            .await
            .unwrap();
        assert_eq!(result.quality_score, 50);
    }

    #[tokio::test]
    async fn missing_score_is_shape_mismatch() {
        let mut mock = MockChatClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Ok(r#"{"quality_feedback": "no score given"}"#.to_string()));
        let svc = QualityService::new(Arc::new(mock));

        match svc.assess_task_quality("t", "o", None).await.unwrap_err() {
            Error::Decode(failure) => {
                assert_eq!(failure.kind(), DecodeFailureKind::ShapeMismatch);
                assert!(failure.to_string().contains("quality_score"));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }
}
