use crate::error::{Error, Result};
use crate::models::screening_result::QuestionResult;
use crate::models::shape::ShapeDescriptor;
use crate::services::llm_client::{ChatClient, ChatRequest};
use crate::services::reply_decoder::decode;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct ScreeningSettings {
    pub default_num_questions: usize,
    pub passing_score: i64,
}

impl Default for ScreeningSettings {
    fn default() -> Self {
        Self {
            default_num_questions: 5,
            passing_score: 70,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningScore {
    pub assessment: String,
    pub score: i64,
    pub passed: bool,
    pub detailed_results: Vec<QuestionResult>,
}

#[derive(Deserialize)]
struct ScoreReply {
    assessment: String,
    score: i64,
    #[serde(rename = "detailedResults")]
    detailed_results: Vec<QuestionResult>,
}

fn questions_shape() -> ShapeDescriptor {
    ShapeDescriptor::new().string_list("questions")
}

fn scoring_shape() -> ShapeDescriptor {
    let per_question = ShapeDescriptor::new()
        .integer("questionId")
        .integer("score")
        .string("feedback");
    ShapeDescriptor::new()
        .string("assessment")
        .integer("score")
        .object_list("detailedResults", Some(per_question))
}

#[derive(Clone)]
pub struct ScreeningService {
    llm: Arc<dyn ChatClient>,
    settings: ScreeningSettings,
}

impl ScreeningService {
    pub fn new(llm: Arc<dyn ChatClient>, settings: ScreeningSettings) -> Self {
        Self { llm, settings }
    }

    pub fn settings(&self) -> ScreeningSettings {
        self.settings
    }

    pub async fn generate_questions(
        &self,
        instruction: &str,
        num_questions: Option<usize>,
    ) -> Result<Vec<String>> {
        let count = num_questions.unwrap_or(self.settings.default_num_questions);

        let system_prompt = format!(
            r#"You are an expert curriculum designer tasked with screening a user's expertise on a topic.
The user will provide an instruction or topic. Generate {count} screening questions
that test the user's deep knowledge of the subject matter behind the instruction.
Keep the questions appropriate for a 7th grader.
Output only a JSON object with a single key "questions" containing a list of strings."#
        );

        let request = ChatRequest::new(system_prompt, instruction).max_tokens(2048);
        let raw = self.llm.complete(&request).await?;
        tracing::debug!(reply = %raw, "Raw LLM reply for questions");

        let decoded = decode(&raw, &questions_shape()).map_err(|failure| {
            tracing::error!(kind = %failure.kind(), "Question list could not be decoded");
            Error::from(failure)
        })?;

        let questions = decoded.string_list("questions").unwrap_or_default();
        if questions.is_empty() {
            tracing::error!("LLM returned an empty question list");
            return Err(Error::Upstream(
                "LLM returned an empty question list".to_string(),
            ));
        }
        tracing::info!("Generated {} screening questions", questions.len());
        Ok(questions)
    }

    pub async fn score_screening(
        &self,
        instruction: &str,
        questions: &[String],
        answers: &[String],
    ) -> Result<ScreeningScore> {
        if questions.len() != answers.len() {
            return Err(Error::BadRequest(format!(
                "Mismatch: Received {} questions but {} answers.",
                questions.len(),
                answers.len()
            )));
        }

        let qa_pairs: Vec<serde_json::Value> = questions
            .iter()
            .zip(answers)
            .enumerate()
            .map(|(idx, (question, answer))| {
                serde_json::json!({
                    "questionId": idx + 1,
                    "question": question,
                    "answer": answer,
                })
            })
            .collect();

        let user_prompt = format!(
            "**Screening Instruction:**\n{}\n\n**Questions and Answers:**\n{}\n\n\
             Grade each answer from 0-100 with brief feedback, then give a final assessment \
             and an overall score from 0-100.",
            instruction,
            serde_json::to_string_pretty(&qa_pairs)?,
        );

        let system_prompt = r#"You are an expert evaluator. Based on the provided data, grade every answer
and give a concise overall assessment.
Output only a JSON object with three keys:
"assessment" (string), "score" (integer, 0-100) and
"detailedResults" (a list with one object per question: "questionId" (integer),
"score" (integer, 0-100) and "feedback" (string))."#;

        let request = ChatRequest::new(system_prompt, user_prompt).max_tokens(2048);
        let raw = self.llm.complete(&request).await?;
        tracing::debug!(reply = %raw, "Raw LLM reply for scoring");

        let decoded = decode(&raw, &scoring_shape()).map_err(|failure| {
            tracing::error!(kind = %failure.kind(), "Screening score could not be decoded");
            Error::from(failure)
        })?;
        let reply: ScoreReply = decoded.into_typed()?;

        Ok(ScreeningScore {
            passed: reply.score >= self.settings.passing_score,
            assessment: reply.assessment,
            score: reply.score,
            detailed_results: reply.detailed_results,
        })
    }
}
