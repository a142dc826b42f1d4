use crate::error::{Error, Result};
use crate::utils::text::{excerpt, EXCERPT_MAX_CHARS};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One chat-completion call: a system prompt followed by a user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    /// Ask the provider to constrain output to a JSON object.
    pub json_mode: bool,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: 1024,
            temperature: None,
            json_mode: true,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Sends prompts to an LLM provider and returns the reply text untouched.
///
/// Each call is attempted exactly once; callers decide what to do with
/// failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    async fn check_health(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiChatClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        }
    }

    fn build_body<'a>(&'a self, request: &'a ChatRequest) -> CompletionBody<'a> {
        CompletionBody {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &request.system,
                },
                Msg {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_mode.then_some(ResponseFormat {
                r#type: "json_object",
            }),
        }
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    r#type: &'a str,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Deserialize)]
struct RespChoiceMsg {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RespChoice {
    message: RespChoiceMsg,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<RespChoice>,
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.build_body(request))
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            tracing::warn!(%status, "LLM provider returned an error");
            return Err(Error::Upstream(format!(
                "{}: {}",
                status,
                excerpt(&text, EXCERPT_MAX_CHARS)
            )));
        }

        let body: Resp = res.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Upstream("reply contained no message content".to_string()))
    }

    async fn check_health(&self) -> Result<()> {
        let res = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        if res.status().is_success() {
            Ok(())
        } else {
            Err(Error::Upstream(format!("model listing returned {}", res.status())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiChatClient {
        OpenAiChatClient::new(
            Client::new(),
            "https://llm.example/v1/",
            "sk-test",
            "asi1-mini",
            Duration::from_secs(5),
        )
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        assert_eq!(client().base_url, "https://llm.example/v1");
    }

    #[test]
    fn json_mode_request_body() {
        let c = client();
        let req = ChatRequest::new("sys", "usr").max_tokens(2048);
        let body = serde_json::to_value(c.build_body(&req)).unwrap();

        assert_eq!(body["model"], "asi1-mini");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn plain_text_request_omits_response_format() {
        let c = client();
        let mut req = ChatRequest::new("sys", "usr").temperature(0.5);
        req.json_mode = false;
        let body = serde_json::to_value(c.build_body(&req)).unwrap();

        assert!(body.get("response_format").is_none());
        assert_eq!(body["temperature"], 0.5);
    }

    #[test]
    fn provider_reply_content_is_read() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{\"score\": 1}"}}]}"#;
        let resp: Resp = serde_json::from_str(raw).unwrap();
        assert_eq!(
            resp.choices[0].message.content.as_deref(),
            Some("{\"score\": 1}")
        );
    }
}
