pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    llm_client::{ChatClient, OpenAiChatClient},
    quality_service::QualityService,
    screening_service::{ScreeningService, ScreeningSettings},
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn ChatClient>,
    pub screening_service: ScreeningService,
    pub quality_service: QualityService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.llm_timeout_secs);
        let http_client = Client::builder().timeout(timeout).build()?;

        let llm: Arc<dyn ChatClient> = Arc::new(OpenAiChatClient::new(
            http_client,
            config.llm_base_url.clone(),
            config.llm_api_key.clone(),
            config.llm_model.clone(),
            timeout,
        ));

        let settings = ScreeningSettings {
            default_num_questions: config.default_num_questions,
            passing_score: config.passing_score,
        };

        Ok(Self::with_client(llm, settings))
    }

    pub fn with_client(llm: Arc<dyn ChatClient>, settings: ScreeningSettings) -> Self {
        let screening_service = ScreeningService::new(llm.clone(), settings);
        let quality_service = QualityService::new(llm.clone());

        Self {
            llm,
            screening_service,
            quality_service,
        }
    }
}
