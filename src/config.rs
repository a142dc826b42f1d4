use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub llm_rps: u32,
    pub allowed_origins: Vec<String>,
    pub default_num_questions: usize,
    pub passing_score: i64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let llm_api_key = get_env("LLM_API_KEY").or_else(|_| get_env("ASI_API_KEY"))?;

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "127.0.0.1:8000"),
            llm_api_key,
            llm_base_url: get_env_or("LLM_BASE_URL", "https://api.asi1.ai/v1"),
            llm_model: get_env_or("LLM_MODEL", "asi1-mini"),
            llm_timeout_secs: get_env_parse_or("LLM_TIMEOUT_SECS", 60)?,
            llm_rps: get_env_parse_or("LLM_RPS", 10)?,
            allowed_origins: parse_origins(&get_env_or(
                "ALLOWED_ORIGINS",
                "http://localhost:3000,http://127.0.0.1:3000",
            )),
            default_num_questions: get_env_parse_or("DEFAULT_NUM_QUESTIONS", 5)?,
            passing_score: get_env_parse_or("PASSING_SCORE", 70)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
