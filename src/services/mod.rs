pub mod llm_client;
pub mod quality_service;
pub mod reply_decoder;
pub mod screening_service;
