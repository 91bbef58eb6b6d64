use gems_core::AppConfig;
use gems_knowledge::AnswerService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Answering pipeline (shared across requests)
    pub answers: Arc<dyn AnswerService>,
}

impl ServerState {
    pub fn new(config: AppConfig, answers: Arc<dyn AnswerService>) -> Self {
        Self {
            config: Arc::new(config),
            answers,
        }
    }
}
