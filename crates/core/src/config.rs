//! Configuration management for the GEMS Agent.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - A YAML config file (`GEMS_CONFIG`, or `./gems.yaml` when present)
//! - Environment variables
//! - Command-line flags
//!
//! Configuration is read once at startup and stays read-only afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default system description given to foundation models.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an AI Agent built for a consulting company to support resource management, sales enablement, market analysis, and operational automation.

Your primary purpose is to transform siloed company data (Recman, Flowcase/CVpartner, Gmail, internal docs) into actionable insights and assist users in making better decisions faster.";

/// Foundation models tried after the fine-tuned endpoint, in order.
pub const DEFAULT_FALLBACK_MODELS: &[&str] = &[
    "gemini-2.5-pro",
    "gemini-2.0-pro",
    "gemini-1.5-pro",
    "gemini-pro",
];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Google Cloud project hosting the corpus and models
    pub project_id: String,

    /// Vertex AI region; retrieval and generation must share it
    pub location: String,

    /// RAG corpus identifier (last segment of the corpus resource name)
    pub rag_corpus_id: String,

    /// System description used for self-reference answers and as model instruction
    pub system_instruction: String,

    /// Pre-issued OAuth access token forwarded to Vertex AI
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    /// Override for the Vertex AI REST base URL
    pub api_base: Option<String>,

    /// Generation chain settings
    pub generation: GenerationSettings,

    /// Retrieval settings
    pub retrieval: RetrievalSettings,

    /// HTTP server settings
    pub server: ServerSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit JSON logs
    pub json_logs: bool,
}

/// Settings for the generation fallback chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Preferred foundation model, tried first among the models
    #[serde(rename = "primaryModel")]
    pub primary_model: String,

    /// Remaining foundation models in priority order
    #[serde(rename = "fallbackModels")]
    pub fallback_models: Vec<String>,

    /// Fine-tuned endpoint id, if one is deployed
    #[serde(rename = "fineTunedEndpointId")]
    pub fine_tuned_endpoint_id: Option<String>,

    /// Whether the fine-tuned endpoint tier is used at all
    #[serde(rename = "fineTunedEnabled")]
    pub fine_tuned_enabled: bool,

    /// Upper bound for each probe, generation or predict call
    #[serde(rename = "attemptTimeoutSecs")]
    pub attempt_timeout_secs: u64,

    pub temperature: f32,

    #[serde(rename = "topP")]
    pub top_p: f32,

    #[serde(rename = "topK")]
    pub top_k: u32,

    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            primary_model: DEFAULT_FALLBACK_MODELS[0].to_string(),
            fallback_models: DEFAULT_FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
            fine_tuned_endpoint_id: None,
            fine_tuned_enabled: true,
            attempt_timeout_secs: 60,
            temperature: 0.2,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

impl GenerationSettings {
    /// Ordered model candidates with duplicates removed (first occurrence wins).
    pub fn model_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        for model in std::iter::once(&self.primary_model).chain(self.fallback_models.iter()) {
            let model = model.trim();
            if !model.is_empty() && !candidates.iter().any(|m| m == model) {
                candidates.push(model.to_string());
            }
        }
        candidates
    }

    /// The fine-tuned endpoint to use, if configured and enabled.
    pub fn active_endpoint(&self) -> Option<&str> {
        if !self.fine_tuned_enabled {
            return None;
        }
        self.fine_tuned_endpoint_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Settings for the retrieval step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Snippets requested from the corpus
    #[serde(rename = "topK")]
    pub top_k: u32,

    /// Snippets embedded in the grounded prompt
    #[serde(rename = "contextLimit")]
    pub context_limit: usize,

    /// Hybrid search weight between dense (1.0) and sparse (0.0) search
    #[serde(rename = "hybridAlpha")]
    pub hybrid_alpha: f32,

    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 10,
            context_limit: 5,
            hybrid_alpha: 0.5,
            timeout_secs: 30,
        }
    }
}

/// Settings for the HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,

    #[serde(rename = "enableCors")]
    pub enable_cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    vertex: Option<VertexFileConfig>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Option<String>,
    generation: Option<GenerationSettings>,
    retrieval: Option<RetrievalSettings>,
    server: Option<ServerSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VertexFileConfig {
    project: Option<String>,
    location: Option<String>,
    #[serde(rename = "ragCorpusId")]
    rag_corpus_id: Option<String>,
    #[serde(rename = "apiBase")]
    api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_id: "your-project-id".to_string(),
            location: "europe-west1".to_string(),
            rag_corpus_id: "your-rag-corpus-id".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            access_token: None,
            api_base: None,
            generation: GenerationSettings::default(),
            retrieval: RetrievalSettings::default(),
            server: ServerSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `GEMS_CONFIG`: Path to a YAML config file
    /// - `GOOGLE_CLOUD_PROJECT`, `VERTEX_AI_LOCATION`, `RAG_CORPUS_ID`
    /// - `SYSTEM_INSTRUCTION`: System description for the agent
    /// - `GEMINI_MODEL`: Preferred foundation model
    /// - `FINE_TUNED_ENDPOINT_ID`, `FINE_TUNED_ENDPOINT_ENABLED`
    /// - `GOOGLE_ACCESS_TOKEN`: Bearer token for Vertex AI
    /// - `VERTEX_API_BASE`: REST base URL override
    /// - `GEMS_ATTEMPT_TIMEOUT_SECS`, `GEMS_RETRIEVAL_TIMEOUT_SECS`
    /// - `PORT`: HTTP port
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use gems_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Corpus: {}", config.corpus_name());
    /// ```
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var("GEMS_CONFIG").ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref())
    }

    /// Load configuration using an explicit config file path.
    ///
    /// A missing explicit file is an error; a missing `./gems.yaml` is not.
    pub fn load_from(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(path)?;
            }
            None => {
                let default_path = PathBuf::from("gems.yaml");
                if default_path.exists() {
                    config = config.merge_yaml(&default_path)?;
                }
            }
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Environment variables override YAML config.
    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(project) = std::env::var("GOOGLE_CLOUD_PROJECT") {
            self.project_id = project;
        }

        if let Ok(location) = std::env::var("VERTEX_AI_LOCATION") {
            self.location = location;
        }

        if let Ok(corpus) = std::env::var("RAG_CORPUS_ID") {
            self.rag_corpus_id = corpus;
        }

        if let Ok(instruction) = std::env::var("SYSTEM_INSTRUCTION") {
            self.system_instruction = instruction;
        }

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.generation.primary_model = model;
        }

        if let Ok(endpoint) = std::env::var("FINE_TUNED_ENDPOINT_ID") {
            self.generation.fine_tuned_endpoint_id = Some(endpoint);
        }

        if let Ok(enabled) = std::env::var("FINE_TUNED_ENDPOINT_ENABLED") {
            self.generation.fine_tuned_enabled = parse_bool("FINE_TUNED_ENDPOINT_ENABLED", &enabled)?;
        }

        if let Ok(token) = std::env::var("GOOGLE_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }

        if let Ok(base) = std::env::var("VERTEX_API_BASE") {
            self.api_base = Some(base);
        }

        if let Ok(secs) = std::env::var("GEMS_ATTEMPT_TIMEOUT_SECS") {
            self.generation.attempt_timeout_secs = parse_number("GEMS_ATTEMPT_TIMEOUT_SECS", &secs)?;
        }

        if let Ok(secs) = std::env::var("GEMS_RETRIEVAL_TIMEOUT_SECS") {
            self.retrieval.timeout_secs = parse_number("GEMS_RETRIEVAL_TIMEOUT_SECS", &secs)?;
        }

        if let Ok(port) = std::env::var("PORT") {
            self.server.port = parse_number("PORT", &port)?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(vertex) = config_file.vertex {
            if let Some(project) = vertex.project {
                result.project_id = project;
            }
            if let Some(location) = vertex.location {
                result.location = location;
            }
            if let Some(corpus) = vertex.rag_corpus_id {
                result.rag_corpus_id = corpus;
            }
            if vertex.api_base.is_some() {
                result.api_base = vertex.api_base;
            }
        }

        if let Some(instruction) = config_file.system_instruction {
            result.system_instruction = instruction;
        }

        if let Some(generation) = config_file.generation {
            result.generation = generation;
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(server) = config_file.server {
            result.server = server;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.json_logs = json;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        json_logs: bool,
    ) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if json_logs {
            self.json_logs = true;
        }

        self
    }

    /// Full RAG corpus resource name.
    pub fn corpus_name(&self) -> String {
        format!(
            "projects/{}/locations/{}/ragCorpora/{}",
            self.project_id, self.location, self.rag_corpus_id
        )
    }

    /// Vertex AI REST base URL for the configured region.
    pub fn vertex_base_url(&self) -> String {
        match self.api_base {
            Some(ref base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com/v1", self.location),
        }
    }

    /// Whether a non-blank system description is configured.
    pub fn system_instruction_configured(&self) -> bool {
        !self.system_instruction.trim().is_empty()
    }

    /// Validate configuration before building the pipeline.
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("project_id", &self.project_id),
            ("location", &self.location),
            ("rag_corpus_id", &self.rag_corpus_id),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{} must not be empty", name)));
            }
        }

        if !(0.0..=1.0).contains(&self.retrieval.hybrid_alpha) {
            return Err(AppError::Config(format!(
                "hybridAlpha must be within [0, 1], got {}",
                self.retrieval.hybrid_alpha
            )));
        }

        if self.retrieval.context_limit == 0 {
            return Err(AppError::Config("contextLimit must be at least 1".to_string()));
        }

        if self.retrieval.timeout_secs == 0 || self.generation.attempt_timeout_secs == 0 {
            return Err(AppError::Config("Timeouts must be greater than zero".to_string()));
        }

        if self.generation.model_candidates().is_empty() {
            return Err(AppError::Config(
                "At least one foundation model must be configured".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.location, "europe-west1");
        assert_eq!(config.retrieval.top_k, 10);
        assert_eq!(config.retrieval.context_limit, 5);
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_output_tokens, 2048);
        assert!(config.system_instruction_configured());
    }

    #[test]
    fn test_model_candidates_deduplicated() {
        let settings = GenerationSettings::default();
        assert_eq!(
            settings.model_candidates(),
            vec!["gemini-2.5-pro", "gemini-2.0-pro", "gemini-1.5-pro", "gemini-pro"]
        );

        let settings = GenerationSettings {
            primary_model: "gemini-1.5-pro".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.model_candidates(),
            vec!["gemini-1.5-pro", "gemini-2.5-pro", "gemini-2.0-pro", "gemini-pro"]
        );
    }

    #[test]
    fn test_active_endpoint() {
        let mut settings = GenerationSettings::default();
        assert_eq!(settings.active_endpoint(), None);

        settings.fine_tuned_endpoint_id = Some("  ".to_string());
        assert_eq!(settings.active_endpoint(), None);

        settings.fine_tuned_endpoint_id = Some("1234".to_string());
        assert_eq!(settings.active_endpoint(), Some("1234"));

        settings.fine_tuned_enabled = false;
        assert_eq!(settings.active_endpoint(), None);
    }

    #[test]
    fn test_corpus_name_and_base_url() {
        let mut config = AppConfig::default();
        config.project_id = "acme".to_string();
        config.rag_corpus_id = "gems-corpus".to_string();
        assert_eq!(
            config.corpus_name(),
            "projects/acme/locations/europe-west1/ragCorpora/gems-corpus"
        );
        assert_eq!(
            config.vertex_base_url(),
            "https://europe-west1-aiplatform.googleapis.com/v1"
        );

        config.api_base = Some("http://localhost:9000/v1/".to_string());
        assert_eq!(config.vertex_base_url(), "http://localhost:9000/v1");
    }

    #[test]
    fn test_merge_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "vertex:\n  project: acme\n  ragCorpusId: docs\ngeneration:\n  primaryModel: gemini-2.0-pro\n  fineTunedEndpointId: \"987\"\nretrieval:\n  topK: 7\nlogging:\n  color: false"
        )
        .unwrap();

        let config = AppConfig::default().merge_yaml(file.path()).unwrap();
        assert_eq!(config.project_id, "acme");
        assert_eq!(config.rag_corpus_id, "docs");
        assert_eq!(config.location, "europe-west1");
        assert_eq!(config.generation.primary_model, "gemini-2.0-pro");
        assert_eq!(config.generation.active_endpoint(), Some("987"));
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.retrieval.top_k, 7);
        assert_eq!(config.retrieval.context_limit, 5);
        assert!(config.no_color);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = AppConfig::load_from(Some(Path::new("/nonexistent/gems.yaml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(None, true, true, false);
        assert!(config.verbose);
        assert!(config.no_color);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.retrieval.hybrid_alpha = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.rag_corpus_id = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.generation.attempt_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_helpers() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
        assert_eq!(parse_number::<u16>("PORT", " 8081 ").unwrap(), 8081);
        assert!(parse_number::<u16>("PORT", "eighty").is_err());
    }
}
