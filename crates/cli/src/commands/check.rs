//! Check command handler.
//!
//! Probes each generation tier in chain order, then issues one retrieval
//! call against the configured corpus.

use clap::Args;
use gems_core::{config::AppConfig, AppError, AppResult};
use gems_knowledge::QueryPipeline;
use gems_llm::GenerationRequest;
use serde::Serialize;

/// Probe every generation tier and the retrieval corpus
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Skip the retrieval check
    #[arg(long)]
    pub skip_retrieval: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of checking one backend.
#[derive(Debug, Serialize)]
struct CheckResult {
    component: String,
    available: bool,
    detail: Option<String>,
}

impl CheckCommand {
    /// Execute the check command.
    ///
    /// Fails when no generation tier is available.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing check command");

        let pipeline = QueryPipeline::from_config(config)?;
        let probe = GenerationRequest::new(
            GenerationRequest::PROBE_PROMPT,
            pipeline.settings().sampling,
        );

        let mut results = Vec::new();
        for tier in pipeline.selector().tiers() {
            let result = match tier.probe(&probe).await {
                Ok(kind) => CheckResult {
                    component: kind.to_string(),
                    available: true,
                    detail: None,
                },
                Err(e) => CheckResult {
                    component: tier.kind().to_string(),
                    available: false,
                    detail: Some(e.to_string()),
                },
            };
            results.push(result);
        }
        let tiers_available = results.iter().filter(|r| r.available).count();

        if !self.skip_retrieval {
            let retriever = pipeline.retriever();
            let component = format!("corpus:{}", retriever.corpus());
            results.push(match retriever.try_retrieve("test").await {
                Ok(snippets) => CheckResult {
                    component,
                    available: true,
                    detail: Some(format!("{} snippets", snippets.len())),
                },
                Err(e) => CheckResult {
                    component,
                    available: false,
                    detail: Some(e.to_string()),
                },
            });
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            for result in &results {
                let status = if result.available { "available" } else { "unavailable" };
                match result.detail {
                    Some(ref detail) => println!("{:<60} {} ({})", result.component, status, detail),
                    None => println!("{:<60} {}", result.component, status),
                }
            }
        }

        if tiers_available == 0 {
            return Err(AppError::Other(
                "No generation tier is available".to_string(),
            ));
        }

        Ok(())
    }
}
