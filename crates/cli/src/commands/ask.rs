//! Ask command handler.
//!
//! Answers a single question, or reads questions from stdin until the
//! user quits.

use clap::Args;
use gems_core::{config::AppConfig, AppResult};
use gems_knowledge::{Answer, QueryPipeline};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Words that end an interactive session
const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// Ask a question, or start an interactive session
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask (omit for an interactive session)
    pub question: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let pipeline = QueryPipeline::from_config(config)?;

        match self.question {
            Some(ref question) => {
                let answer = pipeline.answer(question).await?;
                self.print_answer(&answer)
            }
            None => self.interactive(&pipeline).await,
        }
    }

    async fn interactive(&self, pipeline: &QueryPipeline) -> AppResult<()> {
        println!("GEMS Agent - type 'quit' to exit");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("\n> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let question = line.trim();

            if question.is_empty() {
                continue;
            }
            if is_quit(question) {
                break;
            }

            match pipeline.answer(question).await {
                Ok(answer) => self.print_answer(&answer)?,
                Err(e) => {
                    tracing::error!("Failed to answer: {}", e);
                    eprintln!("Error: {}", e);
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_answer(&self, answer: &Answer) -> AppResult<()> {
        if self.json {
            let output = serde_json::json!({
                "answer": answer.text,
                "language": answer.language,
                "source": answer.source,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", answer.text);
            tracing::debug!("Answer source: {}", answer.source);
        }
        Ok(())
    }
}

fn is_quit(input: &str) -> bool {
    QUIT_WORDS.contains(&input.to_lowercase().as_str())
}
