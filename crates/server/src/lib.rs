//! GEMS Agent server - HTTP API for the query answering pipeline.
//!
//! # API Endpoints
//!
//! - `GET /` - Service status and configuration summary
//! - `GET /health` - Liveness probe
//! - `POST /chat` - Answer a message: `{"message": "..."}` -> `{"reply": "..."}`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gems_core::AppConfig;
//! use gems_knowledge::QueryPipeline;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let pipeline = Arc::new(QueryPipeline::from_config(&config)?);
//!     gems_server::start_server(config, pipeline).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
