//! Warda - client data layer for the Warda mental-health assistant
//!
//! This library turns user intents into HTTP exchanges with the Warda
//! backend and turns the JSON replies into typed domain values.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: request dispatch, response decoding and domain types
//! - `sessions`: grouping of chat history into conversation sessions
//! - `timeline`: aggregation of the emotional timeline payload
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//! - `commands`: terminal handlers for each CLI command
//!
//! # Example
//!
//! ```no_run
//! use warda::{Config, WardaClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let client = WardaClient::new(&config.api)?;
//!     let sessions = client
//!         .session_history(42, None, &warda::Segmenter::default())
//!         .await?;
//!     println!("{} sessions", sessions.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod sessions;
pub mod timeline;

// Re-export commonly used types
pub use api::{ChatMessage, UserContext, WardaClient};
pub use config::Config;
pub use error::{ApiError, ApiResult, ParseError, Result, SegmentError, WardaError};
pub use sessions::{segment, Segmenter, Session, TimestampPolicy};
pub use timeline::{aggregate, EmotionalTimeline, TimelineSample, TimelineSummary};
