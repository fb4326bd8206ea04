//! Command-line interface definition for Warda
//!
//! This module defines the CLI structure using clap's derive API. The CLI is
//! a thin caller of the data layer: it reads the user id from a flag or the
//! environment and never persists it.

use clap::{Parser, Subcommand};

/// Warda - client for the Warda mental-health assistant
///
/// Talk to the assistant, browse past conversations grouped into sessions,
/// and review your emotional state over time.
#[derive(Parser, Debug, Clone)]
#[command(name = "warda")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// User id returned by `warda login`
    #[arg(short, long, env = "WARDA_USER_ID", global = true)]
    pub user_id: Option<i64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Warda
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check whether the backend model and embeddings are loaded
    Health,

    /// Show backend name and version
    Info,

    /// Create a new account
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Account password
        #[arg(long, env = "WARDA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in and print the user id to export as WARDA_USER_ID
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "WARDA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Replace the password of an account
    ResetPassword {
        /// Account email
        #[arg(long)]
        email: String,

        /// New password
        #[arg(long, env = "WARDA_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },

    /// Send one message to the assistant
    Chat {
        /// Message text
        message: String,
    },

    /// List past conversations grouped into sessions
    History {
        /// Maximum number of messages to fetch
        #[arg(short, long)]
        limit: Option<u32>,

        /// Print every message instead of a one-line preview
        #[arg(short, long)]
        messages: bool,

        /// Fail instead of skipping messages with unparseable timestamps
        #[arg(long)]
        strict: bool,
    },

    /// Delete one chat message
    DeleteMessage {
        /// Message id
        id: i64,
    },

    /// Show the current emotional state
    State,

    /// Show the emotional timeline
    Timeline {
        /// Days of history (defaults to timeline.default_days)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Show recommendations for the current emotional state
    Recommendations,

    /// Show insights about emotional patterns
    Insights {
        /// Days of history (defaults to timeline.default_days)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Show the account profile, or update it when any field is given
    Profile {
        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New email
        #[arg(long)]
        email: Option<String>,

        /// New phone number
        #[arg(long)]
        phone: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            base_url: None,
            user_id: None,
            verbose: false,
            command: Commands::Health,
        }
    }
}
