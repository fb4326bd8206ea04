//! Command handlers for the Warda CLI
//!
//! Each handler calls into the data layer and renders the returned domain
//! values for the terminal. Handlers never touch the network directly.

pub mod account;
pub mod conversation;
pub mod service;
pub mod wellbeing;

use crate::api::WardaClient;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::{Result, WardaError};

/// Returns the user id supplied on the command line or in `WARDA_USER_ID`
///
/// # Errors
///
/// Returns `WardaError::MissingUserId` when none was supplied
pub fn require_user_id(user_id: Option<i64>) -> Result<i64> {
    user_id.ok_or_else(|| WardaError::MissingUserId.into())
}

/// Window for timeline and insights: `--days` when given, else `timeline.default_days`
pub fn window_days(days: Option<u32>, config: &Config) -> u32 {
    days.unwrap_or(config.timeline.default_days)
}

/// Executes the parsed command
///
/// # Arguments
///
/// * `cli` - Parsed command line
/// * `config` - Validated configuration
///
/// # Errors
///
/// Returns the first error raised by the data layer or the handler
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let client = WardaClient::new(&config.api)?;
    tracing::debug!(base_url = %client.base_url(), "Using backend");

    match cli.command {
        Commands::Health => service::health(&client).await,
        Commands::Info => service::info(&client).await,
        Commands::Register {
            name,
            email,
            phone,
            password,
        } => account::register(&client, name, email, phone, password).await,
        Commands::Login { email, password } => account::login(&client, &email, &password).await,
        Commands::ResetPassword {
            email,
            new_password,
        } => account::reset_password(&client, &email, &new_password).await,
        Commands::Profile { name, email, phone } => {
            let user_id = require_user_id(cli.user_id)?;
            account::profile(&client, user_id, name, email, phone).await
        }
        Commands::Chat { message } => conversation::chat(&client, cli.user_id, &message).await,
        Commands::History {
            limit,
            messages,
            strict,
        } => {
            let user_id = require_user_id(cli.user_id)?;
            let mut policy = config.sessions.timestamp_policy;
            if strict {
                policy = crate::sessions::TimestampPolicy::Strict;
            }
            conversation::history(&client, user_id, limit, messages, policy).await
        }
        Commands::DeleteMessage { id } => conversation::delete_message(&client, id).await,
        Commands::State => {
            let user_id = require_user_id(cli.user_id)?;
            wellbeing::state(&client, user_id).await
        }
        Commands::Timeline { days } => {
            let user_id = require_user_id(cli.user_id)?;
            wellbeing::timeline(&client, user_id, window_days(days, &config)).await
        }
        Commands::Recommendations => {
            let user_id = require_user_id(cli.user_id)?;
            wellbeing::recommendations(&client, user_id).await
        }
        Commands::Insights { days } => {
            let user_id = require_user_id(cli.user_id)?;
            wellbeing::insights(&client, user_id, window_days(days, &config)).await
        }
    }
}
