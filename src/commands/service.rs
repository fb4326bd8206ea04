//! Backend status commands

use crate::api::{HealthStatus, WardaClient};
use crate::error::Result;
use colored::Colorize;

/// Print the health check outcome
///
/// A degraded server is reported but is not an error; only transport,
/// server and parse failures make the command fail.
pub async fn health(client: &WardaClient) -> Result<()> {
    let report = client.health().await?;

    match report.status {
        HealthStatus::Healthy => println!("{}", "Server is healthy".green()),
        HealthStatus::Degraded {
            model_loaded,
            embeddings_loaded,
        } => {
            println!(
                "{}",
                "Server is running but some components are not loaded".yellow()
            );
            println!("  model loaded:      {}", yes_no(model_loaded));
            println!("  embeddings loaded: {}", yes_no(embeddings_loaded));
        }
    }

    if let Some(version) = report.version {
        println!("  version: {}", version);
    }

    Ok(())
}

/// Print service name, version and description
pub async fn info(client: &WardaClient) -> Result<()> {
    let info = client.service_info().await?;
    println!("{} {}", info.name.bold(), info.version.cyan());
    println!("{}", info.description);
    Ok(())
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".red()
    }
}
