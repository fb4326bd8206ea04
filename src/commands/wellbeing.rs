//! Emotional state commands: current state, timeline, recommendations, insights

use crate::api::{Trend, WardaClient};
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

/// Print the current emotional state
pub async fn state(client: &WardaClient, user_id: i64) -> Result<()> {
    let snapshot = client.current_state(user_id).await?;

    println!(
        "{} ({:.0}% confidence)",
        snapshot.state.bold(),
        snapshot.confidence * 100.0
    );
    println!("Trend: {}", trend_label(snapshot.trend));
    if !snapshot.description.is_empty() {
        println!("{}", snapshot.description);
    }
    Ok(())
}

/// Print the emotional timeline for the last `days` days
pub async fn timeline(client: &WardaClient, user_id: i64, days: u32) -> Result<()> {
    let timeline = client.timeline(user_id, days).await?;

    if timeline.is_empty() {
        println!(
            "{}",
            format!("No emotional data in the last {} days", days).yellow()
        );
    } else {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row![
            "Time".bold(),
            "Emotion".bold(),
            "Confidence".bold(),
            "Message".bold()
        ]);

        for sample in &timeline.samples {
            table.add_row(prettytable::row![
                sample.timestamp,
                sample.emotion.cyan(),
                format!("{:.0}%", sample.confidence * 100.0),
                sample.short_message
            ]);
        }

        println!("\nEmotional Timeline ({} days):", days);
        table.printstd();
    }

    let summary = &timeline.summary;
    println!(
        "Overall: {} ({})",
        summary.state.bold(),
        summary_trend_label(&summary.trend)
    );
    if !summary.description.is_empty() {
        println!("{}", summary.description);
    }
    Ok(())
}

/// Print recommendations for the current emotional state
pub async fn recommendations(client: &WardaClient, user_id: i64) -> Result<()> {
    let recommendations = client.recommendations(user_id).await?;

    println!(
        "Feeling {} ({})",
        recommendations.emotion.bold(),
        trend_label(recommendations.trend)
    );
    for (index, item) in recommendations.recommendations.iter().enumerate() {
        println!("  {}. {}", index + 1, item);
    }
    Ok(())
}

/// Print insights about emotional patterns over the last `days` days
pub async fn insights(client: &WardaClient, user_id: i64, days: u32) -> Result<()> {
    let insights = client.insights(user_id, days).await?;

    println!(
        "{} interactions in the last {} days",
        insights.total_interactions, days
    );

    if !insights.emotion_distribution.is_empty() {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row!["Emotion".bold(), "Share".bold()]);
        for (emotion, share) in &insights.emotion_distribution {
            table.add_row(prettytable::row![emotion, format!("{:.1}%", share)]);
        }
        table.printstd();
    }

    for insight in &insights.insights {
        println!("\n{}", insight.title.bold());
        println!("  {}", insight.description);
    }
    Ok(())
}

// Timeline summaries carry the trend as free text; unknown values are shown verbatim.
fn summary_trend_label(raw: &str) -> colored::ColoredString {
    match raw.parse::<Trend>() {
        Ok(trend) => trend_label(trend),
        Err(_) => raw.normal(),
    }
}

fn trend_label(trend: Trend) -> colored::ColoredString {
    match trend {
        Trend::Improving => "improving".green(),
        Trend::Declining => "declining".red(),
        Trend::Stable => "stable".normal(),
    }
}
