//! Chat commands: send a message, browse sessions, delete a message

use crate::api::{UserContext, WardaClient};
use crate::error::Result;
use crate::sessions::{Segmenter, Session, TimestampPolicy};
use colored::Colorize;
use prettytable::{format, Table};

/// Send one message and print the reply
///
/// Without a user id the message is sent anonymously.
pub async fn chat(client: &WardaClient, user_id: Option<i64>, message: &str) -> Result<()> {
    let context = UserContext { user_id };
    let reply = client.send_message(&context, message).await?;
    println!("{}", reply);
    Ok(())
}

/// Print the chat history grouped into sessions, most recent first
pub async fn history(
    client: &WardaClient,
    user_id: i64,
    limit: Option<u32>,
    show_messages: bool,
    policy: TimestampPolicy,
) -> Result<()> {
    let segmenter = Segmenter::new(policy);
    let sessions = client.session_history(user_id, limit, &segmenter).await?;

    if sessions.is_empty() {
        println!("{}", "No previous sessions".yellow());
        return Ok(());
    }

    if show_messages {
        for session in sessions.iter().rev() {
            print_session(session);
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Session".bold(),
        "Messages".bold(),
        "Preview".bold()
    ]);

    for session in sessions.iter().rev() {
        table.add_row(prettytable::row![
            session.start_label.cyan(),
            session.messages.len(),
            session.preview()
        ]);
    }

    println!("\nConversation Sessions:");
    table.printstd();
    println!();
    Ok(())
}

fn print_session(session: &Session) {
    println!("\n{}", session.title.bold());
    for message in &session.messages {
        println!("  {} {}", "you:".cyan(), message.query);
        println!("  {} {}", "warda:".green(), message.response);
    }
}

/// Delete one chat message
pub async fn delete_message(client: &WardaClient, message_id: i64) -> Result<()> {
    let result = client.delete_message(message_id).await?;
    println!("{}", result.message.green());
    Ok(())
}
