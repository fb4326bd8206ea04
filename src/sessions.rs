//! Conversation session segmentation
//!
//! Groups a flat, chronologically ordered chat history into sessions: maximal
//! runs of messages with no gap longer than [`SESSION_IDLE_THRESHOLD_MINUTES`]
//! between neighbours. Segmentation is pure and deterministic; it holds no
//! state between calls and never re-sorts its input.
//!
//! # Example
//!
//! ```
//! use warda::api::ChatMessage;
//! use warda::sessions::segment;
//!
//! let history = vec![
//!     ChatMessage::new(1, "hi", "hello", "2025-01-05T10:00:00"),
//!     ChatMessage::new(2, "still here", "good", "2025-01-05T10:15:00"),
//!     ChatMessage::new(3, "back again", "welcome", "2025-01-05T11:00:00"),
//! ];
//!
//! let sessions = segment(&history);
//! assert_eq!(sessions.len(), 2);
//! assert_eq!(sessions[0].start_label, "Jan 05, 2025 10:00");
//! ```

use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::ChatMessage;
use crate::error::SegmentError;

/// Longest gap between neighbouring messages that keeps them in one session
pub const SESSION_IDLE_THRESHOLD_MINUTES: i64 = 30;

/// [`SESSION_IDLE_THRESHOLD_MINUTES`] as a duration
pub fn idle_threshold() -> Duration {
    Duration::minutes(SESSION_IDLE_THRESHOLD_MINUTES)
}

/// Display pattern for session start labels (`Jan 05, 2025 10:00`)
pub const START_LABEL_FORMAT: &str = "%b %d, %Y %H:%M";

/// Preview length in characters before truncation
pub const PREVIEW_MAX_CHARS: usize = 50;

/// Preview shown for a session without messages
pub const EMPTY_PREVIEW: &str = "No messages";

/// What to do with a message whose timestamp cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Log the message and leave it out of every session
    #[default]
    Skip,
    /// Fail the whole segmentation call
    Strict,
}

impl fmt::Display for TimestampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampPolicy::Skip => write!(f, "skip"),
            TimestampPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for TimestampPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(TimestampPolicy::Skip),
            "strict" => Ok(TimestampPolicy::Strict),
            other => Err(format!("unknown timestamp policy: {}", other)),
        }
    }
}

/// A run of chat messages with no internal idle gap over the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// `Session: <start label>`
    pub title: String,
    /// First message time formatted with [`START_LABEL_FORMAT`]
    pub start_label: String,
    /// Parsed time of the first message
    pub started_at: NaiveDateTime,
    /// Messages in input order
    pub messages: Vec<ChatMessage>,
}

impl Session {
    fn close(started_at: NaiveDateTime, messages: Vec<ChatMessage>) -> Self {
        let start_label = started_at.format(START_LABEL_FORMAT).to_string();
        Self {
            title: format!("Session: {}", start_label),
            start_label,
            started_at,
            messages,
        }
    }

    /// Preview text for this session, see [`preview_text`]
    pub fn preview(&self) -> String {
        preview_text(&self.messages)
    }
}

/// Preview text for a list of messages
///
/// The first message's query, cut to [`PREVIEW_MAX_CHARS`] characters plus
/// `...` when longer, or [`EMPTY_PREVIEW`] when there are no messages.
pub fn preview_text(messages: &[ChatMessage]) -> String {
    let Some(first) = messages.first() else {
        return EMPTY_PREVIEW.to_string();
    };

    if first.query.chars().count() > PREVIEW_MAX_CHARS {
        let head: String = first.query.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        first.query.clone()
    }
}

/// Parses a message timestamp as UTC
///
/// Accepts `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds, and
/// RFC 3339 timestamps carrying an offset (converted to UTC).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Session segmenter configured with a timestamp policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    policy: TimestampPolicy,
}

impl Segmenter {
    /// Creates a segmenter with the given policy
    pub fn new(policy: TimestampPolicy) -> Self {
        Self { policy }
    }

    /// Policy in effect
    pub fn policy(&self) -> TimestampPolicy {
        self.policy
    }

    /// Groups `messages` into sessions
    ///
    /// Input is assumed sorted ascending by timestamp. A new session starts
    /// whenever the gap to the previous parsed message exceeds
    /// [`idle_threshold`]; a gap of exactly the threshold stays in the
    /// current session.
    ///
    /// # Errors
    ///
    /// Under [`TimestampPolicy::Strict`], returns
    /// [`SegmentError::UnparseableTimestamp`] for the first bad timestamp.
    /// Under [`TimestampPolicy::Skip`] this never fails.
    pub fn segment(&self, messages: &[ChatMessage]) -> Result<Vec<Session>, SegmentError> {
        let threshold = idle_threshold();
        let mut sessions = Vec::new();
        let mut open: Vec<ChatMessage> = Vec::new();
        let mut open_started: Option<NaiveDateTime> = None;
        let mut previous: Option<NaiveDateTime> = None;

        for message in messages {
            let Some(current) = parse_timestamp(&message.timestamp) else {
                match self.policy {
                    TimestampPolicy::Skip => {
                        tracing::warn!(
                            id = message.id,
                            timestamp = %message.timestamp,
                            "Skipping message with unparseable timestamp"
                        );
                        continue;
                    }
                    TimestampPolicy::Strict => {
                        return Err(SegmentError::UnparseableTimestamp {
                            id: message.id,
                            timestamp: message.timestamp.clone(),
                        });
                    }
                }
            };

            let starts_session = match previous {
                None => true,
                Some(prev) => current - prev > threshold,
            };

            if starts_session {
                if let Some(started_at) = open_started.take() {
                    sessions.push(Session::close(started_at, std::mem::take(&mut open)));
                }
                open_started = Some(current);
            }

            open.push(message.clone());
            previous = Some(current);
        }

        if let Some(started_at) = open_started {
            sessions.push(Session::close(started_at, open));
        }

        tracing::debug!(
            messages = messages.len(),
            sessions = sessions.len(),
            "Segmented chat history"
        );

        Ok(sessions)
    }
}

/// Segments with the default best-effort policy
///
/// Messages with unparseable timestamps are logged and left out.
pub fn segment(messages: &[ChatMessage]) -> Vec<Session> {
    // Skip policy never returns Err.
    Segmenter::new(TimestampPolicy::Skip)
        .segment(messages)
        .unwrap_or_default()
}
