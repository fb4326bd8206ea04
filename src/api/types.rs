//! Domain values returned by the Warda backend and the request bodies sent to it.
//!
//! Every value here is owned by the caller once a call returns; the client
//! keeps no reference to it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One exchange in the chat history: the user's query and the assistant's reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned message id, monotonic with creation time
    pub id: i64,
    /// Text the user sent
    pub query: String,
    /// Assistant reply
    pub response: String,
    /// ISO-8601-like UTC timestamp without offset, e.g. `2025-01-05T10:00:00`
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a chat message
    pub fn new(
        id: i64,
        query: impl Into<String>,
        response: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id,
            query: query.into(),
            response: response.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Result of a successful login or registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    /// Opaque account identifier, stable for the lifetime of the account
    pub user_id: i64,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
}

/// Direction of the user's recent emotional trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Recent states are moving toward the positive end
    Improving,
    /// Recent states are moving toward the distressed end
    Declining,
    /// No clear movement
    Stable,
}

impl Trend {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "improving" => Ok(Trend::Improving),
            "declining" => Ok(Trend::Declining),
            "stable" => Ok(Trend::Stable),
            other => Err(format!("unknown trend: {}", other)),
        }
    }
}

/// The user's current emotional state as computed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalStateSnapshot {
    /// Emotion label, e.g. `anxious`
    pub state: String,
    /// Classifier confidence in `[0, 1]`
    pub confidence: f64,
    /// Recent trajectory
    pub trend: Trend,
    /// Hex display color, e.g. `#FF9500`
    pub color_code: String,
    /// Human readable description
    pub description: String,
}

/// Outcome of the health check policy
///
/// `Degraded` is a semantic result of a successful call, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    /// Both the language model and the embeddings are loaded
    Healthy,
    /// The server answered but at least one component is not loaded
    Degraded {
        /// Whether the language model is loaded
        model_loaded: bool,
        /// Whether the embeddings are loaded
        embeddings_loaded: bool,
    },
}

impl HealthStatus {
    /// Applies the health policy: healthy only when both components are loaded
    pub fn from_components(model_loaded: bool, embeddings_loaded: bool) -> Self {
        if model_loaded && embeddings_loaded {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded {
                model_loaded,
                embeddings_loaded,
            }
        }
    }

    /// Returns true for [`HealthStatus::Healthy`]
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Decoded `/health` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Policy outcome
    pub status: HealthStatus,
    /// Free-form status string reported by the server, when present
    pub server_status: Option<String>,
    /// Server version, when present
    pub version: Option<String>,
}

impl HealthReport {
    /// Returns true when both components are loaded
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}

/// Suggestions tailored to the user's current emotional state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Current emotion label
    pub emotion: String,
    /// Current trend
    pub trend: Trend,
    /// Ordered suggestions
    pub recommendations: Vec<String>,
}

/// Stored account profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Creation time as reported by the server
    pub created_at: String,
}

/// A single observation in the insights report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Machine readable kind, e.g. `most_common_emotion`
    #[serde(rename = "type")]
    pub kind: String,
    /// Short headline
    pub title: String,
    /// Longer explanation
    pub description: String,
}

/// Aggregate view of the user's emotional patterns over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalInsights {
    /// Number of messages analysed
    pub total_interactions: u64,
    /// Percentage of messages per emotion; empty when there were no messages
    pub emotion_distribution: BTreeMap<String, f64>,
    /// Generated observations
    pub insights: Vec<Insight>,
    /// Opaque pattern data (time of day, day of week)
    pub patterns: serde_json::Value,
}

/// Identity of the backend service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Service description
    pub description: String,
}

/// Acknowledgement returned by deletion endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    /// Status keyword, e.g. `success`
    pub status: String,
    /// Human readable confirmation
    pub message: String,
}

/// Caller-owned identity context
///
/// The client never reads a user id implicitly; callers pass this value
/// to the operations that attach one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserContext {
    /// Stored user id, if the caller has one
    pub user_id: Option<i64>,
}

impl UserContext {
    /// Context with no user; chat requests are sent anonymously
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// Context for a known user
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Plain-text password, sent over the configured transport
    pub password: String,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Password
    pub password: String,
}

/// Body of `POST /auth/reset-password`
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    /// Account email
    pub email: String,
    /// Replacement password
    pub new_password: String,
}

/// Body of `POST /chat/message`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Text to send
    pub query: String,
    /// Omitted entirely for anonymous requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Body of `PUT /auth/profile/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Phone number
    pub phone: String,
}
