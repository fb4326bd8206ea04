//! Response decoding rules
//!
//! Each endpoint deserializes its 2xx body into a serde-derived wire struct.
//! Decoding is total: a rule either produces a fully populated value or a
//! [`ParseError`] naming the first missing or mistyped field, cited with
//! dotted/indexed paths such as `timeline[2].emotion`. Partial values are
//! never returned. Only rules serde cannot express (confidence range, absent
//! health flags) are checked after deserializing.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::types::{
    AuthResult, ChatMessage, DeleteResult, EmotionalInsights, EmotionalStateSnapshot,
    HealthReport, HealthStatus, Insight, Recommendations, ServiceInfo, Trend, UserProfile,
};
use crate::error::ParseError;
use crate::timeline::{self, EmotionalTimeline};

/// Message used when a non-2xx body carries no usable `detail`
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Parses a raw body into JSON
pub fn parse_body(body: &str) -> Result<Value, ParseError> {
    serde_json::from_str(body).map_err(|e| ParseError::Malformed(e.to_string()))
}

/// Extracts the human readable message from a non-2xx body
///
/// Returns the `detail` string when the body is a JSON object carrying one,
/// otherwise [`UNKNOWN_ERROR`].
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

/// Deserializes `value`, citing the offending field on failure
pub(crate) fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, ParseError> {
    serde_path_to_error::deserialize(value).map_err(field_error)
}

/// Maps a located serde error onto [`ParseError`]
///
/// serde reports a missing field at the path of its parent, so the field
/// name is appended. A type error at the root is a shape problem.
fn field_error(err: serde_path_to_error::Error<serde_json::Error>) -> ParseError {
    let path = err.path().to_string();
    let at_root = path == ".";
    let message = err.into_inner().to_string();

    if let Some(name) = missing_field_name(&message) {
        let field = if at_root {
            name.to_string()
        } else {
            format!("{}.{}", path, name)
        };
        return ParseError::MissingField(field);
    }

    if at_root {
        return ParseError::Malformed(message);
    }

    let expected = message
        .split_once(", expected ")
        .map(|(_, expected)| expected.to_string())
        .unwrap_or(message);
    ParseError::InvalidField {
        field: path,
        expected,
    }
}

fn missing_field_name(message: &str) -> Option<&str> {
    message.strip_prefix("missing field `")?.strip_suffix('`')
}

/// Parses `body` and requires a top-level object before deserializing
fn decode_object<T: DeserializeOwned>(body: &str) -> Result<T, ParseError> {
    let value = parse_body(body)?;
    if !value.is_object() {
        return Err(ParseError::Malformed("expected a JSON object".to_string()));
    }
    from_value(&value)
}

/// Rejects a classifier confidence outside `[0, 1]`
pub(crate) fn check_confidence(value: f64, field: &str) -> Result<(), ParseError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParseError::InvalidField {
            field: field.to_string(),
            expected: "number between 0 and 1".to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RegisterReply {
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct MessageReply {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
}

#[derive(Debug, Deserialize)]
struct HealthReply {
    model_loaded: Option<bool>,
    embeddings_loaded: Option<bool>,
    status: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentEmotion {
    emotion: String,
    trend: Trend,
}

#[derive(Debug, Deserialize)]
struct RecommendationsReply {
    current_state: CurrentEmotion,
    recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct InsightsReply {
    total_interactions: u64,
    #[serde(default)]
    emotion_distribution: BTreeMap<String, f64>,
    insights: Vec<Insight>,
    patterns: Map<String, Value>,
}

/// `POST /auth/register`: only `user_id` comes back; name and email echo the request
pub fn decode_register(body: &str, name: &str, email: &str) -> Result<AuthResult, ParseError> {
    let reply: RegisterReply = decode_object(body)?;
    Ok(AuthResult {
        user_id: reply.user_id,
        name: name.to_string(),
        email: email.to_string(),
    })
}

/// `POST /auth/login`
pub fn decode_login(body: &str) -> Result<AuthResult, ParseError> {
    decode_object(body)
}

/// `POST /auth/reset-password`
pub fn decode_reset_password(body: &str) -> Result<String, ParseError> {
    decode_object::<MessageReply>(body).map(|reply| reply.message)
}

/// `POST /chat/message`
pub fn decode_chat_reply(body: &str) -> Result<String, ParseError> {
    decode_object::<ChatReply>(body).map(|reply| reply.response)
}

/// `GET /health`
///
/// An absent (or null) component flag counts as not loaded; a flag of the
/// wrong type or a body that is not an object is a parse error.
pub fn decode_health(body: &str) -> Result<HealthReport, ParseError> {
    let reply: HealthReply = decode_object(body)?;
    Ok(HealthReport {
        status: HealthStatus::from_components(
            reply.model_loaded.unwrap_or(false),
            reply.embeddings_loaded.unwrap_or(false),
        ),
        server_status: reply.status,
        version: reply.version,
    })
}

/// `GET /chat/history/{userId}`
///
/// The body must be a top-level array; entries may carry extra fields.
pub fn decode_history(body: &str) -> Result<Vec<ChatMessage>, ParseError> {
    let value = parse_body(body)?;
    if !value.is_array() {
        return Err(ParseError::Malformed("expected a JSON array".to_string()));
    }
    from_value(&value)
}

/// `GET /state/current/{userId}`
pub fn decode_current_state(body: &str) -> Result<EmotionalStateSnapshot, ParseError> {
    let snapshot: EmotionalStateSnapshot = decode_object(body)?;
    check_confidence(snapshot.confidence, "confidence")?;
    Ok(snapshot)
}

/// `GET /state/timeline/{userId}`
pub fn decode_timeline(body: &str) -> Result<EmotionalTimeline, ParseError> {
    timeline::aggregate(&parse_body(body)?)
}

/// `GET /state/recommendations/{userId}`
pub fn decode_recommendations(body: &str) -> Result<Recommendations, ParseError> {
    let reply: RecommendationsReply = decode_object(body)?;
    Ok(Recommendations {
        emotion: reply.current_state.emotion,
        trend: reply.current_state.trend,
        recommendations: reply.recommendations,
    })
}

/// `GET /auth/profile/{userId}` and `PUT /auth/profile/{userId}`
pub fn decode_profile(body: &str) -> Result<UserProfile, ParseError> {
    decode_object(body)
}

/// `DELETE /chat/history/{messageId}`
pub fn decode_delete(body: &str) -> Result<DeleteResult, ParseError> {
    decode_object(body)
}

/// `GET /state/insights/{userId}`
///
/// The server omits `emotion_distribution` when there is nothing to report.
pub fn decode_insights(body: &str) -> Result<EmotionalInsights, ParseError> {
    let reply: InsightsReply = decode_object(body)?;
    Ok(EmotionalInsights {
        total_interactions: reply.total_interactions,
        emotion_distribution: reply.emotion_distribution,
        insights: reply.insights,
        patterns: Value::Object(reply.patterns),
    })
}

/// `GET /`
pub fn decode_service_info(body: &str) -> Result<ServiceInfo, ParseError> {
    decode_object(body)
}
