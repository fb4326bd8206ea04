//! Emotional timeline aggregation
//!
//! Maps the raw `/state/timeline` payload into an ordered list of
//! [`TimelineSample`]s and a [`TimelineSummary`]. This is a direct structural
//! transform: sample order is preserved and no smoothing, filtering or
//! interpolation is applied. The `value` ordinal is carried through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::api::decode::{check_confidence, from_value};
use crate::error::ParseError;

/// One point on the emotional timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSample {
    /// Time of the underlying message
    pub timestamp: String,
    /// Emotion label
    pub emotion: String,
    /// Classifier confidence in `[0, 1]`
    pub confidence: f64,
    /// Hex display color
    pub color: String,
    /// Categorical ordinal; more negative means more distressed
    pub value: i64,
    /// Truncated message text
    pub short_message: String,
}

/// Summary of the whole timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSummary {
    /// Current emotion label
    pub state: String,
    /// Trend over the period, as reported by the server
    pub trend: String,
    /// Hex display color; empty when the server sent none
    pub color: String,
    /// Human readable description; empty when the server sent none
    pub description: String,
}

impl TimelineSummary {
    /// The summary as a `{state, trend, color, description}` mapping
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("state".to_string(), self.state.clone()),
            ("trend".to_string(), self.trend.clone()),
            ("color".to_string(), self.color.clone()),
            ("description".to_string(), self.description.clone()),
        ])
    }
}

/// Decoded timeline payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalTimeline {
    /// Samples in server order
    pub samples: Vec<TimelineSample>,
    /// Period summary
    pub summary: TimelineSummary,
}

impl EmotionalTimeline {
    /// Returns true when the period held no messages
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Aggregates a raw timeline payload
///
/// Every sample field is required; the first missing or mistyped one fails
/// the whole call. Summary `state` and `trend` are required. Summary `color`
/// and `description` default to empty strings because the server omits them
/// for an empty period.
///
/// # Errors
///
/// Returns a [`ParseError`] naming the offending field.
pub fn aggregate(payload: &Value) -> Result<EmotionalTimeline, ParseError> {
    if !payload.is_object() {
        return Err(ParseError::Malformed("expected a JSON object".to_string()));
    }
    let reply: TimelineReply = from_value(payload)?;

    for (i, sample) in reply.timeline.iter().enumerate() {
        check_confidence(sample.confidence, &format!("timeline[{}].confidence", i))?;
    }

    Ok(EmotionalTimeline {
        samples: reply.timeline,
        summary: TimelineSummary {
            state: reply.summary.state,
            trend: reply.summary.trend,
            color: reply.summary.color.unwrap_or_default(),
            description: reply.summary.description.unwrap_or_default(),
        },
    })
}

#[derive(Debug, Deserialize)]
struct TimelineReply {
    timeline: Vec<TimelineSample>,
    summary: SummaryReply,
}

#[derive(Debug, Deserialize)]
struct SummaryReply {
    state: String,
    trend: String,
    color: Option<String>,
    description: Option<String>,
}
