//! Warda backend client integration tests
//!
//! Exercises `WardaClient` against a `wiremock` mock server. Each test checks
//! that one exchange resolves to exactly one outcome: a decoded value, or a
//! network, server or parse error.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use warda::api::{HealthStatus, ProfileUpdate, RegisterRequest, Trend, UserContext};
use warda::error::{ApiError, ParseError, WardaError};
use warda::sessions::{Segmenter, TimestampPolicy};

mod common;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_success_returns_identity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "amira@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": 42,
            "name": "Amira",
            "email": "amira@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let auth = client
        .login("amira@example.com", "secret")
        .await
        .expect("login should succeed");

    assert_eq!(auth.user_id, 42);
    assert_eq!(auth.name, "Amira");
    assert_eq!(auth.email, "amira@example.com");
}

#[tokio::test]
async fn test_login_rejected_is_server_error_with_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client.login("amira@example.com", "wrong").await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Server {
            status: 401,
            message: "Invalid credentials".to_string()
        }
    );
    assert_eq!(err.to_string(), "Server error (401): Invalid credentials");
}

#[tokio::test]
async fn test_register_echoes_name_and_email() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "User registered successfully",
            "user_id": 7
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let request = RegisterRequest {
        name: "Omar".to_string(),
        email: "omar@example.com".to_string(),
        phone: "+20100000000".to_string(),
        password: "secret".to_string(),
    };
    let auth = client.register(&request).await.expect("register should succeed");

    assert_eq!(auth.user_id, 7);
    assert_eq!(auth.name, "Omar");
    assert_eq!(auth.email, "omar@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})),
        )
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let request = RegisterRequest {
        name: "Omar".to_string(),
        email: "omar@example.com".to_string(),
        phone: "+20100000000".to_string(),
        password: "secret".to_string(),
    };
    let err = client.register(&request).await.unwrap_err();

    assert!(err.is_server());
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_reset_password_returns_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .and(body_json(json!({"email": "amira@example.com", "new_password": "n3w"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Password reset successfully"})),
        )
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let message = client
        .reset_password("amira@example.com", "n3w")
        .await
        .expect("reset should succeed");

    assert_eq!(message, "Password reset successfully");
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_send_message_attaches_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/message"))
        .and(body_json(json!({"query": "I slept badly", "user_id": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "That sounds exhausting.",
            "emotional_state": "tired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let reply = client
        .send_message(&UserContext::for_user(42), "I slept badly")
        .await
        .expect("message should succeed");

    assert_eq!(reply, "That sounds exhausting.");
}

#[tokio::test]
async fn test_send_message_anonymous_omits_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/message"))
        .and(body_json(json!({"query": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hi!"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let reply = client
        .send_message(&UserContext::anonymous(), "hello")
        .await
        .expect("anonymous message should succeed");

    assert_eq!(reply, "Hi!");
}

#[tokio::test]
async fn test_send_message_missing_response_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Hi!"})))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client
        .send_message(&UserContext::for_user(1), "hello")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Parse(ParseError::MissingField("response".to_string()))
    );
}

#[tokio::test]
async fn test_non_json_server_error_uses_unknown_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/message"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client
        .send_message(&UserContext::for_user(1), "hello")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Server {
            status: 500,
            message: "Unknown error".to_string()
        }
    );
}

#[tokio::test]
async fn test_validation_error_detail_list_uses_unknown_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/message"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "query"], "msg": "field required"}]
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client
        .send_message(&UserContext::anonymous(), "")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err,
        ApiError::Server {
            status: 422,
            message: "Unknown error".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/message"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client
        .send_message(&UserContext::anonymous(), "hello")
        .await
        .unwrap_err();

    assert!(err.is_parse());
    assert!(matches!(err, ApiError::Parse(ParseError::Malformed(_))));
}

#[tokio::test]
async fn test_slow_server_times_out_as_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"model_loaded": true, "embeddings_loaded": true}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = common::client_with_timeout(&server.uri(), 1);
    let err = client.health().await.unwrap_err();

    assert!(err.is_network(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_success_body_cut_off_is_network_error() {
    let base_url = common::cut_off_body_server("HTTP/1.1 200 OK").await;

    let client = common::client_for(&base_url);
    let err = client.health().await.unwrap_err();

    assert!(err.is_network(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_error_body_cut_off_is_network_error() {
    let base_url = common::cut_off_body_server("HTTP/1.1 500 Internal Server Error").await;

    let client = common::client_for(&base_url);
    let err = client.health().await.unwrap_err();

    assert!(err.is_network(), "unexpected error: {:?}", err);
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = common::client_for("http://127.0.0.1:1");
    let err = client.health().await.unwrap_err();

    assert!(err.is_network());
    assert!(err.status().is_none());
}

// ---------------------------------------------------------------------------
// History and sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_chat_history_passes_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history/42"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::history_entry(9, "2025-01-05T11:00:00"),
            common::history_entry(8, "2025-01-05T10:00:00")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let history = client
        .chat_history(42, Some(2))
        .await
        .expect("history should succeed");

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, 9);
    assert_eq!(history[0].query, "question 9");
    assert_eq!(history[1].response, "answer 8");
}

#[tokio::test]
async fn test_chat_history_missing_timestamp_names_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::history_entry(2, "2025-01-05T10:00:00"),
            {"id": 1, "query": "q", "response": "r"}
        ])))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client.chat_history(42, None).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Parse(ParseError::MissingField("[1].timestamp".to_string()))
    );
}

#[tokio::test]
async fn test_session_history_groups_newest_first_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::history_entry(4, "2025-01-05T11:05:00"),
            common::history_entry(3, "2025-01-05T11:00:00"),
            common::history_entry(2, "2025-01-05T10:15:00"),
            common::history_entry(1, "2025-01-05T10:00:00")
        ])))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let sessions = client
        .session_history(42, None, &Segmenter::default())
        .await
        .expect("session history should succeed");

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].title, "Session: Jan 05, 2025 10:00");
    let first_ids: Vec<i64> = sessions[0].messages.iter().map(|m| m.id).collect();
    let second_ids: Vec<i64> = sessions[1].messages.iter().map(|m| m.id).collect();
    assert_eq!(first_ids, vec![1, 2]);
    assert_eq!(second_ids, vec![3, 4]);
    assert_eq!(sessions[1].start_label, "Jan 05, 2025 11:00");
}

#[tokio::test]
async fn test_session_history_strict_policy_surfaces_segment_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::history_entry(2, "yesterday"),
            common::history_entry(1, "2025-01-05T10:00:00")
        ])))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());

    let err = client
        .session_history(42, None, &Segmenter::new(TimestampPolicy::Strict))
        .await
        .unwrap_err();
    assert!(matches!(err, WardaError::Segment(_)));

    let sessions = client
        .session_history(42, None, &Segmenter::new(TimestampPolicy::Skip))
        .await
        .expect("skip policy should not fail");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].messages.len(), 1);
}

#[tokio::test]
async fn test_session_history_server_error_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history/42"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "Database unavailable"})),
        )
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client
        .session_history(42, None, &Segmenter::default())
        .await
        .unwrap_err();

    match err {
        WardaError::Api(api) => assert_eq!(api.status(), Some(500)),
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_message() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/chat/history/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Message deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let result = client.delete_message(9).await.expect("delete should succeed");

    assert_eq!(result.status, "success");
    assert_eq!(result.message, "Message deleted successfully");
}

// ---------------------------------------------------------------------------
// Emotional state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_current_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/state/current/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "anxious",
            "confidence": 0.82,
            "trend": "declining",
            "color_code": "#FF9500",
            "description": "Feeling worried."
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let snapshot = client.current_state(42).await.expect("state should succeed");

    assert_eq!(snapshot.state, "anxious");
    assert!((snapshot.confidence - 0.82).abs() < f64::EPSILON);
    assert_eq!(snapshot.trend, Trend::Declining);
    assert_eq!(snapshot.color_code, "#FF9500");
}

#[tokio::test]
async fn test_timeline_passes_days_and_preserves_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/state/timeline/42"))
        .and(query_param("days", "14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timeline": [
                {
                    "timestamp": "2025-01-05T10:00:00",
                    "emotion": "sad",
                    "confidence": 0.7,
                    "color": "#5AC8FA",
                    "value": -2,
                    "short_message": "I feel down..."
                },
                {
                    "timestamp": "2025-01-06T09:00:00",
                    "emotion": "hopeful",
                    "confidence": 0.9,
                    "color": "#34C759",
                    "value": 2,
                    "short_message": "Things look better"
                }
            ],
            "summary": {
                "state": "hopeful",
                "trend": "improving",
                "color": "#34C759",
                "description": "Things are looking up."
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let timeline = client.timeline(42, 14).await.expect("timeline should succeed");

    assert_eq!(timeline.samples.len(), 2);
    assert_eq!(timeline.samples[0].emotion, "sad");
    assert_eq!(timeline.samples[0].value, -2);
    assert_eq!(timeline.samples[1].emotion, "hopeful");
    assert_eq!(timeline.summary.trend, "improving");
}

#[tokio::test]
async fn test_timeline_empty_period() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/state/timeline/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timeline": [],
            "summary": {"state": "neutral", "trend": "stable"}
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let timeline = client.timeline(42, 7).await.expect("timeline should succeed");

    assert!(timeline.is_empty());
    assert_eq!(timeline.summary.state, "neutral");
    assert_eq!(timeline.summary.color, "");
}

#[tokio::test]
async fn test_timeline_sample_missing_field_fails_whole_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/state/timeline/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timeline": [{
                "timestamp": "2025-01-05T10:00:00",
                "emotion": "sad",
                "confidence": 0.7,
                "value": -2,
                "short_message": "I feel down..."
            }],
            "summary": {"state": "sad", "trend": "stable"}
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client.timeline(42, 7).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Parse(ParseError::MissingField("timeline[0].color".to_string()))
    );
}

#[tokio::test]
async fn test_recommendations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/state/recommendations/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_state": {"emotion": "stressed", "trend": "stable"},
            "recommendations": ["Take a short walk", "Try box breathing"]
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let recommendations = client
        .recommendations(42)
        .await
        .expect("recommendations should succeed");

    assert_eq!(recommendations.emotion, "stressed");
    assert_eq!(recommendations.trend, Trend::Stable);
    assert_eq!(recommendations.recommendations.len(), 2);
}

#[tokio::test]
async fn test_insights_without_distribution() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/state/insights/42"))
        .and(query_param("days", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_interactions": 0,
            "insights": [],
            "patterns": {}
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let insights = client.insights(42, 30).await.expect("insights should succeed");

    assert_eq!(insights.total_interactions, 0);
    assert!(insights.emotion_distribution.is_empty());
    assert!(insights.insights.is_empty());
}

// ---------------------------------------------------------------------------
// Service and profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_degraded_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "model_loaded": true,
            "embeddings_loaded": false,
            "version": "1.0.0"
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let report = client.health().await.expect("health should succeed");

    assert!(!report.is_healthy());
    assert_eq!(
        report.status,
        HealthStatus::Degraded {
            model_loaded: true,
            embeddings_loaded: false
        }
    );
    assert_eq!(report.version.as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn test_health_healthy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_loaded": true,
            "embeddings_loaded": true
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let report = client.health().await.expect("health should succeed");

    assert_eq!(report.status, HealthStatus::Healthy);
    assert!(report.version.is_none());
}

#[tokio::test]
async fn test_service_info() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Warda API",
            "version": "1.0.0",
            "description": "Mental health assistant"
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let info = client.service_info().await.expect("info should succeed");

    assert_eq!(info.name, "Warda API");
    assert_eq!(info.version, "1.0.0");
}

#[tokio::test]
async fn test_update_profile_uses_put() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/auth/profile/42"))
        .and(body_json(json!({
            "name": "Amira S.",
            "email": "amira@example.com",
            "phone": "+20111111111"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Amira S.",
            "email": "amira@example.com",
            "phone": "+20111111111",
            "created_at": "2025-01-01T08:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let update = ProfileUpdate {
        name: "Amira S.".to_string(),
        email: "amira@example.com".to_string(),
        phone: "+20111111111".to_string(),
    };
    let profile = client
        .update_profile(42, &update)
        .await
        .expect("update should succeed");

    assert_eq!(profile.id, 42);
    assert_eq!(profile.name, "Amira S.");
}

#[tokio::test]
async fn test_profile_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/profile/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "User not found"})))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let err = client.profile(404).await.unwrap_err();

    assert_eq!(err.to_string(), "Server error (404): User not found");
}

#[tokio::test]
async fn test_submit_raw_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let value = client
        .submit(reqwest::Method::GET, "/health", None)
        .await
        .expect("submit should succeed");

    assert_eq!(value["status"], "healthy");
}

// ---------------------------------------------------------------------------
// Completion adapters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_spawn_invokes_handler_exactly_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_loaded": true,
            "embeddings_loaded": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let handle = client.spawn(
        |c| async move { c.health().await },
        move |outcome| {
            tx.send(outcome).expect("receiver alive");
        },
    );
    handle.await.expect("task should not panic");

    let outcome = rx.recv().await.expect("handler should have run");
    assert!(outcome.expect("health should succeed").is_healthy());
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_dispatch_concurrent_calls_complete_independently() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/state/current/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "calm",
            "confidence": 0.9,
            "trend": "improving",
            "color_code": "#34C759",
            "description": "Feeling calm."
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/state/current/2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&server)
        .await;

    let client = common::client_for(&server.uri());
    let first = client.dispatch(|c| async move { c.current_state(1).await });
    let second = client.dispatch(|c| async move { c.current_state(2).await });

    let second = second.await.expect("sender should not be dropped");
    let first = first.await.expect("sender should not be dropped");

    assert_eq!(first.expect("first should succeed").state, "calm");
    assert_eq!(second.unwrap_err().status(), Some(500));
}
