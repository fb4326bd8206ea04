//! HTTP client for the Warda backend.
//!
//! Every operation issues exactly one HTTP exchange and resolves to exactly
//! one outcome: the decoded domain value, or one of the three disjoint
//! [`ApiError`] kinds. Nothing is retried; the caller decides whether to
//! resubmit.
//!
//! Operations are plain `async fn`s. For callers that prefer completion
//! handlers, [`WardaClient::spawn`] runs a call on the tokio runtime and
//! invokes the handler exactly once, and [`WardaClient::dispatch`] hands the
//! outcome back through a single-shot channel.
//!
//! # Example
//!
//! ```rust,no_run
//! use warda::api::{UserContext, WardaClient};
//! use warda::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WardaClient::new(&ApiConfig::default())?;
//!
//!     let auth = client.login("amira@example.com", "secret").await?;
//!     let reply = client
//!         .send_message(&UserContext::for_user(auth.user_id), "I slept badly")
//!         .await?;
//!     println!("{}", reply);
//!
//!     Ok(())
//! }
//! ```

use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value as JsonValue;
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::decode;
use super::types::{
    AuthResult, ChatMessage, ChatRequest, DeleteResult, EmotionalInsights,
    EmotionalStateSnapshot, HealthReport, LoginRequest, ProfileUpdate, Recommendations,
    RegisterRequest, ResetPasswordRequest, ServiceInfo, UserContext, UserProfile,
};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult, ParseError, WardaError};
use crate::sessions::{Segmenter, Session};
use crate::timeline::EmotionalTimeline;

/// Warda backend client
///
/// Cheap to clone; clones share the underlying connection pool. The client
/// holds no per-user state.
#[derive(Debug, Clone)]
pub struct WardaClient {
    client: Client,
    base_url: String,
}

impl WardaClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL and timeouts
    ///
    /// # Errors
    ///
    /// Returns `WardaError::Config` if the HTTP client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self, WardaError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| WardaError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL all paths are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds a request for `path` relative to the base URL.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header("Accept", "application/json")
    }

    /// Sends a request and classifies the outcome.
    ///
    /// Returns the raw body of a 2xx response. Transport failures, including
    /// a timeout or a body cut off mid-stream, become [`ApiError::Network`]
    /// whatever the status; any other status becomes [`ApiError::Server`]
    /// carrying the body's `detail` message.
    async fn execute(&self, path: &str, request: RequestBuilder) -> ApiResult<String> {
        debug!(path = %path, "Sending request");

        let response = request.send().await.map_err(|e| {
            error!(path = %path, error = %e, "Request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(
                path = %path,
                status = status.as_u16(),
                error = %e,
                "Failed to read response body"
            );
            ApiError::Network(e.to_string())
        })?;

        if status.is_success() {
            Ok(body)
        } else {
            let message = decode::error_detail(&body);
            warn!(
                path = %path,
                status = status.as_u16(),
                message = %message,
                "Server rejected request"
            );
            Err(ApiError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Sends a request and applies a decoding rule to the 2xx body.
    async fn call<T>(
        &self,
        path: &str,
        request: RequestBuilder,
        decode: impl FnOnce(&str) -> Result<T, ParseError>,
    ) -> ApiResult<T> {
        let body = self.execute(path, request).await?;
        decode(&body).map_err(|e| {
            error!(path = %path, error = %e, "Failed to decode response");
            ApiError::Parse(e)
        })
    }

    /// Issues one raw JSON exchange.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `path` - Path relative to the base URL, including any query string
    /// * `body` - Optional JSON body
    ///
    /// # Returns
    ///
    /// The parsed JSON body of a 2xx response.
    pub async fn submit(
        &self,
        method: Method,
        path: &str,
        body: Option<&JsonValue>,
    ) -> ApiResult<JsonValue> {
        let mut request = self.request(method, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.call(path, request, decode::parse_body).await
    }

    /// Registers a new account.
    ///
    /// # Returns
    ///
    /// The new user id together with the submitted name and email.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResult> {
        let path = "/auth/register";
        let auth = self
            .call(
                path,
                self.request(Method::POST, path).json(request),
                |body| decode::decode_register(body, &request.name, &request.email),
            )
            .await?;
        info!(user_id = auth.user_id, "Registered account");
        Ok(auth)
    }

    /// Logs in with email and password.
    ///
    /// The caller owns persisting the returned identity.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResult> {
        let path = "/auth/login";
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth = self
            .call(
                path,
                self.request(Method::POST, path).json(&request),
                decode::decode_login,
            )
            .await?;
        info!(user_id = auth.user_id, "Logged in");
        Ok(auth)
    }

    /// Replaces the password of the account registered under `email`.
    ///
    /// # Returns
    ///
    /// The server's confirmation message.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> ApiResult<String> {
        let path = "/auth/reset-password";
        let request = ResetPasswordRequest {
            email: email.to_string(),
            new_password: new_password.to_string(),
        };
        self.call(
            path,
            self.request(Method::POST, path).json(&request),
            decode::decode_reset_password,
        )
        .await
    }

    /// Sends a chat message and returns the assistant's reply.
    ///
    /// `user_id` is attached only when `context` carries one; otherwise the
    /// request is anonymous, which is not an error.
    pub async fn send_message(&self, context: &UserContext, query: &str) -> ApiResult<String> {
        if context.user_id.is_none() {
            warn!("No user id in context, sending anonymous chat request");
        }
        let path = "/chat/message";
        let request = ChatRequest {
            query: query.to_string(),
            user_id: context.user_id,
        };
        self.call(
            path,
            self.request(Method::POST, path).json(&request),
            decode::decode_chat_reply,
        )
        .await
    }

    /// Checks whether the backend has its model and embeddings loaded.
    ///
    /// A reachable server with a missing component yields `Ok` with a
    /// degraded [`HealthReport`], not an error.
    pub async fn health(&self) -> ApiResult<HealthReport> {
        let path = "/health";
        let report = self
            .call(
                path,
                self.request(Method::GET, path),
                decode::decode_health,
            )
            .await?;
        if !report.is_healthy() {
            warn!(status = ?report.status, "Server is running but some components are not loaded");
        }
        Ok(report)
    }

    /// Fetches the service name and version.
    pub async fn service_info(&self) -> ApiResult<ServiceInfo> {
        let path = "/";
        self.call(
            path,
            self.request(Method::GET, path),
            decode::decode_service_info,
        )
        .await
    }

    /// Fetches the chat history of a user.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Account id
    /// * `limit` - Maximum messages; the server default applies when `None`
    pub async fn chat_history(
        &self,
        user_id: i64,
        limit: Option<u32>,
    ) -> ApiResult<Vec<ChatMessage>> {
        let path = format!("/chat/history/{}", user_id);
        let mut request = self.request(Method::GET, &path);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        self.call(&path, request, decode::decode_history).await
    }

    /// Fetches the chat history and groups it into sessions.
    ///
    /// The server returns the most recent messages first; they are put back
    /// in creation order (ascending id) before segmenting.
    ///
    /// # Errors
    ///
    /// Returns `WardaError::Api` when the fetch fails, or
    /// `WardaError::Segment` when `segmenter` is strict and a timestamp
    /// cannot be parsed.
    pub async fn session_history(
        &self,
        user_id: i64,
        limit: Option<u32>,
        segmenter: &Segmenter,
    ) -> Result<Vec<Session>, WardaError> {
        let mut history = self.chat_history(user_id, limit).await?;
        history.sort_by_key(|message| message.id);
        Ok(segmenter.segment(&history)?)
    }

    /// Fetches the user's current emotional state.
    pub async fn current_state(&self, user_id: i64) -> ApiResult<EmotionalStateSnapshot> {
        let path = format!("/state/current/{}", user_id);
        self.call(
            &path,
            self.request(Method::GET, &path),
            decode::decode_current_state,
        )
        .await
    }

    /// Fetches the emotional timeline for the last `days` days.
    pub async fn timeline(&self, user_id: i64, days: u32) -> ApiResult<EmotionalTimeline> {
        let path = format!("/state/timeline/{}", user_id);
        let request = self
            .request(Method::GET, &path)
            .query(&[("days", days)]);
        self.call(&path, request, decode::decode_timeline).await
    }

    /// Fetches recommendations for the user's current state.
    pub async fn recommendations(&self, user_id: i64) -> ApiResult<Recommendations> {
        let path = format!("/state/recommendations/{}", user_id);
        self.call(
            &path,
            self.request(Method::GET, &path),
            decode::decode_recommendations,
        )
        .await
    }

    /// Fetches insights about emotional patterns over the last `days` days.
    pub async fn insights(&self, user_id: i64, days: u32) -> ApiResult<EmotionalInsights> {
        let path = format!("/state/insights/{}", user_id);
        let request = self
            .request(Method::GET, &path)
            .query(&[("days", days)]);
        self.call(&path, request, decode::decode_insights).await
    }

    /// Fetches the stored account profile.
    pub async fn profile(&self, user_id: i64) -> ApiResult<UserProfile> {
        let path = format!("/auth/profile/{}", user_id);
        self.call(
            &path,
            self.request(Method::GET, &path),
            decode::decode_profile,
        )
        .await
    }

    /// Replaces name, email and phone of an account.
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> ApiResult<UserProfile> {
        let path = format!("/auth/profile/{}", user_id);
        let profile = self
            .call(
                &path,
                self.request(Method::PUT, &path).json(update),
                decode::decode_profile,
            )
            .await?;
        info!(user_id = profile.id, "Updated profile");
        Ok(profile)
    }

    /// Deletes one chat message by id.
    pub async fn delete_message(&self, message_id: i64) -> ApiResult<DeleteResult> {
        let path = format!("/chat/history/{}", message_id);
        self.call(
            &path,
            self.request(Method::DELETE, &path),
            decode::decode_delete,
        )
        .await
    }

    /// Runs a call on the tokio runtime and hands its outcome to `on_complete`.
    ///
    /// Returns immediately. `on_complete` runs exactly once, on a runtime
    /// worker rather than the caller's context, provided the runtime stays
    /// alive until the call finishes. If the runtime shuts down first, the
    /// task is dropped and `on_complete` never runs. There is no
    /// cancellation: dropping the returned handle does not abort the call.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use warda::api::WardaClient;
    /// # use warda::config::ApiConfig;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = WardaClient::new(&ApiConfig::default())?;
    /// client.spawn(
    ///     |c| async move { c.health().await },
    ///     |outcome| match outcome {
    ///         Ok(report) => println!("healthy: {}", report.is_healthy()),
    ///         Err(e) => eprintln!("{}", e),
    ///     },
    /// );
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<T, F, Fut, H>(&self, call: F, on_complete: H) -> JoinHandle<()>
    where
        F: FnOnce(WardaClient) -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
        T: Send + 'static,
        H: FnOnce(ApiResult<T>) + Send + 'static,
    {
        let call = call(self.clone());
        tokio::spawn(async move {
            on_complete(call.await);
        })
    }

    /// Runs a call on the tokio runtime and returns a single-shot receiver
    /// for its outcome.
    ///
    /// If the runtime shuts down before the call finishes, the sender is
    /// dropped and the receiver resolves to `RecvError`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn dispatch<T, F, Fut>(&self, call: F) -> oneshot::Receiver<ApiResult<T>>
    where
        F: FnOnce(WardaClient) -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.spawn(call, move |outcome| {
            if tx.send(outcome).is_err() {
                debug!("Outcome receiver dropped before completion");
            }
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let result = WardaClient::new(&ApiConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ApiConfig::default()
        };
        let client = WardaClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            connect_timeout_seconds: 2,
            request_timeout_seconds: 2,
        };
        let client = WardaClient::new(&config).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(err.is_network(), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn test_dispatch_delivers_network_error_once() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            connect_timeout_seconds: 2,
            request_timeout_seconds: 2,
        };
        let client = WardaClient::new(&config).unwrap();
        let rx = client.dispatch(|c| async move { c.service_info().await });
        let outcome = rx.await.expect("handler should fire");
        assert!(matches!(outcome, Err(ApiError::Network(_))));
    }

    #[test]
    fn test_runtime_shutdown_drops_pending_call_without_handler() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let client = WardaClient::new(&ApiConfig::default()).unwrap();
        let fired = Arc::new(AtomicBool::new(false));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let rx = runtime.block_on(async {
            let flag = Arc::clone(&fired);
            client.spawn(
                |_| std::future::pending::<ApiResult<()>>(),
                move |_| flag.store(true, Ordering::SeqCst),
            );
            client.dispatch(|_| std::future::pending::<ApiResult<()>>())
        });
        drop(runtime);

        assert!(!fired.load(Ordering::SeqCst));
        assert!(rx.blocking_recv().is_err());
    }
}
