//! Warda backend API
//!
//! - [`client`]: issues one HTTP exchange per call and classifies the outcome
//! - [`decode`]: per-endpoint decoding rules turning 2xx bodies into domain values
//! - [`types`]: domain values and request bodies

pub mod client;
pub mod decode;
pub mod types;

pub use client::WardaClient;
pub use types::{
    AuthResult, ChatMessage, ChatRequest, DeleteResult, EmotionalInsights,
    EmotionalStateSnapshot, HealthReport, HealthStatus, Insight, LoginRequest, ProfileUpdate,
    Recommendations, RegisterRequest, ResetPasswordRequest, ServiceInfo, Trend, UserContext,
    UserProfile,
};
