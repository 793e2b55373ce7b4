//! Blocking client for the loan scoring service.
//!
//! [`ApiClient`] wraps the prediction, evaluation and account endpoints. Every
//! authenticated call goes through a [`SessionGuard`], which owns the single
//! bearer-token slot: it refuses to send when no token is stored and clears
//! the slot when the service answers 401.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod scoring;
pub mod session;

pub use auth::{Credentials, HealthStatus, RegisterRequest, TokenResponse, UserProfile};
pub use client::{ApiClient, extract_detail};
pub use config::{
    API_URL_ENV_VAR, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, LoginEncoding,
    TIMEOUT_ENV_VAR,
};
pub use error::{ClientError, Result};
pub use evaluate::{EvaluationReport, ModelKind, ModelMetrics};
pub use session::{
    FileTokenStore, MemoryTokenStore, SESSION_FILE_ENV_VAR, SessionContext, SessionGuard,
    StoredSession, default_session_path,
};
