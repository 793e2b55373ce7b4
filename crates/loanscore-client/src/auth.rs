//! Account endpoints: login, register, logout, profile and health.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::{ApiClient, ensure_success, read_json};
use crate::config::LoginEncoding;
use crate::error::{ClientError, Result};

/// Credentials posted to `/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful `/login` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// New account details for `/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Account as described by `/register` and `/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub role: Option<String>,
}

fn default_active() -> bool {
    true
}

/// `/health` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    /// Any other fields the service reports.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") && self.model_loaded
    }
}

impl ApiClient {
    /// Exchange credentials for a bearer token and store it.
    ///
    /// Rejected credentials come back as `Api { status: 401, .. }`; this is
    /// not a session expiry because there was no session to expire.
    pub fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let credentials = Credentials { username, password };
        let request = match self.config().login_encoding {
            LoginEncoding::Json => self.post("/login").json(&credentials),
            LoginEncoding::Form => self.post("/login").form(&credentials),
        };
        let response = ensure_success(self.send("/login", request)?)?;
        let token: TokenResponse = read_json(response)?;
        if token.access_token.is_empty() {
            return Err(ClientError::MalformedResponse(
                "login response carried an empty access_token".to_string(),
            ));
        }
        self.session().establish(&token.access_token)?;
        info!(username, "logged in");
        Ok(token)
    }

    /// Create an account. Does not log in.
    pub fn register(&self, request: &RegisterRequest) -> Result<UserProfile> {
        let response = self.send("/register", self.post("/register").json(request))?;
        let profile: UserProfile = read_json(ensure_success(response)?)?;
        info!(username = %profile.username, "account registered");
        Ok(profile)
    }

    /// End the session.
    ///
    /// The server call is best-effort; the local token is cleared whatever
    /// happens. Returns whether the server acknowledged the logout.
    pub fn logout(&self) -> Result<bool> {
        let acknowledged = match self.session().require_auth() {
            Err(_) => false,
            Ok(token) => {
                let request = self.post("/logout").bearer_auth(token);
                match self.send("/logout", request).and_then(ensure_success) {
                    Ok(_) => true,
                    Err(err) => {
                        warn!(error = %err, "server logout failed, clearing local session");
                        false
                    }
                }
            }
        };
        self.session().end()?;
        Ok(acknowledged)
    }

    /// Fetch the logged-in user's profile and remember their role.
    pub fn me(&self) -> Result<UserProfile> {
        let response = self.send_authenticated("/users/me", self.get("/users/me"))?;
        let profile: UserProfile = read_json(ensure_success(response)?)?;
        if let Some(role) = profile.role.as_deref() {
            self.session().record_role(Some(role))?;
        }
        Ok(profile)
    }

    /// Query service health. Needs no session.
    pub fn health(&self) -> Result<HealthStatus> {
        let response = self.send("/health", self.get("/health"))?;
        read_json(ensure_success(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parses_naive_timestamp() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 7, "username": "lan", "email": "lan@example.com",
                "full_name": null, "is_active": true,
                "created_at": "2025-03-01T08:30:00.123456"}"#,
        )
        .expect("parse profile");
        assert_eq!(profile.id, 7);
        assert_eq!(profile.full_name, None);
        assert_eq!(profile.role, None);
        assert_eq!(profile.created_at.to_string(), "2025-03-01 08:30:00.123456");
    }

    #[test]
    fn health_keeps_extra_fields() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "model_loaded": true, "version": "1.0"}"#,
        )
        .expect("parse health");
        assert!(health.is_healthy());
        assert_eq!(health.extra["version"], "1.0");
    }

    #[test]
    fn register_omits_missing_full_name() {
        let request = RegisterRequest {
            username: "lan".to_string(),
            email: "lan@example.com".to_string(),
            password: "secret".to_string(),
            full_name: None,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json.get("full_name").is_none());
    }
}
