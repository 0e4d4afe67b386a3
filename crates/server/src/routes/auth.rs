//! Auth route stubs.
//!
//! Authentication lives with an external provider; these endpoints exist so
//! the client's `/login` path resolves and points back at the explore view.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Login prompt view model.
#[derive(Debug, Serialize)]
pub struct LoginPrompt {
    pub prompt: &'static str,
}

/// Login request body. Credentials are not inspected here.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Login result view model.
#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub authenticated: bool,
    pub redirect: &'static str,
}

/// Display the login prompt.
pub async fn login_page() -> Json<LoginPrompt> {
    Json(LoginPrompt {
        prompt: "Sign in to start collecting NFTs near you",
    })
}

/// Simulated login: always succeeds and sends the client to explore.
pub async fn login(Json(_request): Json<LoginRequest>) -> Json<LoginResult> {
    Json(LoginResult {
        authenticated: true,
        redirect: "/explore",
    })
}
