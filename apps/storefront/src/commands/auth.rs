//! # Auth Commands
//!
//! Sign-in and registration against the simulated backend. Forms are
//! validated here first; only valid forms reach the backend, which then
//! succeeds after its configured delay.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use vitrine_core::account::{LoginForm, PasswordStrength, RegistrationForm};
use vitrine_session::AuthSession;

use crate::commands::shopper;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Session to attach the account to, if any.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(flatten)]
    pub form: LoginForm,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(flatten)]
    pub form: RegistrationForm,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrengthRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthResponse {
    #[serde(flatten)]
    pub strength: PasswordStrength,
}

async fn attach(
    state: &AppState,
    session_id: Option<Uuid>,
    account: &AuthSession,
) -> ApiResult<()> {
    if let Some(sid) = session_id {
        shopper(state, sid).await?.sign_in(account.clone());
    }
    Ok(())
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthSession>> {
    debug!(email = %request.form.email, "login command");
    request.form.validate()?;

    let account = state.backend().login(request.form).await?;
    attach(&state, request.session_id, &account).await?;
    Ok(Json(account))
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<AuthSession>> {
    debug!(email = %request.form.email, "register command");
    request.form.validate()?;

    let account = state.backend().register(request.form).await?;
    attach(&state, request.session_id, &account).await?;
    Ok(Json(account))
}

/// `POST /api/sessions/{sid}/sign-out`
///
/// Signing out of a session that was never signed in is not an error.
pub async fn sign_out(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let session = shopper(&state, sid).await?;
    if let Some(account) = session.sign_out() {
        debug!(session = %sid, user_id = %account.user_id, "Session signed out");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/auth/password-strength`
pub async fn password_strength(Json(request): Json<StrengthRequest>) -> Json<StrengthResponse> {
    Json(StrengthResponse {
        strength: PasswordStrength::of(&request.password),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::session::create_session;
    use crate::commands::test_support::instant_state;
    use crate::error::ErrorCode;
    use vitrine_core::account::StrengthLabel;

    fn login_form(password: &str) -> LoginForm {
        LoginForm {
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            remember_me: false,
        }
    }

    #[tokio::test]
    async fn test_login_attaches_account() {
        let state = instant_state();
        let (_, Json(created)) = create_session(State(state.clone())).await;

        let Json(account) = login(
            State(state.clone()),
            Json(LoginRequest {
                session_id: Some(created.session_id),
                form: login_form("secret"),
            }),
        )
        .await
        .unwrap();
        assert_eq!(account.email, "ada@example.com");

        let session = state.sessions().get(created.session_id).await.unwrap();
        assert_eq!(session.account(), Some(account));

        let status = sign_out(State(state), Path(created.session_id)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(session.account().is_none());
    }

    #[tokio::test]
    async fn test_login_without_password_rejected() {
        let state = instant_state();
        let err = login(
            State(state),
            Json(LoginRequest {
                session_id: None,
                form: login_form(""),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_register_requires_terms() {
        let state = instant_state();
        let form = RegistrationForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Engine#1843".to_string(),
            confirm_password: "Engine#1843".to_string(),
            accept_terms: false,
        };
        let err = register(
            State(state),
            Json(RegisterRequest {
                session_id: None,
                form,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("acceptTerms"));
    }

    #[tokio::test]
    async fn test_password_strength() {
        let Json(response) = password_strength(Json(StrengthRequest {
            password: "Abcdef1!".to_string(),
        }))
        .await;
        assert_eq!(response.strength.label, StrengthLabel::Strong);
    }

    #[test]
    fn test_login_request_wire_format() {
        let request: LoginRequest = serde_json::from_str(
            r#"{"email": "ada@example.com", "password": "pw", "rememberMe": true}"#,
        )
        .unwrap();
        assert!(request.session_id.is_none());
        assert!(request.form.remember_me);
    }
}
