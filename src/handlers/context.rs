use crate::models::timer_session::Identity;
use crate::services::errors::QuestionnaireError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Carries the questionnaire session key.
pub const SESSION_HEADER: &str = "x-session-id";
/// Set by the upstream auth layer for signed-in users.
pub const USER_HEADER: &str = "x-user-id";

/// Who is calling, taken from request headers. Never rejects a request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session_id: Option<String>,
    pub identity: Identity,
}

impl RequestContext {
    pub fn require_session(&self) -> Result<&str, QuestionnaireError> {
        self.session_id
            .as_deref()
            .ok_or(QuestionnaireError::SessionExpired)
    }

    /// The caller's session id, or a fresh one when none was sent.
    pub fn session_or_new(&self) -> String {
        self.session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            session_id: header(SESSION_HEADER),
            identity: Identity::from_header(header(USER_HEADER).as_deref()),
        })
    }
}
