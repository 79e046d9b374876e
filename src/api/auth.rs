use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;

use crate::store::PrincipalResolver;
use crate::AppState;

/// The caller, as resolved from `Authorization: Bearer <session token>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// No token, or a token with no live session.
    Anonymous,
    User(String),
    /// The session store could not be reached.
    Unresolved(String),
}

impl Principal {
    pub async fn from_headers(headers: &HeaderMap, resolver: &dyn PrincipalResolver) -> Self {
        let Some(token) = bearer_token(headers) else {
            return Principal::Anonymous;
        };

        match resolver.resolve(token).await {
            Ok(Some(user_id)) => Principal::User(user_id),
            Ok(None) => Principal::Anonymous,
            Err(e) => {
                tracing::warn!(error = %e, "Principal lookup failed");
                Principal::Unresolved(e.to_string())
            }
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Principal::User(id) => Some(id),
            _ => None,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Principal::from_headers(&parts.headers, state.principals.as_ref()).await)
    }
}
