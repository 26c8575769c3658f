//! Request extractors for authenticated callers.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{error, warn};

use super::{error::ApiError, state::SharedState};
use crate::auth::{bearer_token, Identity};
use crate::models::Role;


/// Any caller holding a valid bearer token.
pub struct AuthUser(pub Identity);


/// A caller holding a valid bearer token whose email is on the editor list.
pub struct EditorUser(pub Identity);


fn authenticate(parts: &Parts, state: &SharedState) -> Result<Identity, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header)?;

    state.verifier.verify(token).map_err(|err| {
        warn!("Rejected bearer token: {err}");
        ApiError::from(err)
    })
}


/// Look up the caller's role. Storage failures deny access.
pub async fn resolve_role(state: &SharedState, identity: &Identity) -> Result<Role, ApiError> {
    let Some(email) = identity.email.clone() else {
        return Ok(Role::Viewer);
    };

    match state.with_db(move |db| db.is_editor(&email)).await {
        Ok(true) => Ok(Role::Editor),
        Ok(false) => Ok(Role::Viewer),
        Err(ApiError::Internal(err)) => {
            error!("Role check failed for uid {}: {err:#}", identity.uid);
            Err(ApiError::Internal(err.context("role check failed")))
        }
        Err(err) => Err(err),
    }
}


impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(AuthUser)
    }
}


impl FromRequestParts<SharedState> for EditorUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)?;

        if !resolve_role(state, &identity).await?.can_write() {
            warn!(
                "Denied {} {} for non-editor uid {}",
                parts.method, parts.uri, identity.uid
            );
            return Err(ApiError::Forbidden);
        }

        Ok(EditorUser(identity))
    }
}
