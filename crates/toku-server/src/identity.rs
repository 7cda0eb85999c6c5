//! Resolution of the signed-in principal from request headers.
//!
//! The service sits behind the identity provider's gateway, which
//! authenticates the browser session and forwards the user id in a trusted
//! header. That header is the only source of identity: anything a client
//! can set on its own, such as `Authorization`, is ignored.

use crate::state::SharedState;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use std::convert::Infallible;
use toku_core::Principal;

/// The principal behind a request, if any.
///
/// Extraction never fails: an anonymous request yields `CurrentUser(None)`
/// so the handler decides how to report it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Principal>);

impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(principal_from_headers(
            &parts.headers,
            state.identity_header(),
        )))
    }
}

pub fn principal_from_headers(headers: &HeaderMap, identity_header: &str) -> Option<Principal> {
    headers
        .get(identity_header)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(Principal::new)
}
