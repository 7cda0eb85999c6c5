use crate::error::ApiError;
use crate::identity::CurrentUser;
use crate::state::SharedState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use toku_core::links::personal_meeting_id;
use toku_token::ErrorKind;

/// Characters of a probe token echoed back by the self-test.
const TOKEN_PREVIEW_LEN: usize = 10;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LinkQuery {
    #[serde(default)]
    pub personal: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonalRoomResponse {
    pub meeting_id: String,
    pub link: String,
}

pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "toku-server" }))
}

/// Mint an access token for the signed-in user.
pub async fn issue_token(
    State(state): State<SharedState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.issuer.issue(principal.as_ref())?;
    Ok(Json(TokenResponse { token }))
}

/// Report whether both credentials are configured, without exposing them.
pub async fn check_stream_config(State(state): State<SharedState>) -> Response {
    let status = state.credential_status();

    if !status.config_complete {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "Stream configuration incomplete",
                "details": status,
            })),
        )
            .into_response();
    }

    Json(json!({
        "status": "success",
        "message": "Stream configuration is complete",
        "details": status,
    }))
    .into_response()
}

/// Check that the configured credentials can sign a token.
pub async fn stream_test(State(state): State<SharedState>) -> Response {
    tracing::info!("testing Stream credentials");

    match state.issuer.probe() {
        Ok(token) => {
            let preview: String = token.chars().take(TOKEN_PREVIEW_LEN).collect();
            Json(json!({
                "status": "success",
                "message": "Stream credentials are valid",
                "tokenPreview": format!("{preview}..."),
            }))
            .into_response()
        }
        Err(err) if err.kind() == ErrorKind::Configuration => {
            let status = state.credential_status();
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "status": "error",
                    "message": "Stream API credentials missing",
                    "details": {
                        "apiKeyExists": status.api_key_exists,
                        "secretKeyExists": status.api_secret_exists,
                    },
                })),
            )
                .into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "Failed to initialize Stream client",
                "error": err.to_string(),
            })),
        )
            .into_response(),
    }
}

/// Shareable link for a meeting.
pub async fn meeting_link(
    State(state): State<SharedState>,
    Path(meeting_id): Path<String>,
    Query(query): Query<LinkQuery>,
) -> Json<LinkResponse> {
    let url = if query.personal {
        state.links.personal_room_url(&meeting_id)
    } else {
        state.links.meeting_url(&meeting_id)
    };
    Json(LinkResponse { url })
}

/// Personal room id and link for the signed-in user.
pub async fn personal_room(
    State(state): State<SharedState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<PersonalRoomResponse>, ApiError> {
    let principal = principal
        .filter(|p| p.is_valid())
        .ok_or(ApiError::Unauthenticated)?;

    Ok(Json(PersonalRoomResponse {
        meeting_id: personal_meeting_id(&principal.id),
        link: state.links.personal_room_url(&principal.id),
    }))
}
