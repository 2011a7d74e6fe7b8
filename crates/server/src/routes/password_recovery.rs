use axum::{extract::State, Json};

use common::types::Message;
use service::password_recovery::domain::{PasswordRecoveryRequest, PasswordResetInput};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(post, path = "/v1/password-recovery/request", tag = "password-recovery", request_body = crate::openapi::RecoveryRequest, responses((status = 200, description = "Same acknowledgement whether or not the email exists")))]
pub async fn request(
    State(state): State<ServerState>,
    Json(input): Json<PasswordRecoveryRequest>,
) -> Result<Json<Message>, JsonApiError> {
    Ok(Json(state.services.recovery.request_password_recovery(input).await?))
}

#[utoipa::path(post, path = "/v1/password-recovery/reset", tag = "password-recovery", request_body = crate::openapi::ResetRequest, responses((status = 200, description = "Password updated"), (status = 400, description = "Invalid or expired recovery token")))]
pub async fn reset(
    State(state): State<ServerState>,
    Json(input): Json<PasswordResetInput>,
) -> Result<Json<Message>, JsonApiError> {
    Ok(Json(state.services.recovery.reset_password(input).await?))
}
