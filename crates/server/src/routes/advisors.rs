use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use service::advisor::domain::{Advisor, CreateAdvisorInput};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(post, path = "/v1/advisors", tag = "advisors", request_body = crate::openapi::CreateAdvisorRequest, responses((status = 201, description = "Advisor created"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateAdvisorInput>,
) -> Result<(StatusCode, Json<Advisor>), JsonApiError> {
    let created = state.services.advisors.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/v1/advisors", tag = "advisors", responses((status = 200, description = "All advisors")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Advisor>>, JsonApiError> {
    Ok(Json(state.services.advisors.find_all().await?))
}

#[utoipa::path(get, path = "/v1/advisors/{id}", tag = "advisors", params(("id" = i32, Path, description = "Advisor id")), responses((status = 200, description = "Advisor"), (status = 404, description = "Advisor not found")))]
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Advisor>, JsonApiError> {
    Ok(Json(state.services.advisors.find_one_by_id(id).await?))
}
