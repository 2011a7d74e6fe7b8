use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use service::scholarship::domain::{CreateScholarshipInput, Scholarship, ScholarshipResponse};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(post, path = "/v1/scholarships", tag = "scholarships", request_body = crate::openapi::CreateScholarshipRequest, responses((status = 201, description = "Scholarship created"), (status = 400, description = "Invalid window or duplicate"), (status = 404, description = "Student not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateScholarshipInput>,
) -> Result<(StatusCode, Json<Scholarship>), JsonApiError> {
    let created = state.services.scholarships.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/v1/scholarships", tag = "scholarships", responses((status = 200, description = "Scholarships with owning student")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ScholarshipResponse>>, JsonApiError> {
    Ok(Json(state.services.scholarships.find_all().await?))
}

#[utoipa::path(get, path = "/v1/scholarships/{id}", tag = "scholarships", params(("id" = i32, Path, description = "Scholarship id")), responses((status = 200, description = "Scholarship"), (status = 404, description = "Scholarship not found")))]
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<ScholarshipResponse>, JsonApiError> {
    Ok(Json(state.services.scholarships.find_one_by_id(id).await?))
}
