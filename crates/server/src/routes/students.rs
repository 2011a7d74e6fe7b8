use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use common::types::Message;
use service::auth::domain::Claims;
use service::pagination::{Page, Pagination};
use service::student::domain::{CreateStudentInput, StudentResponse, UpdatePasswordInput, UpdateStudentInput};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let d = Pagination::default();
        Pagination { page: q.page.unwrap_or(d.page), per_page: q.limit.unwrap_or(d.per_page) }
    }
}

/// The caller's own row; a token whose subject no longer exists is rejected.
async fn caller(state: &ServerState, claims: &Claims) -> Result<StudentResponse, JsonApiError> {
    let id = claims.student_id().ok_or_else(|| JsonApiError::unauthorized("invalid or expired token"))?;
    match state.services.students.find_by_id(id).await {
        Ok(s) => Ok(s),
        Err(service::errors::ServiceError::NotFound(_)) => Err(JsonApiError::unauthorized("invalid or expired token")),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(post, path = "/v1/students", tag = "students", request_body = crate::openapi::CreateStudentRequest, responses((status = 201, description = "Student and scholarship created"), (status = 400, description = "Validation failed"), (status = 404, description = "Advisor not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateStudentInput>,
) -> Result<(StatusCode, Json<StudentResponse>), JsonApiError> {
    let created = state.services.students.create_student(input).await?;
    info!(student_id = created.id, "student registered via api");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/v1/students", tag = "students", responses((status = 200, description = "All students")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<StudentResponse>>, JsonApiError> {
    Ok(Json(state.services.students.find_all_students().await?))
}

#[utoipa::path(get, path = "/v1/students/paginate", tag = "students", params(("page" = Option<u32>, Query, description = "1-based page"), ("limit" = Option<u32>, Query, description = "Items per page (1..=100)")), responses((status = 200, description = "One page of students")))]
pub async fn paginate(
    State(state): State<ServerState>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Page<StudentResponse>>, JsonApiError> {
    Ok(Json(state.services.students.find_all_students_paginated(q.into()).await?))
}

#[utoipa::path(get, path = "/v1/students/{id}", tag = "students", params(("id" = i32, Path, description = "Student id")), responses((status = 200, description = "Student"), (status = 404, description = "Student not found")))]
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<StudentResponse>, JsonApiError> {
    Ok(Json(state.services.students.find_by_id(id).await?))
}

#[utoipa::path(get, path = "/v1/students/course/{course}", tag = "students", params(("course" = String, Path, description = "Case-insensitive course fragment")), responses((status = 200, description = "Matching students")))]
pub async fn by_course(
    State(state): State<ServerState>,
    Path(course): Path<String>,
) -> Result<Json<Vec<StudentResponse>>, JsonApiError> {
    Ok(Json(state.services.students.find_by_course(&course).await?))
}

#[utoipa::path(get, path = "/v1/students/email/{email}", tag = "students", params(("email" = String, Path, description = "Student email")), responses((status = 200, description = "Student"), (status = 404, description = "Student not found")))]
pub async fn by_email(State(state): State<ServerState>, Path(email): Path<String>) -> Result<Json<StudentResponse>, JsonApiError> {
    Ok(Json(state.services.students.find_by_email(&email).await?))
}

#[utoipa::path(get, path = "/v1/students/advisor/{advisor_id}", tag = "students", params(("advisor_id" = i32, Path, description = "Advisor id")), responses((status = 200, description = "Students supervised by the advisor")))]
pub async fn by_advisor(
    State(state): State<ServerState>,
    Path(advisor_id): Path<i32>,
) -> Result<Json<Vec<StudentResponse>>, JsonApiError> {
    Ok(Json(state.services.students.find_by_advisor_id(advisor_id).await?))
}

#[utoipa::path(put, path = "/v1/students", tag = "students", request_body = crate::openapi::UpdateStudentRequest, responses((status = 200, description = "Updated student"), (status = 403, description = "Not the caller's record"), (status = 404, description = "Student not found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<UpdateStudentInput>,
) -> Result<Json<StudentResponse>, JsonApiError> {
    let me = caller(&state, &claims).await?;
    if me.tax_id != input.tax_id {
        warn!(student_id = me.id, "update of another student's record refused");
        return Err(JsonApiError::forbidden("students may only update their own record"));
    }
    Ok(Json(state.services.students.update_student(input).await?))
}

#[utoipa::path(patch, path = "/v1/students/password", tag = "students", request_body = crate::openapi::UpdatePasswordRequest, responses((status = 200, description = "Password changed"), (status = 403, description = "Not the caller's account"), (status = 404, description = "Student not found")))]
pub async fn update_password(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<UpdatePasswordInput>,
) -> Result<Json<Message>, JsonApiError> {
    let me = caller(&state, &claims).await?;
    if me.email != input.email {
        warn!(student_id = me.id, "password change for another account refused");
        return Err(JsonApiError::forbidden("students may only change their own password"));
    }
    state.services.students.update_password(input).await?;
    Ok(Json(Message::new("Password updated")))
}
