use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use service::article::domain::{Article, CreateArticleInput};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(post, path = "/v1/articles", tag = "articles", request_body = crate::openapi::CreateArticleRequest, responses((status = 201, description = "Article created"), (status = 404, description = "Student not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateArticleInput>,
) -> Result<(StatusCode, Json<Article>), JsonApiError> {
    let created = state.services.articles.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/v1/articles", tag = "articles", responses((status = 200, description = "All articles")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Article>>, JsonApiError> {
    Ok(Json(state.services.articles.find_all().await?))
}

#[utoipa::path(get, path = "/v1/articles/{id}", tag = "articles", params(("id" = i32, Path, description = "Article id")), responses((status = 200, description = "Article"), (status = 404, description = "Article not found")))]
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Article>, JsonApiError> {
    Ok(Json(state.services.articles.find_one_by_id(id).await?))
}

#[utoipa::path(get, path = "/v1/articles/student/{student_id}", tag = "articles", params(("student_id" = i32, Path, description = "Owning student id")), responses((status = 200, description = "Articles of the student")))]
pub async fn by_student(
    State(state): State<ServerState>,
    Path(student_id): Path<i32>,
) -> Result<Json<Vec<Article>>, JsonApiError> {
    Ok(Json(state.services.articles.find_by_student(student_id).await?))
}

#[utoipa::path(delete, path = "/v1/articles/{id}", tag = "articles", params(("id" = i32, Path, description = "Article id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Article not found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    state.services.articles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
