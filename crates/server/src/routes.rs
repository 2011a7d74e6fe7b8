use axum::{
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod advisors;
pub mod articles;
pub mod auth;
pub mod password_recovery;
pub mod scholarships;
pub mod students;

use auth::{require_bearer_token_state, ServerState};

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router. Access control is a single global
/// middleware; see [`auth::is_public`] for the routes it lets through.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let auth_routes: Router<ServerState> = Router::new()
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/auth/logout", post(auth::logout))
        .route("/v1/auth/me", get(auth::me))
        .route("/v1/password-recovery/request", post(password_recovery::request))
        .route("/v1/password-recovery/reset", post(password_recovery::reset));

    let student_routes: Router<ServerState> = Router::new()
        .route("/v1/students", post(students::create).get(students::list).put(students::update))
        .route("/v1/students/paginate", get(students::paginate))
        .route("/v1/students/password", patch(students::update_password))
        .route("/v1/students/course/:course", get(students::by_course))
        .route("/v1/students/email/:email", get(students::by_email))
        .route("/v1/students/advisor/:advisor_id", get(students::by_advisor))
        .route("/v1/students/:id", get(students::get_by_id));

    let catalog: Router<ServerState> = Router::new()
        .route("/v1/scholarships", post(scholarships::create).get(scholarships::list))
        .route("/v1/scholarships/:id", get(scholarships::get_by_id))
        .route("/v1/advisors", post(advisors::create).get(advisors::list))
        .route("/v1/advisors/:id", get(advisors::get_by_id))
        .route("/v1/articles", post(articles::create).get(articles::list))
        .route("/v1/articles/student/:student_id", get(articles::by_student))
        .route("/v1/articles/:id", get(articles::get_by_id).delete(articles::delete));

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes)
        .merge(student_routes)
        .merge(catalog)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // unmatched paths fall through to the 404 fallback without auth
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token_state))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and transport failures
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
