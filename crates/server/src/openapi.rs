use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBody { pub error: String, pub message: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub enrollment_number: String,
    pub course: String,
    /// at least 8 characters
    pub password: String,
    pub advisor_id: i32,
    /// YYYY-MM-DD, must be before `scholarship_ends_at`
    pub scholarship_starts_at: String,
    pub scholarship_ends_at: String,
}

#[derive(ToSchema)]
pub struct UpdateStudentRequest {
    /// identifies the student, not updatable
    pub tax_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub enrollment_number: Option<String>,
    pub course: Option<String>,
    pub password: Option<String>,
    pub advisor_id: Option<i32>,
}

#[derive(ToSchema)]
pub struct UpdatePasswordRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct CreateAdvisorRequest { pub name: String, pub tax_id: String }

#[derive(ToSchema)]
pub struct CreateScholarshipRequest {
    pub student_id: i32,
    pub scholarship_starts_at: String,
    pub scholarship_ends_at: String,
}

#[derive(ToSchema)]
pub struct CreateArticleRequest {
    pub student_id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub published_at: Option<String>,
}

#[derive(ToSchema)]
pub struct RecoveryRequest { pub email: String }

#[derive(ToSchema)]
pub struct ResetRequest { pub token: String, pub password: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::password_recovery::request,
        crate::routes::password_recovery::reset,
        crate::routes::students::create,
        crate::routes::students::list,
        crate::routes::students::paginate,
        crate::routes::students::get_by_id,
        crate::routes::students::by_course,
        crate::routes::students::by_email,
        crate::routes::students::by_advisor,
        crate::routes::students::update,
        crate::routes::students::update_password,
        crate::routes::scholarships::create,
        crate::routes::scholarships::list,
        crate::routes::scholarships::get_by_id,
        crate::routes::advisors::create,
        crate::routes::advisors::list,
        crate::routes::advisors::get_by_id,
        crate::routes::articles::create,
        crate::routes::articles::list,
        crate::routes::articles::get_by_id,
        crate::routes::articles::by_student,
        crate::routes::articles::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            LoginRequest,
            CreateStudentRequest,
            UpdateStudentRequest,
            UpdatePasswordRequest,
            CreateAdvisorRequest,
            CreateScholarshipRequest,
            CreateArticleRequest,
            RecoveryRequest,
            ResetRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "password-recovery"),
        (name = "students"),
        (name = "scholarships"),
        (name = "advisors"),
        (name = "articles")
    )
)]
pub struct ApiDoc;
