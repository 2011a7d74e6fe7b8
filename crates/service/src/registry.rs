//! Wiring: repository bundles for each backend and the service graph built on top.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::advisor::repository::{AdvisorRepository, SeaOrmAdvisorRepository};
use crate::advisor::service::AdvisorService;
use crate::article::repository::{ArticleRepository, SeaOrmArticleRepository};
use crate::article::service::ArticleService;
use crate::auth::service::{AuthConfig, AuthService};
use crate::mock::InMemoryStore;
use crate::password_recovery::notifier::{LogNotifier, RecoveryNotifier};
use crate::password_recovery::repository::{RecoveryTokenRepository, SeaOrmRecoveryTokenRepository};
use crate::password_recovery::service::PasswordRecoveryService;
use crate::scholarship::repository::{ScholarshipRepository, SeaOrmScholarshipRepository};
use crate::scholarship::service::ScholarshipService;
use crate::student::repo::seaorm::SeaOrmStudentRepository;
use crate::student::repository::StudentRepository;
use crate::student::service::StudentService;

#[derive(Clone)]
pub struct Repositories {
    pub advisors: Arc<dyn AdvisorRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub scholarships: Arc<dyn ScholarshipRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub recovery_tokens: Arc<dyn RecoveryTokenRepository>,
    pub notifier: Arc<dyn RecoveryNotifier>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool; recovery tokens go to the log.
    pub fn seaorm(db: DatabaseConnection) -> Self {
        Self {
            advisors: Arc::new(SeaOrmAdvisorRepository { db: db.clone() }),
            students: Arc::new(SeaOrmStudentRepository { db: db.clone() }),
            scholarships: Arc::new(SeaOrmScholarshipRepository { db: db.clone() }),
            articles: Arc::new(SeaOrmArticleRepository { db: db.clone() }),
            recovery_tokens: Arc::new(SeaOrmRecoveryTokenRepository { db }),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>, notifier: Arc<dyn RecoveryNotifier>) -> Self {
        Self {
            advisors: store.clone(),
            students: store.clone(),
            scholarships: store.clone(),
            articles: store.clone(),
            recovery_tokens: store,
            notifier,
        }
    }
}

#[derive(Clone)]
pub struct ServicesConfig {
    pub auth: AuthConfig,
    pub recovery_ttl: chrono::Duration,
}

impl Default for ServicesConfig {
    fn default() -> Self { Self { auth: AuthConfig::default(), recovery_ttl: chrono::Duration::minutes(30) } }
}

impl From<&configs::AppConfig> for ServicesConfig {
    fn from(c: &configs::AppConfig) -> Self {
        Self {
            auth: AuthConfig { jwt_secret: c.auth.jwt_secret.clone(), token_ttl_hours: c.auth.token_ttl_hours },
            recovery_ttl: chrono::Duration::minutes(c.recovery.token_ttl_minutes),
        }
    }
}

#[derive(Clone)]
pub struct Services {
    pub advisors: Arc<AdvisorService>,
    pub scholarships: Arc<ScholarshipService>,
    pub students: Arc<StudentService>,
    pub articles: Arc<ArticleService>,
    pub auth: Arc<AuthService>,
    pub recovery: Arc<PasswordRecoveryService>,
}

impl Services {
    pub fn new(repos: Repositories, cfg: ServicesConfig) -> Self {
        let advisors = Arc::new(AdvisorService::new(repos.advisors));
        let scholarships = Arc::new(ScholarshipService::new(repos.scholarships));
        let students = Arc::new(StudentService::new(repos.students.clone(), advisors.clone(), scholarships.clone()));
        let articles = Arc::new(ArticleService::new(repos.articles));
        let auth = Arc::new(AuthService::new(repos.students.clone(), cfg.auth));
        let recovery = Arc::new(PasswordRecoveryService::new(
            repos.recovery_tokens,
            repos.students,
            students.clone(),
            repos.notifier,
            cfg.recovery_ttl,
        ));
        Self { advisors, scholarships, students, articles, auth, recovery }
    }
}
