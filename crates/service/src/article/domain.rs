use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i32,
    pub student_id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub published_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticleInput {
    pub student_id: i32,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub published_at: Option<NaiveDate>,
}

impl From<models::article::Model> for Article {
    fn from(m: models::article::Model) -> Self {
        Self { id: m.id, student_id: m.student_id, title: m.title, summary: m.summary, published_at: m.published_at }
    }
}
