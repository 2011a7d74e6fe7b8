use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisor {
    pub id: i32,
    pub name: String,
    pub tax_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdvisorInput {
    pub name: String,
    pub tax_id: String,
}

impl From<models::advisor::Model> for Advisor {
    fn from(m: models::advisor::Model) -> Self { Self { id: m.id, name: m.name, tax_id: m.tax_id } }
}
