use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored lead. Rows are only ever inserted.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub ip: String,
    pub name: String,
    pub company: String,
    pub role: Option<String>,
    pub email: String,
    pub system: Option<String>,
    pub workflow: String,
    pub user_agent: Option<String>,
}

/// A submission that passed validation, trimmed and ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub name: String,
    pub company: String,
    pub role: Option<String>,
    pub email: String,
    pub system: Option<String>,
    pub workflow: String,
}
