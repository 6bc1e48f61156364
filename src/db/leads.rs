use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{Lead, NewLead};

/// Append a lead. The id comes from the `AUTOINCREMENT` column inside the
/// insert, so concurrent writers never share or reuse one.
pub async fn create(
    pool: &SqlitePool,
    lead: &NewLead,
    ip: &str,
    user_agent: Option<&str>,
    created_at: DateTime<Utc>,
) -> Result<Lead, sqlx::Error> {
    sqlx::query_as::<_, Lead>(
        "INSERT INTO leads (created_at, ip, name, company, role, email, system, workflow, user_agent)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(created_at)
    .bind(ip)
    .bind(&lead.name)
    .bind(&lead.company)
    .bind(lead.role.as_deref())
    .bind(&lead.email)
    .bind(lead.system.as_deref())
    .bind(&lead.workflow)
    .bind(user_agent)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Lead>, sqlx::Error> {
    sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
