use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub currency: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub signup_ip: String,
    pub created_at: DateTime<Utc>,
}
