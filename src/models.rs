use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

/// Registry entry for a workshop stage. `position` defines the canonical
/// forward progression used by the public timeline.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Status {
    pub id: Uuid,
    pub name: String,
    pub position: i32,
}

/// Registry entry for an urgency level. `rank` orders Alta > Media > Baja.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Priority {
    pub id: Uuid,
    pub name: String,
    pub rank: i32,
}

/// An order row joined with its resolved status/priority display names.
///
/// `status_name` and `priority_name` come from a LEFT JOIN against the
/// registry so a dangling reference renders a fallback label instead of
/// dropping the row. `time_since_created` is filled in by the service after
/// the fetch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_number: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub device_type: String,
    pub device_brand: Option<String>,
    pub device_model: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub status_id: Uuid,
    pub status_name: String,
    pub priority_id: Uuid,
    pub priority_name: String,
    pub priority_rank: i32,
    pub received_date: NaiveDate,
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    pub time_since_created: String,
}

/// Free-text log entry attached to an order. Never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Note {
    pub id: Uuid,
    pub order_id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub created_at_display: String,
}
