use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-stage order count, carrying the presentation hints so the console can
/// render tiles without a second lookup.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCount {
    pub status_id: Uuid,
    pub status_name: String,
    pub count: i64,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentOrder {
    pub order_number: String,
    pub client_name: String,
    pub device_type: String,
    pub status_name: String,
    pub days_in_system: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_orders: i64,
    pub by_status: Vec<StatusCount>,
    pub recent: Vec<RecentOrder>,
}
