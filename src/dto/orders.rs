use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::listing::{SortColumn, SortDirection};
use crate::models::{Note, OrderSummary};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub order_number: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub device_type: String,
    pub device_brand: Option<String>,
    pub device_model: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    /// Defaults to the first registry stage when omitted.
    pub status_id: Option<Uuid>,
    /// Defaults to "Media" when omitted.
    pub priority_id: Option<Uuid>,
    /// Defaults to today when omitted.
    pub received_date: Option<NaiveDate>,
    pub estimated_delivery: Option<NaiveDate>,
}

/// Partial edit of contact/device fields. Status, priority and order number
/// are never touched through this payload; they have their own endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
    pub device_model: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePriorityRequest {
    pub priority_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub search: Option<String>,
    pub status_id: Option<Uuid>,
    pub priority_id: Option<Uuid>,
    pub sort_by: Option<SortColumn>,
    pub sort_order: Option<SortDirection>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order: OrderSummary,
    pub notes: Vec<Note>,
}
