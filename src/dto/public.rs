use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::timeline::Timeline;

/// Reduced field set for the anonymous tracking page: no internal ids, no
/// client contact data, no notes.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicOrder {
    pub order_number: String,
    pub status_name: String,
    pub received_date: NaiveDate,
    pub estimated_delivery: Option<NaiveDate>,
    pub device_type: String,
    pub device_brand: Option<String>,
    pub device_model: Option<String>,
    pub description: Option<String>,
    pub timeline: Timeline,
}
