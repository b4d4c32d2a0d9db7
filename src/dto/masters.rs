use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Priority, Status};

/// Single source of truth for valid status/priority values and their labels.
#[derive(Debug, Serialize, ToSchema)]
pub struct MasterData {
    pub statuses: Vec<Status>,
    pub priorities: Vec<Priority>,
}
