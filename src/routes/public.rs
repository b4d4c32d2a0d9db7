use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    db::DbPool,
    dto::public::PublicOrder,
    error::AppResult,
    response::ApiResponse,
    services::order_service,
};

pub fn router() -> Router<DbPool> {
    Router::new().route("/orders/{order_number}", get(track_order))
}

/// Customer-facing lookup; no bearer token involved.
#[utoipa::path(
    get,
    path = "/api/public/orders/{order_number}",
    params(
        ("order_number" = String, Path, description = "Order number handed to the customer")
    ),
    responses(
        (status = 200, description = "Public order state with timeline", body = ApiResponse<PublicOrder>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Public"
)]
pub async fn track_order(
    State(pool): State<DbPool>,
    Path(order_number): Path<String>,
) -> AppResult<Json<ApiResponse<PublicOrder>>> {
    let resp = order_service::lookup_public(&pool, &order_number).await?;
    Ok(Json(resp))
}
