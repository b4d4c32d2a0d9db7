use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::masters::MasterData,
    dto::notes::AddNoteRequest,
    dto::orders::{
        CreateOrderRequest, OrderDetail, OrderList, OrderListQuery, UpdateOrderRequest,
        UpdatePriorityRequest, UpdateStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Note, OrderSummary},
    response::ApiResponse,
    services::{master_service, note_service, order_service},
};

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/", get(list_orders))
        .route("/", post(create_order))
        .route("/search/{term}", get(search_orders))
        .route("/data/masters", get(get_master_data))
        .route("/{id}", get(get_order))
        .route("/{id}", put(update_order))
        .route("/{id}", delete(delete_order))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/priority", patch(update_priority))
        .route("/{id}/notes", post(add_note))
        .route("/{id}/notes/{note_id}", delete(delete_note))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("search" = Option<String>, Query, description = "Free-text filter over number, client and device fields"),
        ("status_id" = Option<Uuid>, Query, description = "Filter by status"),
        ("priority_id" = Option<Uuid>, Query, description = "Filter by priority"),
        ("sort_by" = Option<String>, Query, description = "Sort column: received_date, priority, order_number"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "List orders", body = ApiResponse<OrderList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(pool): State<DbPool>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&pool, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/search/{term}",
    params(
        ("term" = String, Path, description = "Case-insensitive substring")
    ),
    responses(
        (status = 200, description = "Matching orders", body = ApiResponse<OrderList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn search_orders(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(term): Path<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::search_orders(&pool, &user, &term).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/data/masters",
    responses(
        (status = 200, description = "Status and priority registry", body = ApiResponse<MasterData>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_master_data(
    State(pool): State<DbPool>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<MasterData>>> {
    let resp = master_service::get_master_data(&pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its note log", body = ApiResponse<OrderDetail>),
        (status = 404, description = "Not Found"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let resp = order_service::get_order(&pool, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Create order", body = ApiResponse<OrderSummary>),
        (status = 409, description = "Duplicate order number"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(pool): State<DbPool>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let resp = order_service::create_order(&pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = ApiResponse<OrderSummary>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let resp = order_service::update_order_fields(&pool, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<OrderSummary>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_status(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let resp = order_service::update_status(&pool, &user, id, payload.status_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/priority",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdatePriorityRequest,
    responses(
        (status = 200, description = "Priority changed", body = ApiResponse<OrderSummary>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Unknown priority"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_priority(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePriorityRequest>,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let resp = order_service::update_priority(&pool, &user, id, payload.priority_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order and its notes removed"),
        (status = 404, description = "Not Found"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = order_service::delete_order(&pool, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/notes",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = AddNoteRequest,
    responses(
        (status = 200, description = "Note appended", body = ApiResponse<Note>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Empty note"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Notes"
)]
pub async fn add_note(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddNoteRequest>,
) -> AppResult<Json<ApiResponse<Note>>> {
    let resp = note_service::add_note(&pool, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/notes/{note_id}",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("note_id" = Uuid, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note removed"),
        (status = 404, description = "Not Found"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Notes"
)]
pub async fn delete_note(
    State(pool): State<DbPool>,
    user: AuthUser,
    Path((id, note_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = note_service::delete_note(&pool, &user, id, note_id).await?;
    Ok(Json(resp))
}
