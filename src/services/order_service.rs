use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    display,
    dto::orders::{
        CreateOrderRequest, OrderDetail, OrderList, OrderListQuery, UpdateOrderRequest,
    },
    dto::public::PublicOrder,
    error::{AppError, AppResult},
    listing::{self, OrderFilter, SortSpec},
    middleware::auth::{AuthUser, ensure_admin},
    models::OrderSummary,
    response::{ApiResponse, Meta},
    services::{master_service, note_service},
    timeline,
    validation::{self, OrderFields},
};

// Registry joins are LEFT so a dangling status/priority reference still
// renders with a fallback label instead of dropping the row.
pub(crate) const SUMMARY_SELECT: &str = r#"
    SELECT o.id, o.order_number, o.client_name, o.client_phone, o.client_email,
           o.device_type, o.device_brand, o.device_model, o.serial_number, o.description,
           o.status_id, COALESCE(s.name, 'Desconocido') AS status_name,
           o.priority_id, COALESCE(p.name, 'Desconocida') AS priority_name,
           COALESCE(p.rank, 0) AS priority_rank,
           o.received_date, o.estimated_delivery, o.created_at, o.updated_at
    FROM orders o
    LEFT JOIN statuses s ON s.id = o.status_id
    LEFT JOIN priorities p ON p.id = o.priority_id
"#;

pub async fn list_orders(
    pool: &DbPool,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;

    let sql = format!("{SUMMARY_SELECT} ORDER BY o.created_at DESC");
    let orders: Vec<OrderSummary> = sqlx::query_as(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(annotate)
        .collect();

    let filter = OrderFilter {
        search: query.search,
        status_id: query.status_id,
        priority_id: query.priority_id,
    };
    let mut sort = SortSpec::default();
    if let Some(column) = query.sort_by {
        sort.column = column;
    }
    if let Some(direction) = query.sort_order {
        sort.direction = direction;
    }

    let items = listing::filter_and_sort(orders, &filter, sort);
    let total = items.len() as i64;

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::total_only(total)),
    ))
}

/// Server-side counterpart of the debounced free-text search box.
pub async fn search_orders(
    pool: &DbPool,
    user: &AuthUser,
    term: &str,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;

    let pattern = format!(
        "%{}%",
        term.trim().replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
    );
    let sql = format!(
        r#"{SUMMARY_SELECT}
        WHERE o.order_number ILIKE $1
           OR o.client_name ILIKE $1
           OR o.device_type ILIKE $1
           OR o.device_brand ILIKE $1
           OR o.device_model ILIKE $1
        ORDER BY o.created_at DESC"#
    );
    let items: Vec<OrderSummary> = sqlx::query_as(&sql)
        .bind(pattern)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(annotate)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::total_only(total)),
    ))
}

pub async fn get_order(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    ensure_admin(user)?;

    let order = fetch_summary(pool, id).await?;
    let notes = note_service::fetch_notes(pool, id).await?;

    Ok(ApiResponse::success(
        "Ok",
        OrderDetail { order, notes },
        Some(Meta::empty()),
    ))
}

pub async fn create_order(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderSummary>> {
    ensure_admin(user)?;

    let status_id = match payload.status_id {
        Some(id) => {
            ensure_registry_ref(master_service::status_exists(pool, id).await?, "status_id")?;
            id
        }
        None => master_service::default_status_id(pool).await?,
    };
    let priority_id = match payload.priority_id {
        Some(id) => {
            ensure_registry_ref(
                master_service::priority_exists(pool, id).await?,
                "priority_id",
            )?;
            id
        }
        None => master_service::default_priority_id(pool).await?,
    };

    let received_date = payload.received_date.unwrap_or_else(|| Utc::now().date_naive());

    validation::validate_order(&OrderFields {
        order_number: &payload.order_number,
        client_name: &payload.client_name,
        client_phone: payload.client_phone.as_deref(),
        client_email: payload.client_email.as_deref(),
        device_type: &payload.device_type,
        device_brand: payload.device_brand.as_deref(),
        device_model: payload.device_model.as_deref(),
        serial_number: payload.serial_number.as_deref(),
        description: payload.description.as_deref(),
        received_date,
        estimated_delivery: payload.estimated_delivery,
    })?;

    let order_number = payload.order_number.trim();
    let duplicate: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM orders WHERE order_number = $1")
            .bind(order_number)
            .fetch_optional(pool)
            .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(format!(
            "el número de orden {order_number} ya existe"
        )));
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO orders (id, order_number, client_name, client_phone, client_email,
                            device_type, device_brand, device_model, serial_number,
                            description, status_id, priority_id, received_date,
                            estimated_delivery)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(id)
    .bind(order_number)
    .bind(payload.client_name.trim())
    .bind(clean(payload.client_phone))
    .bind(clean(payload.client_email))
    .bind(payload.device_type.trim())
    .bind(clean(payload.device_brand))
    .bind(clean(payload.device_model))
    .bind(clean(payload.serial_number))
    .bind(clean(payload.description))
    .bind(status_id)
    .bind(priority_id)
    .bind(received_date)
    .bind(payload.estimated_delivery)
    .execute(pool)
    .await?;

    let order = fetch_summary(pool, id).await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id, "order_number": order.order_number })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

/// Field edits only: contact and device info plus the estimated delivery.
/// Status, priority and the order number go through their own operations.
pub async fn update_order_fields(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<OrderSummary>> {
    ensure_admin(user)?;

    let existing = fetch_summary(pool, id).await?;

    let client_name = payload.client_name.unwrap_or(existing.client_name);
    let client_phone = clean(payload.client_phone).or(existing.client_phone);
    let client_email = clean(payload.client_email).or(existing.client_email);
    let device_type = payload.device_type.unwrap_or(existing.device_type);
    let device_brand = clean(payload.device_brand).or(existing.device_brand);
    let device_model = clean(payload.device_model).or(existing.device_model);
    let serial_number = clean(payload.serial_number).or(existing.serial_number);
    let description = clean(payload.description).or(existing.description);
    let estimated_delivery = payload.estimated_delivery.or(existing.estimated_delivery);

    validation::validate_order(&OrderFields {
        order_number: &existing.order_number,
        client_name: &client_name,
        client_phone: client_phone.as_deref(),
        client_email: client_email.as_deref(),
        device_type: &device_type,
        device_brand: device_brand.as_deref(),
        device_model: device_model.as_deref(),
        serial_number: serial_number.as_deref(),
        description: description.as_deref(),
        received_date: existing.received_date,
        estimated_delivery,
    })?;

    sqlx::query(
        r#"
        UPDATE orders
        SET client_name = $2, client_phone = $3, client_email = $4, device_type = $5,
            device_brand = $6, device_model = $7, serial_number = $8, description = $9,
            estimated_delivery = $10, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(client_name.trim())
    .bind(client_phone)
    .bind(client_email)
    .bind(device_type.trim())
    .bind(device_brand)
    .bind(device_model)
    .bind(serial_number)
    .bind(description)
    .bind(estimated_delivery)
    .execute(pool)
    .await?;

    let order = fetch_summary(pool, id).await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Updated", order, Some(Meta::empty())))
}

/// Atomic single-field transition; any stage can follow any other.
pub async fn update_status(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    status_id: Uuid,
) -> AppResult<ApiResponse<OrderSummary>> {
    ensure_admin(user)?;
    ensure_registry_ref(master_service::status_exists(pool, status_id).await?, "status_id")?;

    let result = sqlx::query("UPDATE orders SET status_id = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    let order = fetch_summary(pool, id).await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id, "status": order.status_name })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Status updated",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn update_priority(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    priority_id: Uuid,
) -> AppResult<ApiResponse<OrderSummary>> {
    ensure_admin(user)?;
    ensure_registry_ref(
        master_service::priority_exists(pool, priority_id).await?,
        "priority_id",
    )?;

    let result =
        sqlx::query("UPDATE orders SET priority_id = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(priority_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    let order = fetch_summary(pool, id).await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_priority_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id, "priority": order.priority_name })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Priority updated",
        order,
        Some(Meta::empty()),
    ))
}

/// Permanent removal; the note log goes with the order.
pub async fn delete_order(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "order_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Anonymous lookup keyed by order number. Returns the reduced public field
/// set plus the derived stage timeline; notes and contact data stay private.
pub async fn lookup_public(
    pool: &DbPool,
    order_number: &str,
) -> AppResult<ApiResponse<PublicOrder>> {
    let sql = format!("{SUMMARY_SELECT} WHERE o.order_number = $1");
    let order: Option<OrderSummary> = sqlx::query_as(&sql)
        .bind(order_number.trim())
        .fetch_optional(pool)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let stages: Vec<String> = master_service::fetch_statuses(pool)
        .await?
        .into_iter()
        .map(|status| status.name)
        .collect();
    let timeline = timeline::derive(&stages, &order.status_name);

    let public = PublicOrder {
        order_number: order.order_number,
        status_name: order.status_name,
        received_date: order.received_date,
        estimated_delivery: order.estimated_delivery,
        device_type: order.device_type,
        device_brand: order.device_brand,
        device_model: order.device_model,
        description: order.description,
        timeline,
    };

    Ok(ApiResponse::success("Ok", public, Some(Meta::empty())))
}

pub(crate) async fn fetch_summary(pool: &DbPool, id: Uuid) -> AppResult<OrderSummary> {
    let sql = format!("{SUMMARY_SELECT} WHERE o.id = $1");
    let order: Option<OrderSummary> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    order.map(annotate).ok_or(AppError::NotFound)
}

fn annotate(mut order: OrderSummary) -> OrderSummary {
    order.time_since_created = display::time_since(order.created_at, Utc::now());
    order
}

fn ensure_registry_ref(exists: bool, field: &str) -> AppResult<()> {
    if exists {
        return Ok(());
    }
    let mut violations = BTreeMap::new();
    violations.insert(field.to_string(), "no existe en el catálogo".to_string());
    Err(AppError::Validation(violations))
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
