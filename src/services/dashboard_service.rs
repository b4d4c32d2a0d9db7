use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::DbPool,
    display,
    dto::dashboard::{DashboardStats, RecentOrder, StatusCount},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::OrderSummary,
    response::{ApiResponse, Meta},
    services::master_service,
};

const RECENT_LIMIT: i64 = 5;

/// Aggregate counts per stage plus the most recent intake. When the
/// aggregate query fails, equivalent numbers are rebuilt from the plain
/// order list and the registry; only if that also fails does the caller see
/// an error.
pub async fn stats(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;

    let by_status = match aggregate_counts(pool).await {
        Ok(counts) => counts,
        Err(err) => {
            tracing::warn!(error = %err, "aggregate stats failed, falling back to order scan");
            fallback_counts(pool).await?
        }
    };
    let total_orders = by_status.iter().map(|entry| entry.count).sum();
    let recent = recent_orders(pool).await?;

    Ok(ApiResponse::success(
        "Ok",
        DashboardStats {
            total_orders,
            by_status,
            recent,
        },
        Some(Meta::empty()),
    ))
}

async fn aggregate_counts(pool: &DbPool) -> AppResult<Vec<StatusCount>> {
    #[derive(sqlx::FromRow)]
    struct CountRow {
        status_id: Uuid,
        status_name: String,
        count: i64,
    }

    let rows: Vec<CountRow> = sqlx::query_as(
        r#"
        SELECT s.id AS status_id, s.name AS status_name, COUNT(o.id) AS count
        FROM statuses s
        LEFT JOIN orders o ON o.status_id = s.id
        GROUP BY s.id, s.name, s.position
        ORDER BY s.position
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| status_count(row.status_id, row.status_name, row.count))
        .collect())
}

// Same shape as the aggregate path, reconstructed in memory.
async fn fallback_counts(pool: &DbPool) -> AppResult<Vec<StatusCount>> {
    let statuses = master_service::fetch_statuses(pool).await?;

    let refs: Vec<(Uuid,)> = sqlx::query_as("SELECT status_id FROM orders")
        .fetch_all(pool)
        .await?;
    let mut tally: HashMap<Uuid, i64> = HashMap::new();
    for (status_id,) in refs {
        *tally.entry(status_id).or_insert(0) += 1;
    }

    Ok(statuses
        .into_iter()
        .map(|status| {
            let count = tally.get(&status.id).copied().unwrap_or(0);
            status_count(status.id, status.name, count)
        })
        .collect())
}

async fn recent_orders(pool: &DbPool) -> AppResult<Vec<RecentOrder>> {
    let sql = format!(
        "{} ORDER BY o.created_at DESC LIMIT $1",
        crate::services::order_service::SUMMARY_SELECT
    );
    let rows: Vec<OrderSummary> = sqlx::query_as(&sql)
        .bind(RECENT_LIMIT)
        .fetch_all(pool)
        .await?;

    let now = Utc::now();
    Ok(rows
        .into_iter()
        .map(|order| RecentOrder {
            order_number: order.order_number,
            client_name: order.client_name,
            device_type: order.device_type,
            status_name: order.status_name,
            days_in_system: now.signed_duration_since(order.created_at).num_days(),
        })
        .collect())
}

fn status_count(status_id: Uuid, status_name: String, count: i64) -> StatusCount {
    let appearance = display::status_appearance(&status_name);
    StatusCount {
        status_id,
        color: appearance.color.to_string(),
        icon: appearance.icon.to_string(),
        status_name,
        count,
    }
}
