use axum::{Json, Router, extract::State, routing::get};

use crate::{
    db::DbPool,
    dto::dashboard::DashboardStats,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
};

pub fn router() -> Router<DbPool> {
    Router::new().route("/stats", get(stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Counts per stage and recent intake", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn stats(
    State(pool): State<DbPool>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = dashboard_service::stats(&pool, &user).await?;
    Ok(Json(resp))
}
