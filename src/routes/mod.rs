use axum::Router;

use crate::db::DbPool;

pub mod auth;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod orders;
pub mod public;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<DbPool> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/orders", orders::router())
        .nest("/dashboard", dashboard::router())
        .nest("/public", public::router())
}
