use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::masters::MasterData,
    error::{AppError, AppResult},
    models::{Priority, Status},
    response::{ApiResponse, Meta},
};

/// The registry both forms and the public timeline hang off. Statuses come
/// back in canonical progression order, priorities from most to least urgent.
pub async fn get_master_data(pool: &DbPool) -> AppResult<ApiResponse<MasterData>> {
    let statuses = fetch_statuses(pool).await?;
    let priorities = fetch_priorities(pool).await?;

    Ok(ApiResponse::success(
        "Master data",
        MasterData {
            statuses,
            priorities,
        },
        Some(Meta::empty()),
    ))
}

pub async fn fetch_statuses(pool: &DbPool) -> AppResult<Vec<Status>> {
    let statuses =
        sqlx::query_as::<_, Status>("SELECT * FROM statuses ORDER BY position")
            .fetch_all(pool)
            .await?;
    Ok(statuses)
}

pub async fn fetch_priorities(pool: &DbPool) -> AppResult<Vec<Priority>> {
    let priorities =
        sqlx::query_as::<_, Priority>("SELECT * FROM priorities ORDER BY rank DESC")
            .fetch_all(pool)
            .await?;
    Ok(priorities)
}

/// First stage of the canonical progression; creation defaults to it.
/// An empty registry blocks creation instead of guessing an id.
pub async fn default_status_id(pool: &DbPool) -> AppResult<Uuid> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM statuses ORDER BY position LIMIT 1")
            .fetch_optional(pool)
            .await?;
    row.map(|(id,)| id)
        .ok_or_else(|| AppError::BadRequest("el catálogo de estados no está disponible".into()))
}

/// "Media" when present, otherwise the most urgent priority on record.
pub async fn default_priority_id(pool: &DbPool) -> AppResult<Uuid> {
    let media: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM priorities WHERE name = 'Media'")
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = media {
        return Ok(id);
    }

    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM priorities ORDER BY rank DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;
    row.map(|(id,)| id).ok_or_else(|| {
        AppError::BadRequest("el catálogo de prioridades no está disponible".into())
    })
}

pub async fn status_exists(pool: &DbPool, id: Uuid) -> AppResult<bool> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM statuses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

pub async fn priority_exists(pool: &DbPool, id: Uuid) -> AppResult<bool> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM priorities WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}
