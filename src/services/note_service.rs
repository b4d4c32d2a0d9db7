use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    display,
    dto::notes::AddNoteRequest,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Note,
    response::{ApiResponse, Meta},
    validation,
};

/// Note log for one order, newest first.
pub async fn fetch_notes(pool: &DbPool, order_id: Uuid) -> AppResult<Vec<Note>> {
    let notes: Vec<Note> = sqlx::query_as(
        "SELECT * FROM notes WHERE order_id = $1 ORDER BY created_at DESC",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(annotate)
    .collect();
    Ok(notes)
}

pub async fn add_note(
    pool: &DbPool,
    user: &AuthUser,
    order_id: Uuid,
    payload: AddNoteRequest,
) -> AppResult<ApiResponse<Note>> {
    ensure_admin(user)?;
    validation::validate_note_text(&payload.description)?;

    let order: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    if order.is_none() {
        return Err(AppError::NotFound);
    }

    let note: Note = sqlx::query_as(
        r#"
        INSERT INTO notes (id, order_id, description)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(payload.description.trim())
    .fetch_one(pool)
    .await?;
    let note = annotate(note);

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "note_add",
        Some("notes"),
        Some(serde_json::json!({ "order_id": order_id, "note_id": note.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Note added", note, Some(Meta::empty())))
}

/// Removal is permanent; a second delete of the same note reports NotFound.
pub async fn delete_note(
    pool: &DbPool,
    user: &AuthUser,
    order_id: Uuid,
    note_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND order_id = $2")
        .bind(note_id)
        .bind(order_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "note_delete",
        Some("notes"),
        Some(serde_json::json!({ "order_id": order_id, "note_id": note_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Note deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn annotate(mut note: Note) -> Note {
    note.created_at_display = display::format_timestamp(note.created_at);
    note
}
