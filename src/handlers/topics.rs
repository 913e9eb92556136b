use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::db::{self, try_lock};
use crate::domain::{Topic, TopicStatus};
use crate::state::AppState;
use crate::validation::parse_iso_date;

use super::error::AppError;

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: TopicStatus,
}

#[derive(Debug, Deserialize)]
pub struct PinForm {
    /// YYYY-MM-DD
    pub date: String,
}

fn reload(conn: &rusqlite::Connection, id: i64, found: bool) -> Result<Json<Topic>, AppError> {
    if !found {
        return Err(AppError::NotFound(format!("Topic {} not found", id)));
    }
    db::get_topic_by_id(conn, id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Topic {} not found", id)))
}

/// POST /topics/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<StatusForm>,
) -> Result<Json<Topic>, AppError> {
    let conn = try_lock(&state.db)?;
    let found = db::set_topic_status(&conn, id, form.status)?;
    reload(&conn, id, found)
}

/// POST /topics/{id}/pin
///
/// Moves a topic to a day by hand and locks it there.
pub async fn pin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<PinForm>,
) -> Result<Json<Topic>, AppError> {
    let date = parse_iso_date(&form.date)?;
    let conn = try_lock(&state.db)?;
    let found = db::pin_topic(&conn, id, date)?;
    if found {
        tracing::debug!("Pinned topic {} to {}", id, date);
    }
    reload(&conn, id, found)
}

/// POST /topics/{id}/unlock
pub async fn unlock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Topic>, AppError> {
    let conn = try_lock(&state.db)?;
    let found = db::unlock_topic(&conn, id)?;
    reload(&conn, id, found)
}
