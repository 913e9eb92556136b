use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::{self, try_lock};
use crate::state::AppState;
use crate::validation::parse_iso_date;

use super::error::AppError;

#[derive(Debug, Deserialize)]
pub struct BlockedDateForm {
    /// YYYY-MM-DD
    pub date: String,
}

/// GET /blocked-dates
pub async fn list_blocked_dates(
    State(state): State<AppState>,
) -> Result<Json<Vec<NaiveDate>>, AppError> {
    let conn = try_lock(&state.db)?;
    Ok(Json(db::get_blocked_dates(&conn)?))
}

/// POST /blocked-dates
///
/// 201 when the day is newly blocked, 200 when it already was.
pub async fn add_blocked_date(
    State(state): State<AppState>,
    Json(form): Json<BlockedDateForm>,
) -> Result<(StatusCode, Json<NaiveDate>), AppError> {
    let date = parse_iso_date(&form.date)?;
    let conn = try_lock(&state.db)?;
    let status = if db::add_blocked_date(&conn, date)? {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(date)))
}

/// DELETE /blocked-dates/{date}
pub async fn remove_blocked_date(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<StatusCode, AppError> {
    let date = parse_iso_date(&raw)?;
    let conn = try_lock(&state.db)?;
    if db::remove_blocked_date(&conn, date)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("{} is not blocked", date)))
    }
}
