use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::db::{self, try_lock};
use crate::domain::Subject;
use crate::state::AppState;
use crate::validation::validate_name;

use super::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SubjectForm {
    pub name: String,
}

/// GET /subjects
pub async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, AppError> {
    let conn = try_lock(&state.db)?;
    Ok(Json(db::get_all_subjects(&conn)?))
}

/// POST /subjects
pub async fn create_subject(
    State(state): State<AppState>,
    Json(form): Json<SubjectForm>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let name = validate_name("name", &form.name)?;
    let conn = try_lock(&state.db)?;
    let id = db::insert_subject(&conn, &name)?;
    tracing::debug!("Created subject {} ({})", id, name);
    Ok((StatusCode::CREATED, Json(Subject { id, name })))
}

/// DELETE /subjects/{id}
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut conn = try_lock(&state.db)?;
    if db::delete_subject(&mut conn, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Subject {} not found", id)))
    }
}
