use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::db::{self, try_lock};
use crate::domain::{Exam, Topic};
use crate::state::AppState;
use crate::validation::{parse_iso_date, parse_time, validate_name, validate_note};

use super::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ExamForm {
    pub title: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: Option<String>,
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub ignores_barrier: bool,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopicForm {
    pub name: String,
    pub note: Option<String>,
}

/// GET /exams
pub async fn list_exams(State(state): State<AppState>) -> Result<Json<Vec<Exam>>, AppError> {
    let conn = try_lock(&state.db)?;
    Ok(Json(db::get_all_exams(&conn)?))
}

/// GET /exams/{id}
pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Exam>, AppError> {
    let conn = try_lock(&state.db)?;
    db::get_exam_by_id(&conn, id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Exam {} not found", id)))
}

/// POST /exams
pub async fn create_exam(
    State(state): State<AppState>,
    Json(form): Json<ExamForm>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    let mut exam = Exam::new(validate_name("title", &form.title)?, parse_iso_date(&form.date)?);
    exam.time = form.time.as_deref().map(parse_time).transpose()?;
    exam.ignores_barrier = form.ignores_barrier;
    exam.note = validate_note(form.note.as_deref())?;
    exam.subject_id = form.subject_id;

    let conn = try_lock(&state.db)?;
    if let Some(subject_id) = exam.subject_id {
        if !db::subject_exists(&conn, subject_id)? {
            return Err(AppError::BadRequest(format!("Subject {} does not exist", subject_id)));
        }
    }
    exam.id = db::insert_exam(&conn, &exam)?;
    tracing::debug!("Created exam {} ({}) on {:?}", exam.id, exam.title, exam.date);
    Ok((StatusCode::CREATED, Json(exam)))
}

/// DELETE /exams/{id}
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut conn = try_lock(&state.db)?;
    if db::delete_exam(&mut conn, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Exam {} not found", id)))
    }
}

/// GET /exams/{id}/topics
pub async fn list_exam_topics(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Topic>>, AppError> {
    let conn = try_lock(&state.db)?;
    if db::get_exam_by_id(&conn, id)?.is_none() {
        return Err(AppError::NotFound(format!("Exam {} not found", id)));
    }
    Ok(Json(db::get_topics_for_exam(&conn, id)?))
}

/// POST /exams/{id}/topics
pub async fn create_topic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<TopicForm>,
) -> Result<(StatusCode, Json<Topic>), AppError> {
    let mut topic = Topic::new(id, validate_name("name", &form.name)?);
    topic.note = validate_note(form.note.as_deref())?;

    let conn = try_lock(&state.db)?;
    if db::get_exam_by_id(&conn, id)?.is_none() {
        return Err(AppError::NotFound(format!("Exam {} not found", id)));
    }
    let topic_id = db::insert_topic(&conn, &topic)?;
    let stored = db::get_topic_by_id(&conn, topic_id)?
        .ok_or_else(|| AppError::Internal(format!("topic {} vanished after insert", topic_id)))?;
    Ok((StatusCode::CREATED, Json(stored)))
}
