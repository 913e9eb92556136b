pub mod agenda;
pub mod blocked_dates;
pub mod error;
pub mod exams;
pub mod plan;
pub mod subjects;
pub mod topics;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::db::{self, try_lock};
use crate::state::AppState;

use error::AppError;

/// Current calendar day in the server's local time zone
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub exams: i64,
    pub unscheduled_topics: i64,
    pub blocked_dates: usize,
    pub planning: bool,
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Json<Summary>, AppError> {
    let conn = try_lock(&state.db)?;
    Ok(Json(Summary {
        exams: db::get_exam_count(&conn)?,
        unscheduled_topics: db::get_unscheduled_count(&conn)?,
        blocked_dates: db::get_blocked_dates(&conn)?.len(),
        planning: state.plan_guard.is_busy(),
    }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/subjects", get(subjects::list_subjects).post(subjects::create_subject))
        .route("/subjects/{id}", delete(subjects::delete_subject))
        .route("/exams", get(exams::list_exams).post(exams::create_exam))
        .route("/exams/{id}", get(exams::get_exam).delete(exams::delete_exam))
        .route(
            "/exams/{id}/topics",
            get(exams::list_exam_topics).post(exams::create_topic),
        )
        .route("/topics/{id}/status", post(topics::set_status))
        .route("/topics/{id}/pin", post(topics::pin))
        .route("/topics/{id}/unlock", post(topics::unlock))
        .route(
            "/blocked-dates",
            get(blocked_dates::list_blocked_dates).post(blocked_dates::add_blocked_date),
        )
        .route("/blocked-dates/{date}", delete(blocked_dates::remove_blocked_date))
        .route("/agenda", get(agenda::agenda))
        .route("/plan/unscheduled", post(plan::plan_unscheduled))
        .route("/plan/all", post(plan::plan_everything))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
