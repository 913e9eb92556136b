//! Planning triggers: "Plan Unscheduled" and "Re-Plan Everything".

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::planner::{PlanMode, PlanOutcome};
use crate::services::planning::run_plan;
use crate::state::AppState;
use crate::validation::parse_iso_date;

use super::error::AppError;
use super::local_today;

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    /// Plan as if this were the current day (YYYY-MM-DD). Defaults to the
    /// server's local date.
    pub today: Option<String>,
}

fn run(state: &AppState, query: &PlanQuery, mode: PlanMode) -> Result<Json<PlanOutcome>, AppError> {
    let today = match query.today.as_deref() {
        Some(raw) => parse_iso_date(raw)?,
        None => local_today(),
    };
    let outcome = run_plan(&state.db, &state.plan_guard, today, mode, state.exam_order)?;
    Ok(Json(outcome))
}

/// POST /plan/unscheduled
pub async fn plan_unscheduled(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<PlanOutcome>, AppError> {
    run(&state, &query, PlanMode::Unscheduled)
}

/// POST /plan/all
pub async fn plan_everything(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<PlanOutcome>, AppError> {
    run(&state, &query, PlanMode::Everything)
}
