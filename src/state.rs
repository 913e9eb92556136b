//! Application state shared by all handlers.

use crate::db::DbPool;
use crate::planner::ExamOrder;
use crate::services::planning::PlanGuard;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Planner database connection
    pub db: DbPool,

    /// Serializes planning runs
    pub plan_guard: PlanGuard,

    /// Order in which exams are planned
    pub exam_order: ExamOrder,
}

impl AppState {
    pub fn new(db: DbPool, exam_order: ExamOrder) -> Self {
        Self {
            db,
            plan_guard: PlanGuard::new(),
            exam_order,
        }
    }
}
