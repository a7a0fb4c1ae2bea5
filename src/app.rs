use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits", post(handlers::create_habit_form))
        .route("/habits/:id/toggle", post(handlers::toggle_habit_form))
        .route("/habits/:id/delete", post(handlers::delete_habit_form))
        .route("/report/:id", get(handlers::report_page))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route("/api/habits/:id", axum::routing::delete(handlers::delete_habit))
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/habits/:id/report", get(handlers::get_report))
        .with_state(state)
}
