use crate::errors::{AppError, HabitError};
use crate::models::{
    parse_date_key, CreateHabitRequest, Habit, HabitId, ReportQuery, ReportSummary, ToggleRequest,
};
use crate::report::{build_report, build_report_at};
use crate::state::AppState;
use crate::ui::{render_dashboard, render_not_found, render_report};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::warn;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let habits = state.habits.lock().await;
    Html(render_dashboard(today(), habits.habits(), habits.load_warning()))
}

pub async fn create_habit_form(
    State(state): State<AppState>,
    Form(payload): Form<CreateHabitRequest>,
) -> Result<Redirect, AppError> {
    state.habits.lock().await.create(&payload.name).await?;
    Ok(Redirect::to("/"))
}

pub async fn toggle_habit_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(payload): Form<ToggleRequest>,
) -> Result<Redirect, AppError> {
    let id: HabitId = raw_id.parse()?;
    let date = resolve_date(payload.date.as_deref())?;
    state.habits.lock().await.toggle_complete(id, date).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_habit_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, AppError> {
    // Ids that cannot exist need no delete.
    if let Ok(id) = raw_id.parse::<HabitId>() {
        state.habits.lock().await.delete(id).await?;
    }
    Ok(Redirect::to("/"))
}

pub async fn report_page(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let habits = state.habits.lock().await;
    let habit = raw_id
        .parse::<HabitId>()
        .ok()
        .and_then(|id| habits.get(id));

    match habit {
        Some(habit) => {
            let report = build_report(habit);
            Html(render_report(habit, &report)).into_response()
        }
        None => {
            warn!(id = %raw_id, "report requested for unknown habit");
            (StatusCode::NOT_FOUND, Html(render_not_found())).into_response()
        }
    }
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    Json(state.habits.lock().await.habits().to_vec())
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let habit = state.habits.lock().await.create(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if let Ok(id) = raw_id.parse::<HabitId>() {
        state.habits.lock().await.delete(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<Habit>, AppError> {
    let id: HabitId = raw_id.parse()?;
    let date = resolve_date(payload.date.as_deref())?;
    let habit = state.habits.lock().await.toggle_complete(id, date).await?;
    Ok(Json(habit))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportSummary>, AppError> {
    let id: HabitId = raw_id.parse()?;
    let date = resolve_date(query.date.as_deref())?;
    let habits = state.habits.lock().await;
    let habit = habits.find(id)?;
    Ok(Json(build_report_at(date, habit)))
}

/// Caller-supplied `yyyy-MM-dd`, or today when absent.
fn resolve_date(raw: Option<&str>) -> Result<NaiveDate, HabitError> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => parse_date_key(value),
        _ => Ok(today()),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
