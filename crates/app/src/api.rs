use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use complaint_desk_core::{Category, Complaint, NewComplaint, StoreError};
use metrics::counter;
use serde::Deserialize;
use tracing::{debug, info};

use crate::problem::ProblemResponse;
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    status: Option<String>,
}

fn record_request(route: &'static str, result: &'static str) {
    counter!("api_requests_total", "route" => route, "result" => result).increment(1);
}

/// Logs and counts a rejected request before handing the problem back to axum.
fn reject(route: &'static str, problem: ProblemResponse) -> ProblemResponse {
    debug!(
        stage = "api",
        route,
        status = problem.status().as_u16(),
        kind = problem.problem_type(),
        "request rejected"
    );
    record_request(route, problem.problem_type());
    problem
}

pub async fn list_categories(State(state): State<AppState>) -> Json<&'static [Category]> {
    record_request("categories.list", "ok");
    Json(state.store().catalog().list())
}

/// Query pairs are taken as a raw list so repeated keys never reject the
/// request; repeated `status` values are joined with commas.
pub async fn list_complaints(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Complaint>> {
    record_request("complaints.list", "ok");
    let filter = status_filter(&params);
    Json(state.store().list(filter.as_deref()))
}

fn status_filter(params: &[(String, String)]) -> Option<String> {
    let values: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "status")
        .map(|(_, value)| value.as_str())
        .collect();
    (!values.is_empty()).then(|| values.join(","))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Complaint>, ProblemResponse> {
    const ROUTE: &str = "complaints.get";

    match state.store().get(&id) {
        Some(complaint) => {
            record_request(ROUTE, "ok");
            Ok(Json(complaint))
        }
        None => Err(reject(ROUTE, StoreError::NotFound(id).into())),
    }
}

pub async fn create_complaint(
    State(state): State<AppState>,
    payload: Result<Json<NewComplaint>, JsonRejection>,
) -> Result<(StatusCode, Json<Complaint>), ProblemResponse> {
    const ROUTE: &str = "complaints.create";

    let Json(request) = payload.map_err(|err| reject(ROUTE, err.into()))?;
    let complaint = state
        .store()
        .create(request)
        .map_err(|err| reject(ROUTE, err.into()))?;

    info!(
        stage = "api",
        id = %complaint.id,
        category = %complaint.category,
        "complaint created"
    );
    counter!("complaints_created_total").increment(1);
    record_request(ROUTE, "ok");

    Ok((StatusCode::CREATED, Json(complaint)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<Complaint>, ProblemResponse> {
    const ROUTE: &str = "complaints.update_status";

    let Json(update) = payload.map_err(|err| reject(ROUTE, err.into()))?;
    let complaint = state
        .store()
        .update_status(&id, update.status.as_deref())
        .map_err(|err| reject(ROUTE, err.into()))?;

    info!(
        stage = "api",
        id = %complaint.id,
        status = %complaint.status,
        "complaint status updated"
    );
    counter!("complaint_status_updates_total", "status" => complaint.status.as_str())
        .increment(1);
    record_request(ROUTE, "ok");

    Ok(Json(complaint))
}
