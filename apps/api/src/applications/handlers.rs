//! Axum route handlers for the Job Applications API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::applications::dto::{JobApplicationDto, JobApplicationRequest, ListFilter};
use crate::applications::repository::company_matches;
use crate::applications::validation::{invalid_status_message, validate_request, FieldError};
use crate::errors::AppError;
use crate::models::job_application::{ApplicationStatus, JobApplication};
use crate::state::AppState;

pub const BASE_PATH: &str = "/api/job-applications";

fn to_dtos(rows: Vec<JobApplication>) -> Vec<JobApplicationDto> {
    rows.into_iter().map(JobApplicationDto::from).collect()
}

/// GET /api/job-applications
///
/// Optional `?status=` and `?company=` narrow the list; blank values are ignored.
pub async fn handle_list(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<JobApplicationDto>>, AppError> {
    let status = match filter.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<ApplicationStatus>().map_err(|_| {
            AppError::Validation(vec![FieldError::new("status", invalid_status_message())])
        })?),
    };
    let company = filter
        .company
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let rows = match (status, company) {
        (None, None) => state.repository.get_all().await?,
        (Some(status), None) => state.repository.get_by_status(status).await?,
        (None, Some(company)) => state.repository.get_by_company(company).await?,
        (Some(status), Some(company)) => state
            .repository
            .get_by_status(status)
            .await?
            .into_iter()
            .filter(|row| company_matches(&row.company, company))
            .collect(),
    };

    Ok(Json(to_dtos(rows)))
}

/// GET /api/job-applications/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobApplicationDto>, AppError> {
    let row = state
        .repository
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::application_not_found(id))?;
    Ok(Json(row.into()))
}

/// POST /api/job-applications
pub async fn handle_create(
    State(state): State<AppState>,
    payload: Result<Json<JobApplicationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let fields = validate_request(&req).map_err(AppError::Validation)?;

    let created = state.repository.create(fields).await?;
    let location = format!("{BASE_PATH}/{}", created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(JobApplicationDto::from(created)),
    ))
}

/// PUT /api/job-applications/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<JobApplicationRequest>, JsonRejection>,
) -> Result<Json<JobApplicationDto>, AppError> {
    let Json(req) = payload?;
    let fields = validate_request(&req).map_err(AppError::Validation)?;

    let updated = state
        .repository
        .update(id, fields)
        .await?
        .ok_or_else(|| AppError::application_not_found(id))?;
    Ok(Json(updated.into()))
}

/// DELETE /api/job-applications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.repository.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::application_not_found(id))
    }
}
