use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantId, ApplicationId, SchemeId};
use super::repository::{ApplicantRepository, ApplicationRepository, SchemeRepository};
use super::service::{ApplicationDecisionService, ApplicationServiceError};

type SharedService<A, S, P> = Arc<ApplicationDecisionService<A, S, P>>;

/// Body accepted by `POST /api/v1/applications`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ApplicationRequest {
    pub applicant_id: ApplicantId,
    pub scheme_id: SchemeId,
}

/// Router builder exposing assessment and application endpoints.
pub fn eligibility_router<A, S, P>(service: SharedService<A, S, P>) -> Router
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    P: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applicants/:applicant_id/eligibility",
            get(assessment_handler::<A, S, P>),
        )
        .route("/api/v1/applications", post(create_handler::<A, S, P>))
        .route(
            "/api/v1/applications/:application_id",
            get(application_handler::<A, S, P>),
        )
        .with_state(service)
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = error.status_code();
    let payload = match &error {
        ApplicationServiceError::DuplicateApplication {
            applicant_id,
            scheme_id,
        } => json!({
            "error": error.to_string(),
            "applicant_id": applicant_id,
            "scheme_id": scheme_id,
        }),
        _ => json!({
            "error": error.to_string(),
        }),
    };
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn assessment_handler<A, S, P>(
    State(service): State<SharedService<A, S, P>>,
    Path(applicant_id): Path<u64>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    P: ApplicationRepository + 'static,
{
    match service.assess_eligibility(ApplicantId(applicant_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<A, S, P>(
    State(service): State<SharedService<A, S, P>>,
    axum::Json(request): axum::Json<ApplicationRequest>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    P: ApplicationRepository + 'static,
{
    match service.create_application(request.applicant_id, request.scheme_id) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn application_handler<A, S, P>(
    State(service): State<SharedService<A, S, P>>,
    Path(application_id): Path<u64>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    P: ApplicationRepository + 'static,
{
    match service.get_application(ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}
