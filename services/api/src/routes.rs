use crate::infra::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;
use talentark::analytics::{self, AnalyticsSnapshot};
use talentark::directory::{EmployeeRecord, EmployeeRepository};
use talentark::error::AppError;
use talentark::roster::{self, ImportRun, RowError, RowWarning};

/// Routes bound to the employee repository plus the operational endpoints.
pub(crate) fn with_service_routes<R>(repository: Arc<R>) -> Router
where
    R: EmployeeRepository + 'static,
{
    directory_router(repository)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) fn directory_router<R>(repository: Arc<R>) -> Router
where
    R: EmployeeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            get(list_employees::<R>).post(create_employee::<R>),
        )
        .route("/api/v1/employees/:employee_id", put(update_employee::<R>))
        .route("/api/v1/analytics", get(analytics_endpoint::<R>))
        .route("/api/v1/roster/import", post(roster_import_endpoint::<R>))
        .route("/api/v1/roster/template", get(roster_template_endpoint))
        .with_state(repository)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_employees<R>(
    State(repository): State<Arc<R>>,
) -> Result<Json<Vec<EmployeeRecord>>, AppError>
where
    R: EmployeeRepository + 'static,
{
    let employees = repository.list_all()?;
    Ok(Json(employees))
}

pub(crate) async fn create_employee<R>(
    State(repository): State<Arc<R>>,
    Json(record): Json<EmployeeRecord>,
) -> Result<Response, AppError>
where
    R: EmployeeRepository + 'static,
{
    let stored = repository.insert(record)?;
    Ok((StatusCode::CREATED, Json(stored)).into_response())
}

pub(crate) async fn update_employee<R>(
    State(repository): State<Arc<R>>,
    Path(employee_id): Path<String>,
    Json(mut record): Json<EmployeeRecord>,
) -> Result<Json<EmployeeRecord>, AppError>
where
    R: EmployeeRepository + 'static,
{
    // The path owns the identity; the body cannot rename a record.
    record.id = employee_id;
    repository.update(record.clone())?;
    Ok(Json(record))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalyticsQuery {
    /// Snapshot evaluation date; defaults to today. Recency counting is
    /// relative to this date.
    #[serde(default)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) async fn analytics_endpoint<R>(
    State(repository): State<Arc<R>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSnapshot>, AppError>
where
    R: EmployeeRepository + 'static,
{
    let employees = repository.list_all()?;
    let as_of = query.as_of.unwrap_or_else(|| Local::now().date_naive());
    Ok(Json(analytics::snapshot(&employees, as_of)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterImportRequest {
    pub(crate) csv: String,
    /// Preview only: partition the sheet but write nothing.
    #[serde(default)]
    pub(crate) dry_run: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterPreviewResponse {
    pub(crate) dry_run: bool,
    pub(crate) accepted: usize,
    pub(crate) warnings: Vec<RowWarning>,
    pub(crate) errors: Vec<RowError>,
}

pub(crate) async fn roster_import_endpoint<R>(
    State(repository): State<Arc<R>>,
    Json(payload): Json<RosterImportRequest>,
) -> Result<Response, AppError>
where
    R: EmployeeRepository + 'static,
{
    let existing: HashSet<String> = repository
        .list_all()?
        .into_iter()
        .map(|record| record.email)
        .collect();

    let mut run = ImportRun::new();
    let outcome = run.preview(Cursor::new(payload.csv.into_bytes()), &existing)?;
    let accepted = outcome.accepted.len();
    let warnings = outcome.duplicates.clone();
    let errors = outcome.errors.clone();

    if payload.dry_run {
        return Ok(Json(RosterPreviewResponse {
            dry_run: true,
            accepted,
            warnings,
            errors,
        })
        .into_response());
    }

    let report = run.commit(&*repository, &mut |processed, total| {
        tracing::debug!(processed, total, "roster import progress");
    })?;

    Ok(Json(report).into_response())
}

pub(crate) async fn roster_template_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        roster::template(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryEmployeeRepository;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn seeded() -> Arc<InMemoryEmployeeRepository> {
        Arc::new(InMemoryEmployeeRepository::seeded())
    }

    #[tokio::test]
    async fn analytics_endpoint_covers_the_whole_roster() {
        let repository = seeded();
        let roster_size = repository.list_all().expect("list works").len();

        let query = AnalyticsQuery {
            as_of: NaiveDate::from_ymd_opt(2026, 8, 29),
        };
        let Json(snapshot) = analytics_endpoint(State(repository), Query(query))
            .await
            .expect("snapshot builds");

        assert_eq!(snapshot.total_employees, roster_size);
        let performance_total: usize = snapshot
            .performance_distribution
            .iter()
            .map(|entry| entry.count)
            .sum();
        assert_eq!(performance_total, roster_size);
    }

    #[tokio::test]
    async fn dry_run_import_reports_without_writing() {
        let repository = seeded();
        let before = repository.list_all().expect("list works").len();

        let request = RosterImportRequest {
            csv: "Name,Email,Position,Location\n\
New Hire,new.hire@arkus.mx,Dev,Remote\n\
Ana Soto,ana.soto@arkus.mx,Backend Developer,\"Guadalajara, Jalisco\"\n"
                .to_string(),
            dry_run: true,
        };
        let response = roster_import_endpoint(State(repository.clone()), Json(request))
            .await
            .expect("preview builds");
        assert_eq!(response.status(), StatusCode::OK);

        let after = repository.list_all().expect("list works").len();
        assert_eq!(before, after, "dry run must not persist");
    }

    #[tokio::test]
    async fn committed_import_persists_accepted_rows() {
        let repository = seeded();
        let before = repository.list_all().expect("list works").len();

        let request = RosterImportRequest {
            csv: "Name,Email,Position,Location\n\
New Hire,new.hire@arkus.mx,Dev,Remote\n"
                .to_string(),
            dry_run: false,
        };
        roster_import_endpoint(State(repository.clone()), Json(request))
            .await
            .expect("import runs");

        assert_eq!(repository.list_all().expect("list works").len(), before + 1);
        assert!(repository
            .find_by_email("new.hire@arkus.mx")
            .expect("lookup works")
            .is_some());
    }

    #[tokio::test]
    async fn template_is_served_as_csv() {
        let app = directory_router(seeded());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/roster/template")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("content type set");
        assert_eq!(content_type, "text/csv; charset=utf-8");
    }

    #[tokio::test]
    async fn update_rejects_unknown_ids() {
        let repository = seeded();
        let mut record = repository
            .find_by_email("ana.soto@arkus.mx")
            .expect("lookup works")
            .expect("seeded");
        record.employee_score = 99;

        let error = update_employee(
            State(repository),
            Path("no-such-id".to_string()),
            Json(record),
        )
        .await
        .expect_err("unknown id rejected");
        assert!(matches!(
            error,
            AppError::Directory(talentark::directory::RepositoryError::NotFound)
        ));
    }
}
