//! # API REST
//!
//! REST API implementation for the UTI ward dashboard.
//!
//! Handles:
//! - HTTP endpoints with axum over the shared [`Ward`](uti_core::Ward) state
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, error status mapping)
//!
//! Uses `api-shared` for the request/response envelopes.

#![warn(rust_2018_idioms)]

mod error;
mod state;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, ClockTicker};

use api_shared::dto::{
    AddTaskReq, ChecklistQuery, ClockRes, ErrorRes, HealthRes, IndicatorQuery, NavigateReq,
    NewSbarReq, PatientListQuery, SbarCreateReq, ScaleImportReq, TaskStatusReq,
};
use api_shared::HealthService;
use axum::{
    extract::{Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::str::FromStr;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uti_core::checklist::{ChecklistUpdate, IndicatorChecklist};
use uti_core::constants::SCALE_TEMPLATE_FILENAME;
use uti_core::dashboard::PatientCard;
use uti_core::forms::{PatientForm, PatientUpdate, SubmitOutcome};
use uti_core::import::{self, ImportReport};
use uti_core::indicators::{IndicatorFilter, IndicatorSummary};
use uti_core::model::{Patient, PatientDetail, SbarRecord, ScaleEntry, Shift, Task, TaskStatus};
use uti_core::navigation::{MenuItem, Tab};
use uti_core::roster::{RosterFilter, StatusCounts};
use uti_core::sbar::SbarDraft;
use uti_core::{Filter, WardError, WardResult};
use uti_ids::RecordId;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        clock,
        list_patients,
        create_patient,
        get_patient,
        update_patient,
        reset_turn,
        dashboard,
        add_task,
        advance_task,
        set_task_status,
        remove_task,
        list_sbar,
        create_sbar,
        indicators,
        get_checklist,
        save_checklist,
        list_scale,
        scale_template,
        import_scale,
        validate_scale_entry,
        remove_scale_entry,
        navigation,
        navigate,
        navigate_new_sbar,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        ClockRes,
        AddTaskReq,
        TaskStatusReq,
        SbarCreateReq,
        ScaleImportReq,
        NavigateReq,
        NewSbarReq,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router over `state`, with Swagger UI and permissive CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/clock", get(clock))
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/:id", get(get_patient).put(update_patient))
        .route("/patients/:id/turn", post(reset_turn))
        .route(
            "/patients/:id/checklist",
            get(get_checklist).put(save_checklist),
        )
        .route("/dashboard", get(dashboard))
        .route("/tasks", post(add_task))
        .route("/tasks/:id", axum::routing::delete(remove_task))
        .route("/tasks/:id/advance", post(advance_task))
        .route("/tasks/:id/status", put(set_task_status))
        .route("/sbar", get(list_sbar).post(create_sbar))
        .route("/indicators", get(indicators))
        .route("/scale", get(list_scale))
        .route("/scale/template", get(scale_template))
        .route("/scale/import", post(import_scale))
        .route("/scale/:id", axum::routing::delete(remove_scale_entry))
        .route("/scale/:id/validate", post(validate_scale_entry))
        .route("/navigation", get(navigation).put(navigate))
        .route("/navigation/new-sbar", post(navigate_new_sbar))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn record_id(raw: &str) -> ApiResult<RecordId> {
    Ok(RecordId::parse(raw)?)
}

fn filter<T: FromStr<Err = WardError>>(raw: Option<&str>) -> WardResult<Filter<T>> {
    raw.unwrap_or_default().parse()
}

fn optional<T: FromStr<Err = WardError>>(raw: Option<&str>) -> WardResult<Option<T>> {
    raw.filter(|r| !r.is_empty()).map(str::parse).transpose()
}

fn submitted(outcome: SubmitOutcome) -> ApiResult<RecordId> {
    match outcome {
        SubmitOutcome::Saved(id) => Ok(id),
        SubmitOutcome::Invalid(errors) => Err(WardError::Validation(errors).into()),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/clock",
    responses((status = 200, description = "Wall clock and current shift", body = ClockRes))
)]
async fn clock(State(state): State<AppState>) -> Json<ClockRes> {
    let ward = state.ward();
    Json(ClockRes {
        now: ward.now().to_rfc3339(),
        shift: ward.current_shift().to_string(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatientListRes {
    patients: Vec<PatientDetail>,
    counts: StatusCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_hint: Option<&'static str>,
}

#[utoipa::path(
    get,
    path = "/patients",
    params(PatientListQuery),
    responses(
        (status = 200, description = "Filtered roster with status counts"),
        (status = 400, description = "Unknown status filter", body = ErrorRes)
    )
)]
/// List roster patients matching the search text and status filter
///
/// Results keep roster order. Counts always cover the whole roster.
async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<PatientListQuery>,
) -> ApiResult<Json<PatientListRes>> {
    let filter = RosterFilter {
        search: query.search.unwrap_or_default(),
        status: filter(query.status.as_deref())?,
    };
    let ward = state.ward();
    let roster = ward.roster();
    Ok(Json(PatientListRes {
        patients: roster.filter(&filter).into_iter().cloned().collect(),
        counts: roster.counts(),
        empty_hint: roster.empty_hint(&filter).map(|h| h.message()),
    }))
}

#[utoipa::path(
    post,
    path = "/patients",
    responses(
        (status = 201, description = "Patient admitted"),
        (status = 400, description = "Validation failed", body = ErrorRes)
    )
)]
/// Admit a patient
///
/// The body is a list of field edits (`{"field": "name", "value": "..."}`) applied to a blank
/// patient form before it is submitted.
async fn create_patient(
    State(state): State<AppState>,
    Json(updates): Json<Vec<PatientUpdate>>,
) -> ApiResult<(StatusCode, Json<PatientDetail>)> {
    let mut ward = state.ward();
    let mut form = ward.patient_form(None, Utc::now())?;
    for update in updates {
        form.update(update);
    }
    let id = submitted(ward.save_patient(&mut form, Utc::now()))?;
    Ok((StatusCode::CREATED, Json(ward.roster().require(&id)?.clone())))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient with clinical detail"),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<PatientDetail>> {
    let id = record_id(&id)?;
    let ward = state.ward();
    Ok(Json(ward.roster().require(&id)?.clone()))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient updated in place"),
        (status = 400, description = "Validation failed", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Edit a patient through the patient form
async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(updates): Json<Vec<PatientUpdate>>,
) -> ApiResult<Json<PatientDetail>> {
    let id = record_id(&id)?;
    let mut ward = state.ward();
    let mut form: PatientForm = ward.patient_form(Some(&id), Utc::now())?;
    for update in updates {
        form.update(update);
    }
    let id = submitted(ward.save_patient(&mut form, Utc::now()))?;
    Ok(Json(ward.roster().require(&id)?.clone()))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/turn",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Decubitus timer reset"),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Record a position change: the decubitus timer restarts now
async fn reset_turn(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<Patient>> {
    let id = record_id(&id)?;
    let mut ward = state.ward();
    Ok(Json(ward.reset_turn(&id, Utc::now())?.clone()))
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses((status = 200, description = "One card per roster patient"))
)]
async fn dashboard(State(state): State<AppState>) -> Json<Vec<PatientCard>> {
    Json(state.ward().cards())
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = AddTaskReq,
    responses(
        (status = 201, description = "Default task added"),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
async fn add_task(
    State(state): State<AppState>,
    Json(req): Json<AddTaskReq>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let patient_id = record_id(&req.patient_id)?;
    let mut ward = state.ward();
    let task = ward.add_task(&patient_id, Utc::now())?.clone();
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    post,
    path = "/tasks/{id}/advance",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task moved one step forward"),
        (status = 404, description = "Unknown task", body = ErrorRes),
        (status = 409, description = "Task already completed", body = ErrorRes)
    )
)]
async fn advance_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<Task>> {
    let id = record_id(&id)?;
    let mut ward = state.ward();
    Ok(Json(ward.dashboard_mut().advance_task(&id)?.clone()))
}

#[utoipa::path(
    put,
    path = "/tasks/{id}/status",
    params(("id" = String, Path, description = "Task id")),
    request_body = TaskStatusReq,
    responses(
        (status = 200, description = "Task status set"),
        (status = 400, description = "Unknown status", body = ErrorRes),
        (status = 404, description = "Unknown task", body = ErrorRes),
        (status = 409, description = "Backward transition", body = ErrorRes)
    )
)]
async fn set_task_status(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<TaskStatusReq>,
) -> ApiResult<Json<Task>> {
    let id = record_id(&id)?;
    let status: TaskStatus = req.status.parse()?;
    let mut ward = state.ward();
    Ok(Json(ward.dashboard_mut().set_task_status(&id, status)?.clone()))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Removed task"),
        (status = 404, description = "Unknown task", body = ErrorRes)
    )
)]
async fn remove_task(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<Task>> {
    let id = record_id(&id)?;
    let mut ward = state.ward();
    Ok(Json(ward.dashboard_mut().remove_task(&id)?))
}

#[utoipa::path(
    get,
    path = "/sbar",
    responses((status = 200, description = "SBAR records, newest first"))
)]
async fn list_sbar(State(state): State<AppState>) -> Json<Vec<SbarRecord>> {
    Json(state.ward().sbar().records().to_vec())
}

#[utoipa::path(
    post,
    path = "/sbar",
    request_body = SbarCreateReq,
    responses(
        (status = 201, description = "SBAR record filed"),
        (status = 400, description = "No patient selected", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// File an SBAR note under the current shift and the configured nurse
///
/// Without `patientId` the patient preselected in the SBAR view is used. The view's draft is
/// left untouched.
async fn create_sbar(
    State(state): State<AppState>,
    Json(req): Json<SbarCreateReq>,
) -> ApiResult<(StatusCode, Json<SbarRecord>)> {
    let patient_id = req.patient_id.as_deref().map(record_id).transpose()?;
    let note = SbarDraft {
        situation: req.situation,
        background: req.background,
        assessment: req.assessment,
        recommendation: req.recommendation,
    };
    let mut ward = state.ward();
    let record = ward.file_sbar(patient_id, note, Utc::now())?.clone();
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/indicators",
    params(IndicatorQuery),
    responses(
        (status = 200, description = "Counts, groupings and shift distribution"),
        (status = 400, description = "Unknown type or shift", body = ErrorRes)
    )
)]
async fn indicators(
    State(state): State<AppState>,
    Query(query): Query<IndicatorQuery>,
) -> ApiResult<Json<IndicatorSummary>> {
    let filter = IndicatorFilter {
        indicator_type: filter(query.indicator_type.as_deref())?,
        shift: filter(query.shift.as_deref())?,
    };
    Ok(Json(state.ward().indicators().summary_for(filter)))
}

fn checklist_key(query: &ChecklistQuery) -> ApiResult<(Option<NaiveDate>, Option<Shift>)> {
    let date = query
        .date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| {
            d.parse::<NaiveDate>()
                .map_err(|e| WardError::InvalidInput(format!("bad date '{d}': {e}")))
        })
        .transpose()?;
    Ok((date, optional(query.shift.as_deref())?))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/checklist",
    params(("id" = String, Path, description = "Patient id"), ChecklistQuery),
    responses(
        (status = 200, description = "Saved checklist, or a blank one"),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
async fn get_checklist(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<ChecklistQuery>,
) -> ApiResult<Json<IndicatorChecklist>> {
    let id = record_id(&id)?;
    let (date, shift) = checklist_key(&query)?;
    let ward = state.ward();
    let form = ward.checklist_form(&id, date, shift, Utc::now())?;
    Ok(Json(form.checklist().clone()))
}

#[utoipa::path(
    put,
    path = "/patients/{id}/checklist",
    params(("id" = String, Path, description = "Patient id"), ChecklistQuery),
    responses(
        (status = 200, description = "Checklist updated and saved"),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Apply checklist edits and save the result for the patient, date and shift
async fn save_checklist(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<ChecklistQuery>,
    Json(updates): Json<Vec<ChecklistUpdate>>,
) -> ApiResult<Json<IndicatorChecklist>> {
    let id = record_id(&id)?;
    let (date, shift) = checklist_key(&query)?;
    let mut ward = state.ward();
    let now = Utc::now();
    let mut form = ward.checklist_form(&id, date, shift, now)?;
    for update in updates {
        form.update(update);
    }
    Ok(Json(ward.save_checklist(&form, now).clone()))
}

#[utoipa::path(
    get,
    path = "/scale",
    responses((status = 200, description = "Scale entries, newest first"))
)]
async fn list_scale(State(state): State<AppState>) -> Json<Vec<ScaleEntry>> {
    Json(state.ward().scale().entries().to_vec())
}

#[utoipa::path(
    get,
    path = "/scale/template",
    responses((status = 200, description = "CSV template", content_type = "text/csv"))
)]
async fn scale_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{SCALE_TEMPLATE_FILENAME}\""),
            ),
        ],
        import::template(),
    )
}

#[utoipa::path(
    post,
    path = "/scale/import",
    request_body = ScaleImportReq,
    responses(
        (status = 200, description = "Import report; bad rows are listed, not fatal"),
        (status = 400, description = "Not a CSV file or wrong header", body = ErrorRes)
    )
)]
async fn import_scale(
    State(state): State<AppState>,
    Json(req): Json<ScaleImportReq>,
) -> ApiResult<Json<ImportReport>> {
    let mut ward = state.ward();
    let report = ward.import_scale(&req.file_name, req.content.as_bytes(), Utc::now())?;
    Ok(Json(report.clone()))
}

#[utoipa::path(
    post,
    path = "/scale/{id}/validate",
    params(("id" = String, Path, description = "Scale entry id")),
    responses(
        (status = 200, description = "Entry validated"),
        (status = 404, description = "Unknown entry", body = ErrorRes)
    )
)]
async fn validate_scale_entry(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<ScaleEntry>> {
    let id = record_id(&id)?;
    let mut ward = state.ward();
    Ok(Json(ward.scale_mut().validate_entry(&id)?.clone()))
}

#[utoipa::path(
    delete,
    path = "/scale/{id}",
    params(("id" = String, Path, description = "Scale entry id")),
    responses(
        (status = 200, description = "Removed entry"),
        (status = 404, description = "Unknown entry", body = ErrorRes)
    )
)]
async fn remove_scale_entry(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<ScaleEntry>> {
    let id = record_id(&id)?;
    let mut ward = state.ward();
    Ok(Json(ward.scale_mut().remove_entry(&id)?))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NavigationRes {
    active: Tab,
    #[serde(skip_serializing_if = "Option::is_none")]
    sbar_patient: Option<RecordId>,
    menu: Vec<MenuItem>,
}

fn navigation_res(ward: &uti_core::Ward) -> NavigationRes {
    let shell = ward.shell();
    NavigationRes {
        active: shell.active(),
        sbar_patient: shell.sbar_patient().cloned(),
        menu: shell.menu(),
    }
}

#[utoipa::path(
    get,
    path = "/navigation",
    responses((status = 200, description = "Active tab and menu"))
)]
async fn navigation(State(state): State<AppState>) -> Json<NavigationRes> {
    Json(navigation_res(&state.ward()))
}

#[utoipa::path(
    put,
    path = "/navigation",
    request_body = NavigateReq,
    responses(
        (status = 200, description = "Tab selected"),
        (status = 400, description = "Unknown tab", body = ErrorRes)
    )
)]
async fn navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateReq>,
) -> ApiResult<Json<NavigationRes>> {
    let tab: Tab = req.tab.parse()?;
    let mut ward = state.ward();
    ward.shell_mut().select(tab);
    Ok(Json(navigation_res(&ward)))
}

#[utoipa::path(
    post,
    path = "/navigation/new-sbar",
    request_body = NewSbarReq,
    responses(
        (status = 200, description = "SBAR view opened with the patient preselected"),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
async fn navigate_new_sbar(
    State(state): State<AppState>,
    Json(req): Json<NewSbarReq>,
) -> ApiResult<Json<NavigationRes>> {
    let patient_id = record_id(&req.patient_id)?;
    let mut ward = state.ward();
    ward.new_sbar(&patient_id)?;
    Ok(Json(navigation_res(&ward)))
}
