use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::handlers::helpers::{error_response, existing_session_id, session_cookie};
use crate::models::{
    AppState, Quote, QuoteSession, Transition, VmConfiguration, VmTemplate, WizardDraft, WizardStep,
    WizardUpdate, MAX_VMS,
};
use crate::services::{apply_update, delete_vm, go_to_step, session_quote, step_complete, submit};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub draft: WizardDraft,
    /// Completion flag per step, in step order.
    pub completed: Vec<bool>,
    pub vm_count: usize,
    pub max_vms: usize,
    pub can_create: bool,
}

fn wizard_view(session: &QuoteSession, templates: &[VmTemplate]) -> WizardView {
    WizardView {
        draft: session.wizard.clone(),
        completed: WizardStep::ALL
            .iter()
            .map(|s| step_complete(&session.wizard, *s, templates))
            .collect(),
        vm_count: session.vms.len(),
        max_vms: MAX_VMS,
        can_create: session.can_create_vm(),
    }
}

pub async fn wizard_get(State(state): State<AppState>, jar: CookieJar) -> Json<WizardView> {
    let sid = existing_session_id(&jar);
    let templates = state.templates_snapshot();
    Json(state.read_session(sid.as_deref(), |s| wizard_view(s, &templates)))
}

pub async fn wizard_put(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(update): Json<WizardUpdate>,
) -> impl IntoResponse {
    let (jar, sid) = session_cookie(jar);
    let templates = state.templates_snapshot();
    let view = state.with_session(&sid, |s| {
        apply_update(&mut s.wizard, update, &templates);
        wizard_view(s, &templates)
    });
    (jar, Json(view))
}

#[derive(Deserialize)]
pub struct StepRequest {
    pub step: WizardStep,
}

/// Rejected moves still answer 200; the body says where the wizard stayed.
pub async fn wizard_step_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<StepRequest>,
) -> impl IntoResponse {
    let (jar, sid) = session_cookie(jar);
    let templates = state.templates_snapshot();
    let transition: Transition = state.with_session(&sid, |s| go_to_step(&mut s.wizard, req.step, &templates));
    (jar, Json(transition))
}

#[derive(Serialize)]
pub struct CreatedVm {
    pub vm: VmConfiguration,
    pub quote: Quote,
}

pub async fn wizard_submit(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, sid) = session_cookie(jar);
    let catalog = state.catalog_snapshot();
    let templates = state.templates_snapshot();
    let now = chrono::Utc::now().timestamp_millis();
    let result = state.with_session(&sid, |s| {
        submit(s, &catalog, &templates, now).map(|vm| CreatedVm {
            vm,
            quote: session_quote(s),
        })
    });
    match result {
        Ok(created) => (jar, (StatusCode::CREATED, Json(created))).into_response(),
        Err(e) => (jar, e).into_response(),
    }
}

pub async fn vm_delete(State(state): State<AppState>, jar: CookieJar, Path(id): Path<String>) -> Response {
    let sid = existing_session_id(&jar);
    if state
        .with_existing_session(sid.as_deref(), |s| delete_vm(s, &id))
        .unwrap_or(false)
    {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, format!("VM not found: {}", id))
    }
}
