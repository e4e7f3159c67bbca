use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::{load_catalog, load_templates, templates_in_group};
use crate::models::{AppState, ServiceFamily, TemplateGroup};
use crate::handlers::helpers::error_response;

#[derive(Deserialize)]
pub struct CatalogQuery {
    pub family: Option<String>,
}

pub async fn catalog_get(State(state): State<AppState>, Query(q): Query<CatalogQuery>) -> Response {
    let catalog = state.catalog_snapshot();
    match q.family.as_deref().map(str::parse::<ServiceFamily>) {
        None => Json(catalog.items().to_vec()).into_response(),
        Some(Ok(family)) => Json(catalog.in_family(family).cloned().collect::<Vec<_>>()).into_response(),
        Some(Err(e)) => error_response(StatusCode::BAD_REQUEST, e),
    }
}

/// Reload catalog and templates from the backend. Existing VMs keep the
/// prices they were created with.
pub async fn catalog_refresh(State(state): State<AppState>) -> Response {
    let catalog = match load_catalog(&state.client, &state.api_base_url, &state.api_token).await {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };
    let templates = match load_templates(&state.client, &state.api_base_url, &state.api_token).await {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };
    let counts = json!({ "products": catalog.len(), "templates": templates.len() });
    state.replace_catalog(catalog);
    state.replace_templates(templates);
    Json(counts).into_response()
}

#[derive(Deserialize)]
pub struct TemplateQuery {
    pub group: Option<TemplateGroup>,
}

pub async fn templates_get(State(state): State<AppState>, Query(q): Query<TemplateQuery>) -> impl IntoResponse {
    let templates = state.templates_snapshot();
    let list: Vec<_> = match q.group {
        Some(group) => templates_in_group(&templates, group).into_iter().cloned().collect(),
        None => templates.to_vec(),
    };
    Json(list)
}
