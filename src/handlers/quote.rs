use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::api::{deploy_quote, submit_quote};
use crate::handlers::helpers::{existing_session_id, session_cookie};
use crate::models::{AppState, CustomerInfo, Quote};
use crate::services::{clear_quote, remove_line_item, select_addon, session_quote};

pub async fn quote_get(State(state): State<AppState>, jar: CookieJar) -> Json<Quote> {
    let sid = existing_session_id(&jar);
    Json(state.read_session(sid.as_deref(), session_quote))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonRequest {
    pub product_id: String,
}

pub async fn addon_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<AddonRequest>,
) -> Response {
    let (jar, sid) = session_cookie(jar);
    let catalog = state.catalog_snapshot();
    match state.with_session(&sid, |s| select_addon(s, &catalog, &req.product_id)) {
        Ok(quote) => (jar, Json(quote)).into_response(),
        Err(e) => (jar, e).into_response(),
    }
}

/// Removing an id that is not in the quote returns the quote unchanged.
pub async fn quote_item_delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let sid = existing_session_id(&jar);
    let quote = state
        .with_existing_session(sid.as_deref(), |s| remove_line_item(s, &id))
        .unwrap_or_default();
    Json(quote)
}

pub async fn quote_clear_post(State(state): State<AppState>, jar: CookieJar) -> Json<Quote> {
    let sid = existing_session_id(&jar);
    Json(state.with_existing_session(sid.as_deref(), clear_quote).unwrap_or_default())
}

pub async fn quote_submit_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(customer): Json<CustomerInfo>,
) -> Response {
    let sid = existing_session_id(&jar);
    let quote = state.read_session(sid.as_deref(), session_quote);
    match submit_quote(&state.client, &state.api_base_url, &state.api_token, &customer, &quote).await {
        Ok(quote_id) => Json(json!({ "quoteId": quote_id, "quote": quote })).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn quote_deploy_post(State(state): State<AppState>, Path(quote_id): Path<String>) -> Response {
    match deploy_quote(&state.client, &state.api_base_url, &state.api_token, &quote_id).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => e.into_response(),
    }
}
