use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::models::{
    AppState, PriceBreakdown, StorageTier, VmSpec, CLOCK_TIERS_GHZ, CUSTOM_MEMORY_OPTIONS_GB, MAX_VMS,
    STORAGE_RANGE_GB, VCPU_RANGE,
};
use crate::services::{compute_price, price_breakdown};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub monthly_price: f64,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PriceBreakdown>,
}

/// Price a spec against the current catalog. Unpriceable specs answer with
/// a zero price rather than an error.
pub async fn price_post(State(state): State<AppState>, Json(spec): Json<VmSpec>) -> Json<PriceResponse> {
    let catalog = state.catalog_snapshot();
    let breakdown = price_breakdown(&spec, &catalog).ok();
    Json(PriceResponse {
        monthly_price: compute_price(&spec, &catalog),
        complete: breakdown.is_some(),
        breakdown,
    })
}

/// Choices offered by the custom build step.
pub async fn options_get() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "vcpus": { "min": VCPU_RANGE.start(), "max": VCPU_RANGE.end() },
        "memoryGB": CUSTOM_MEMORY_OPTIONS_GB,
        "storageGB": { "min": STORAGE_RANGE_GB.start(), "max": STORAGE_RANGE_GB.end() },
        "clockGHz": CLOCK_TIERS_GHZ,
        "tiers": StorageTier::ALL.iter().map(StorageTier::label).collect::<Vec<_>>(),
        "maxVms": MAX_VMS,
    }))
}
