use serde_json::{json, Value};

use crate::error::ApiError;
use crate::models::{CustomerInfo, Quote};
use super::client::{api_call, envelope_data};

/// Request body for quote submission: customer, VM entries and flat add-ons.
pub fn quote_payload(customer: &CustomerInfo, quote: &Quote) -> Value {
    let vms: Vec<&_> = quote.vm_items().collect();
    let products: Vec<&_> = quote.addon_items().collect();
    json!({
        "customer": customer,
        "vms": vms,
        "products": products,
        "totalCost": quote.total_cost,
    })
}

/// Submit a quote and return the identifier the backend assigns.
pub async fn submit_quote(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    customer: &CustomerInfo,
    quote: &Quote,
) -> Result<String, ApiError> {
    let body = quote_payload(customer, quote);
    let payload = api_call(client, api_base_url, api_token, "POST", "/v1/quotes", Some(body), None).await?;
    let data = envelope_data(payload)?;
    let id = data
        .get("id")
        .or_else(|| data.get("quoteId"))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .ok_or(ApiError::MissingField("id"))?;
    tracing::info!(quote_id = %id, items = quote.len(), total = quote.total_cost, "Submitted quote");
    Ok(id)
}

/// Ask the backend to deploy a previously submitted quote.
pub async fn deploy_quote(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    quote_id: &str,
) -> Result<Value, ApiError> {
    let endpoint = format!("/v1/quotes/{}/deploy", quote_id);
    let payload = api_call(client, api_base_url, api_token, "POST", &endpoint, None, None).await?;
    envelope_data(payload)
}
