use crate::error::ApiError;
use crate::models::{Catalog, ProductLineItem};
use super::client::{api_call, envelope_data};

/// Load the product catalog.
/// Entries that fail to decode are skipped with a warning.
pub async fn load_catalog(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
) -> Result<Catalog, ApiError> {
    let params = vec![("per_page".to_string(), "1000".to_string())];
    let payload = api_call(client, api_base_url, api_token, "GET", "/v1/products", None, Some(params)).await?;
    let data = envelope_data(payload)?;
    let arr = data.as_array().ok_or(ApiError::MissingField("data[]"))?;
    let mut items = Vec::with_capacity(arr.len());
    for raw in arr {
        match serde_json::from_value::<ProductLineItem>(raw.clone()) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!(%e, "Skipping malformed catalog entry"),
        }
    }
    tracing::info!(items = items.len(), "Loaded catalog from backend");
    Ok(Catalog::new(items))
}
