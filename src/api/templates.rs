use crate::error::ApiError;
use crate::models::{TemplateGroup, VmTemplate};
use super::client::{api_call, envelope_data};

/// Load predefined VM templates.
pub async fn load_templates(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
) -> Result<Vec<VmTemplate>, ApiError> {
    let payload = api_call(client, api_base_url, api_token, "GET", "/v1/vm-templates", None, None).await?;
    let data = envelope_data(payload)?;
    let arr = data.as_array().ok_or(ApiError::MissingField("data[]"))?;
    let templates: Vec<VmTemplate> = arr
        .iter()
        .filter_map(|raw| match serde_json::from_value(raw.clone()) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(%e, "Skipping malformed VM template");
                None
            }
        })
        .collect();
    Ok(templates)
}

pub fn templates_in_group(templates: &[VmTemplate], group: TemplateGroup) -> Vec<&VmTemplate> {
    templates.iter().filter(|t| t.group == group).collect()
}
