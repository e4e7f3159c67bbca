use serde_json::Value;
use yansi::Paint;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ApiError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

fn curl_preview(url: &str, method: &str, api_token: &str, body: Option<&Value>) -> String {
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(url).fg(yansi::Color::Cyan)));
    if !api_token.is_empty() {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'API-Token: ***'").fg(yansi::Color::Magenta)
        ));
    }
    if let Some(d) = body {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
        let json_str = serde_json::to_string_pretty(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!(
            "{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    parts.join(" ")
}

/// Core HTTP call against the backend API.
/// Handles authentication, request building and JSON decoding.
pub async fn api_call(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    method: &str,
    endpoint: &str,
    body: Option<Value>,
    params: Option<Vec<(String, String)>>,
) -> Result<Value, ApiError> {
    let url = format!("{}{}", api_base_url, endpoint);
    let mut url_for_log = url.clone();
    if let Some(p) = params.as_ref().filter(|p| !p.is_empty()) {
        let query_string = p
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<String>>()
            .join("&");
        url_for_log = format!("{}?{}", url_for_log, query_string);
    }
    log_output(format!("Request:\n{}", curl_preview(&url_for_log, method, api_token, body.as_ref())));
    tracing::info!(%method, %endpoint, "Calling backend API");

    let mut req = match method {
        "POST" => client.post(&url),
        "PUT" => client.put(&url),
        "DELETE" => client.delete(&url),
        _ => client.get(&url),
    };
    if !api_token.is_empty() {
        req = req.header("API-Token", api_token);
    }
    if let Some(ref p) = params {
        req = req.query(p);
    }
    if let Some(ref b) = body {
        req = req.json(b);
    }

    let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
    let result: Value = resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;

    let json_str = serde_json::to_string(&result).unwrap_or_else(|_| format!("{:?}", result));
    log_output(format!("Response:\n{}", Paint::new(json_str).rgb(100, 100, 100)));
    Ok(result)
}

/// Unwrap the backend envelope `{ "code": "OKAY", "data": ... }`.
pub fn envelope_data(payload: Value) -> Result<Value, ApiError> {
    let code = payload
        .get("code")
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string();
    if code != "OKAY" {
        let detail = payload
            .get("detail")
            .or_else(|| payload.get("error"))
            .and_then(|d| d.as_str())
            .unwrap_or("no detail")
            .to_string();
        return Err(ApiError::Rejected { code, detail });
    }
    payload.get("data").cloned().ok_or(ApiError::MissingField("data"))
}
