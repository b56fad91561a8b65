use crate::report::{AnalysisReport, MetricsInput};
use crate::settings::LlmSettings;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const SETTINGS_FALLBACK: &str = "Failed to save settings.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-success status; the message is the body's
    /// `error` field, or a generic fallback when the body had none.
    #[error("{0}")]
    Api(String),
    /// The request never completed, or a success body could not be decoded.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct SettingsAck {
    message: String,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    report: AnalysisReport,
}

/// HTTP client for the analyzer server's two endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(server: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: normalize_server(server),
        }
    }

    /// Sends the LLM settings as JSON to `/update-settings` and returns the
    /// server's confirmation message.
    pub async fn update_settings(&self, payload: &LlmSettings) -> Result<String, ApiError> {
        let url = format!("{}/update-settings", self.base_url);
        let response = self.http.post(&url).json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = error_from_response(response, SETTINGS_FALLBACK.to_string()).await;
            tracing::warn!(%status, "settings update rejected");
            return Err(error);
        }

        let ack: SettingsAck = response.json().await?;
        Ok(ack.message)
    }

    /// Sends the six metrics fields URL-encoded to `/analyze` and returns
    /// the parsed report.
    pub async fn analyze(&self, input: &MetricsInput) -> Result<AnalysisReport, ApiError> {
        let url = format!("{}/analyze", self.base_url);
        let response = self.http.post(&url).form(input).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let fallback = format!("HTTP error! Status: {}", status.as_u16());
            let error = error_from_response(response, fallback).await;
            tracing::warn!(%status, "analyze request rejected");
            return Err(error);
        }

        let body: AnalyzeResponse = response.json().await?;
        Ok(body.report)
    }
}

/// Turns a non-success response into an [`ApiError::Api`], preferring the
/// body's `error` field over the caller's fallback message.
async fn error_from_response(response: Response, fallback: String) -> ApiError {
    let message = match response.json::<Value>().await {
        Ok(body) => extract_error(&body).unwrap_or(fallback),
        Err(_) => fallback,
    };
    ApiError::Api(message)
}

fn extract_error(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn normalize_server(server: &str) -> String {
    let base = if server.starts_with("http") {
        server.to_string()
    } else {
        format!("http://{}", server)
    };
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_bare_host_and_trailing_slash() {
        assert_eq!(normalize_server("localhost:8000"), "http://localhost:8000");
        assert_eq!(
            normalize_server("https://analyzer.example.com/"),
            "https://analyzer.example.com"
        );
        assert_eq!(
            normalize_server("http://10.0.0.5:8000"),
            "http://10.0.0.5:8000"
        );
    }

    #[test]
    fn prefers_structured_error_field() {
        let body = json!({"error": "Previous day's data cannot contain zero values for calculations."});
        assert_eq!(
            extract_error(&body).as_deref(),
            Some("Previous day's data cannot contain zero values for calculations.")
        );
    }

    #[test]
    fn missing_error_field_yields_none() {
        assert!(extract_error(&json!({"detail": "boom"})).is_none());
        assert!(extract_error(&json!({"error": 42})).is_none());
    }

    #[test]
    fn metrics_input_encodes_all_six_fields() {
        let input = MetricsInput {
            daily_revenue: "100".to_string(),
            daily_cost: "40".to_string(),
            daily_customers: "10".to_string(),
            prev_revenue: "90".to_string(),
            prev_cost: "45".to_string(),
            prev_customers: "9".to_string(),
        };

        let encoded = serde_urlencoded::to_string(&input).unwrap();
        assert!(encoded.contains("daily_revenue=100"));
        assert!(encoded.contains("prev_customers=9"));
        assert_eq!(encoded.matches('=').count(), 6);
    }
}
