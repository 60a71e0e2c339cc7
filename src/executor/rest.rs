use std::collections::HashMap;

use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::MceError;
use crate::executor::{NormalizedResult, RequestExecutor};

/// HTTP methods exposed on the REST tool surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RestMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            RestMethod::Get => reqwest::Method::GET,
            RestMethod::Post => reqwest::Method::POST,
            RestMethod::Put => reqwest::Method::PUT,
            RestMethod::Patch => reqwest::Method::PATCH,
            RestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// REST call description as supplied by the caller. Matches the
/// `rest_request` tool arguments one to one; constructed per call.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestRequestSpec {
    /// HTTP method.
    pub method: RestMethod,
    /// Path under the instance REST base URL, e.g. `asset/v1/content/assets`.
    pub path: String,
    /// Query parameters; object and array values are JSON-stringified.
    pub query: Option<Map<String, Value>>,
    /// Extra request headers. The bearer token cannot be overridden.
    pub headers: Option<HashMap<String, String>>,
    /// JSON body, or a raw string passed through unchanged.
    pub body: Option<Value>,
    /// Business unit (MID) scope for this call.
    pub business_unit_id: Option<String>,
}

impl RequestExecutor {
    /// Execute a REST call. Never fails: any error renders as text.
    pub async fn execute_rest(&self, spec: &RestRequestSpec) -> NormalizedResult {
        match self.try_rest(spec).await {
            Ok(result) => result,
            Err(err) => {
                warn!(%err, path = %spec.path, "rest call failed");
                NormalizedResult::from_error(&err)
            }
        }
    }

    async fn try_rest(&self, spec: &RestRequestSpec) -> Result<NormalizedResult, MceError> {
        let token = self.tokens.get_token(spec.business_unit_id.as_deref()).await?;
        let url = join_url(&token.rest_base_url, &spec.path);

        let mut request = self.client.request(spec.method.as_reqwest(), &url);

        if let Some(query) = &spec.query {
            let pairs: Vec<(String, String)> = query
                .iter()
                .map(|(key, value)| (key.clone(), query_text(value)))
                .collect();
            request = request.query(&pairs);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (key, value) in spec.headers.iter().flatten() {
            // The bearer token is set below and wins over caller headers.
            if key.eq_ignore_ascii_case("authorization") {
                continue;
            }
            match (key.parse::<HeaderName>(), HeaderValue::from_str(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %key, "dropping invalid request header"),
            }
        }
        let bearer = format!("Bearer {}", token.access_token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|e| MceError::Parse(e.to_string()))?,
        );
        request = request.headers(headers);

        if let Some(body) = &spec.body {
            request = match body {
                Value::String(raw) => request.body(raw.clone()),
                other => request.json(other),
            };
        }

        debug!(method = ?spec.method, %url, "sending rest request");
        // Any status is accepted; the caller reads it from the result text.
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(render_rest_response(status, &body))
    }
}

/// Join the instance base URL and a caller path without doubling slashes.
fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Query values: strings pass through, everything structured is
/// JSON-stringified before appending.
fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pretty JSON when the body parses, plain text otherwise.
fn render_rest_response(status: u16, body: &str) -> NormalizedResult {
    if body.is_empty() {
        return NormalizedResult::text(format!("HTTP {status} (empty response)"));
    }
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => NormalizedResult::text(
            serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| body.to_owned()),
        ),
        Err(_) => NormalizedResult::text(body.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("https://x.rest.example/", "/hub/v1/campaigns"),
            "https://x.rest.example/hub/v1/campaigns"
        );
        assert_eq!(
            join_url("https://x.rest.example", "hub/v1/campaigns"),
            "https://x.rest.example/hub/v1/campaigns"
        );
    }

    #[test]
    fn structured_query_values_are_json_stringified() {
        assert_eq!(query_text(&json!("plain")), "plain");
        assert_eq!(query_text(&json!(42)), "42");
        assert_eq!(query_text(&json!({"page": {"size": 5}})), r#"{"page":{"size":5}}"#);
        assert_eq!(query_text(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn response_rendering() {
        assert_eq!(
            render_rest_response(204, "").text,
            "HTTP 204 (empty response)"
        );
        let pretty = render_rest_response(200, r#"{"count":1}"#).text;
        assert!(pretty.contains("\"count\": 1"));
        assert_eq!(render_rest_response(200, "plain text").text, "plain text");
    }

    #[test]
    fn methods_deserialize_from_uppercase() {
        let method: RestMethod = serde_json::from_value(json!("PATCH")).unwrap();
        assert_eq!(method, RestMethod::Patch);
    }
}
