// Drives both executors end to end against local stubs (token endpoint +
// API instance) and asserts the never-throw boundary: every failure mode
// comes back as a text result, never as an error or a panic.

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use axum::routing::{get, post};
    use axum::{Json, Router};
    use http::header::CONTENT_TYPE;
    use http::{HeaderMap, StatusCode};
    use serde_json::{json, Map, Value};

    use crate::executor::rest::{RestMethod, RestRequestSpec};
    use crate::executor::RequestExecutor;
    use crate::soap::spec::{SoapAction, SoapRequestSpec};
    use crate::tests::common::{spawn_axum, spawn_token_stub, test_settings};

    fn rest_spec(method: RestMethod, path: &str) -> RestRequestSpec {
        RestRequestSpec {
            method,
            path: path.to_owned(),
            query: None,
            headers: None,
            body: None,
            business_unit_id: None,
        }
    }

    fn soap_spec(action: SoapAction, object_type: &str) -> SoapRequestSpec {
        SoapRequestSpec {
            action,
            object_type: object_type.to_owned(),
            objects: None,
            properties: Some(vec!["Name".to_owned()]),
            filter: None,
            options: None,
            business_unit_id: None,
        }
    }

    /// Executor wired to a fresh token stub whose instance URLs point at
    /// `api_addr`.
    async fn executor_for(api_addr: std::net::SocketAddr) -> RequestExecutor {
        let (_stub, token_addr) = spawn_token_stub(format!("http://{api_addr}/"), 3600).await;
        RequestExecutor::new(test_settings(token_addr))
    }

    #[tokio::test]
    async fn rest_happy_path_renders_pretty_json() {
        let router = Router::new().route(
            "/hub/v1/campaigns",
            get(|| async { Json(json!({"count": 1, "items": [{"id": 7}]})) }),
        );
        let (_handle, api_addr) = spawn_axum(router).await;
        let executor = executor_for(api_addr).await;

        let result = executor
            .execute_rest(&rest_spec(RestMethod::Get, "hub/v1/campaigns"))
            .await;
        assert!(result.text.contains("\"count\": 1"));
        assert!(result.text.contains("\"id\": 7"));
    }

    #[tokio::test]
    async fn rest_empty_body_reports_the_status() {
        let router = Router::new().route("/gone", get(|| async { StatusCode::NO_CONTENT }));
        let (_handle, api_addr) = spawn_axum(router).await;
        let executor = executor_for(api_addr).await;

        let result = executor.execute_rest(&rest_spec(RestMethod::Get, "gone")).await;
        assert_eq!(result.text, "HTTP 204 (empty response)");
    }

    #[tokio::test]
    async fn rest_error_statuses_still_render_the_body() {
        let router = Router::new().route(
            "/hub/v1/nope",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"message": "not found"}))) }),
        );
        let (_handle, api_addr) = spawn_axum(router).await;
        let executor = executor_for(api_addr).await;

        let result = executor
            .execute_rest(&rest_spec(RestMethod::Get, "hub/v1/nope"))
            .await;
        // No exception on 4xx; the caller reads the payload.
        assert!(result.text.contains("not found"));
    }

    #[tokio::test]
    async fn rest_network_failure_is_a_text_error() {
        // Token issuance succeeds but the instance URL is unreachable.
        let (_stub, token_addr) = spawn_token_stub("http://127.0.0.1:9/".into(), 3600).await;
        let executor = RequestExecutor::new(test_settings(token_addr));

        let result = executor.execute_rest(&rest_spec(RestMethod::Get, "x")).await;
        assert!(result.text.starts_with("Error"), "got: {}", result.text);
    }

    #[tokio::test]
    async fn missing_credentials_are_a_text_error() {
        let executor = RequestExecutor::new(Default::default());

        let rest = executor.execute_rest(&rest_spec(RestMethod::Get, "x")).await;
        assert_eq!(rest.text, "Error: missing credential: MCE_CLIENT_ID");

        let soap = executor.execute_soap(&soap_spec(SoapAction::Retrieve, "Subscriber")).await;
        assert!(soap.text.starts_with("Error"));
    }

    #[tokio::test]
    async fn caller_headers_merge_but_cannot_override_the_bearer() {
        let router = Router::new().route(
            "/echo-headers",
            get(|headers: HeaderMap| async move {
                let pick = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_owned()
                };
                Json(json!({
                    "authorization": pick("authorization"),
                    "x-custom": pick("x-custom"),
                    "content-type": pick("content-type"),
                }))
            }),
        );
        let (_handle, api_addr) = spawn_axum(router).await;
        let executor = executor_for(api_addr).await;

        let mut spec = rest_spec(RestMethod::Get, "echo-headers");
        spec.headers = Some(HashMap::from([
            ("Authorization".to_owned(), "Bearer forged".to_owned()),
            ("x-custom".to_owned(), "1".to_owned()),
        ]));

        let result = executor.execute_rest(&spec).await;
        assert!(result.text.contains("\"authorization\": \"Bearer tok-1\""));
        assert!(result.text.contains("\"x-custom\": \"1\""));
        assert!(result.text.contains("application/json"));
    }

    #[tokio::test]
    async fn structured_query_values_are_json_stringified_on_the_wire() {
        let router = Router::new().route(
            "/echo-query",
            get(|axum::extract::RawQuery(q): axum::extract::RawQuery| async move {
                q.unwrap_or_default()
            }),
        );
        let (_handle, api_addr) = spawn_axum(router).await;
        let executor = executor_for(api_addr).await;

        let mut query = Map::new();
        query.insert("page".to_owned(), json!(2));
        query.insert("filter".to_owned(), json!({"name": "Leads"}));
        let mut spec = rest_spec(RestMethod::Get, "echo-query");
        spec.query = Some(query);

        let result = executor.execute_rest(&spec).await;
        assert!(result.text.contains("page=2"), "got: {}", result.text);
        // The object value went out as a JSON string (percent-encoded).
        assert!(result.text.contains("%7B%22name%22"), "got: {}", result.text);
    }

    #[tokio::test]
    async fn soap_request_carries_action_and_token_and_returns_the_body() {
        let router = Router::new().route(
            "/Service.asmx",
            post(|headers: HeaderMap, body: String| async move {
                let action = headers
                    .get("SOAPAction")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_owned();
                let xml = format!(
                    "<soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\">\
                     <soap:Body><EchoResponse><Action>{action}</Action>\
                     <HasToken>{}</HasToken></EchoResponse></soap:Body></soap:Envelope>",
                    body.contains("<fueloauth xmlns=\"http://exacttarget.com\">tok-1</fueloauth>")
                );
                ([(CONTENT_TYPE, "text/xml; charset=UTF-8")], xml)
            }),
        );
        let (_handle, api_addr) = spawn_axum(router).await;
        let executor = executor_for(api_addr).await;

        let result = executor
            .execute_soap(&soap_spec(SoapAction::Retrieve, "DataExtension"))
            .await;
        assert!(result.text.contains("\"Action\": \"Retrieve\""), "got: {}", result.text);
        assert!(result.text.contains("\"HasToken\": \"true\""), "got: {}", result.text);
    }

    #[tokio::test]
    async fn soap_fault_surfaces_the_detail() {
        const FAULT: &str = "<soap:Envelope xmlns:soap=\"http://www.w3.org/2003/05/soap-envelope\">\
            <soap:Body><soap:Fault><faultcode>soap:Client</faultcode>\
            <faultstring>Token Expired</faultstring></soap:Fault></soap:Body></soap:Envelope>";
        let router = Router::new().route(
            "/Service.asmx",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, FAULT) }),
        );
        let (_handle, api_addr) = spawn_axum(router).await;
        let executor = executor_for(api_addr).await;

        let result = executor
            .execute_soap(&soap_spec(SoapAction::Retrieve, "DataExtension"))
            .await;
        assert!(result.text.contains("Token Expired"), "got: {}", result.text);
    }

    #[tokio::test]
    async fn soap_unsupported_action_is_a_text_error() {
        let (_stub, token_addr) = spawn_token_stub("http://127.0.0.1:9/".into(), 3600).await;
        let executor = RequestExecutor::new(test_settings(token_addr));

        let result = executor
            .execute_soap(&soap_spec(SoapAction::Perform, "Automation"))
            .await;
        assert_eq!(result.text, "Error: unsupported SOAP action: Perform");
    }
}
