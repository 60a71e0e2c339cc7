use serde_json::Value;
use tracing::debug;

/// Wire protocol used to reach the vendor platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Rest,
    Soap,
}

/// Operations the REST surface handles better.
const REST_PREFERRED: &[&str] = &[
    "list_emails",
    "create_email",
    "update_email",
    "list_journeys",
    "create_journey",
    "publish_journey",
    "get_contacts",
    "create_contact",
    "list_data_extensions",
];

/// Operations that only exist (or only behave) on the legacy SOAP surface.
const SOAP_PREFERRED: &[&str] = &["bulk_data_import", "complex_retrieve", "automation_trigger"];

/// Row count above which bulk data operations go to SOAP batch semantics.
const BULK_ROW_THRESHOLD: u64 = 1000;

/// Advisory protocol decision for a logical operation name.
///
/// The exposed `rest_request`/`soap_request` tools bypass this entirely;
/// it backs operation-name-based callers. Precedence is a contract: the
/// bulk-size heuristic wins over both static tables.
pub fn route(operation: &str, params: &Value) -> Protocol {
    let row_count = params.get("rowCount").and_then(Value::as_u64).unwrap_or(0);

    let protocol = if operation.contains("data") && row_count > BULK_ROW_THRESHOLD {
        Protocol::Soap
    } else if REST_PREFERRED.contains(&operation) {
        Protocol::Rest
    } else if SOAP_PREFERRED.contains(&operation) {
        Protocol::Soap
    } else {
        Protocol::Rest
    };

    debug!(%operation, row_count, ?protocol, "advisory route");
    protocol
}
