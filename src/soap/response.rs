use serde_json::Value;
use tracing::warn;

use crate::executor::NormalizedResult;
use crate::soap::xml;

/// Normalize a vendor SOAP response into text.
///
/// Lenient-degrade policy: malformed vendor output never fails the call.
/// A non-success status yields the fault content when one can be found,
/// otherwise a generic error line; a success status yields the envelope
/// body as pretty JSON, or the raw body when it is not XML at all.
pub fn parse_response(status: u16, body: &str) -> NormalizedResult {
    if !(200..300).contains(&status) {
        return match fault_text(body) {
            Some(text) => NormalizedResult::text(text),
            None => NormalizedResult::text(format!("SOAP Error ({status}): {body}")),
        };
    }

    match xml::parse_to_value(body) {
        Ok(parsed) => {
            let extracted = extract_body(&parsed).unwrap_or(&parsed);
            NormalizedResult::text(pretty(extracted))
        }
        Err(err) => {
            warn!(%err, "vendor response is not valid XML, passing through raw");
            NormalizedResult::text(body.to_owned())
        }
    }
}

/// Locate the envelope body under SOAP 1.2 (`soap:`) or SOAP 1.1 (`s:`)
/// root shapes, after tag normalization.
fn extract_body(parsed: &Value) -> Option<&Value> {
    parsed
        .get("soap_Envelope")
        .and_then(|envelope| envelope.get("soap_Body"))
        .or_else(|| {
            parsed
                .get("s_Envelope")
                .and_then(|envelope| envelope.get("s_Body"))
        })
}

fn fault_text(body: &str) -> Option<String> {
    let parsed = xml::parse_to_value(body).ok()?;
    let scope = extract_body(&parsed).unwrap_or(&parsed);
    find_fault(scope).map(pretty)
}

/// Depth-first search for a Fault element key.
fn find_fault(value: &Value) -> Option<&Value> {
    let map = value.as_object()?;
    for (key, child) in map {
        if key == "Fault" || key.ends_with("_Fault") {
            return Some(child);
        }
    }
    map.values().find_map(find_fault)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
