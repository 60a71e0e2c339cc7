use quick_xml::escape::escape;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::MceError;
use crate::soap::spec::{DataExtensionDef, SoapAction, SoapRequestSpec};

/// Namespace of the vendor's partner (SOAP) API object model.
const PARTNER_NS: &str = "http://exacttarget.com/wsdl/partnerAPI";

/// Build the full vendor SOAP envelope for a request.
///
/// Serialization is lenient: absent optional fields are omitted rather than
/// rejected. Only Create/Retrieve/Update/Delete have body builders; the
/// remaining declared actions fail with `UnsupportedAction`. The namespace
/// URIs and header element names below are what the vendor endpoint accepts;
/// do not reword them.
pub fn build_envelope(
    spec: &SoapRequestSpec,
    endpoint: &str,
    access_token: &str,
) -> Result<String, MceError> {
    let body = build_body(spec)?;

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(
        "<s:Envelope xmlns:s=\"http://www.w3.org/2003/05/soap-envelope\" \
         xmlns:a=\"http://schemas.xmlsoap.org/ws/2004/08/addressing\" \
         xmlns:u=\"http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd\">\n",
    );
    xml.push_str("  <s:Header>\n");
    xml.push_str(&format!(
        "    <a:Action s:mustUnderstand=\"1\">{}</a:Action>\n",
        spec.action.as_str()
    ));
    xml.push_str(&format!(
        "    <a:To s:mustUnderstand=\"1\">{}</a:To>\n",
        escape(endpoint)
    ));
    xml.push_str(&format!(
        "    <fueloauth xmlns=\"http://exacttarget.com\">{}</fueloauth>\n",
        escape(access_token)
    ));
    xml.push_str("  </s:Header>\n");
    xml.push_str(
        "  <s:Body xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\">\n",
    );
    xml.push_str(&body);
    xml.push_str("  </s:Body>\n");
    xml.push_str("</s:Envelope>");
    Ok(xml)
}

fn build_body(spec: &SoapRequestSpec) -> Result<String, MceError> {
    match spec.action {
        SoapAction::Create => Ok(build_create(spec)),
        SoapAction::Retrieve => Ok(build_retrieve(spec)),
        SoapAction::Update => Ok(build_object_request("UpdateRequest", spec)),
        SoapAction::Delete => Ok(build_object_request("DeleteRequest", spec)),
        other => Err(MceError::UnsupportedAction(other.as_str().to_owned())),
    }
}

/// First object literal of the payload; an absent list degrades to an empty
/// body rather than an error.
fn first_object(spec: &SoapRequestSpec) -> Option<&Map<String, Value>> {
    spec.objects.as_ref().and_then(|objects| objects.first())
}

fn build_create(spec: &SoapRequestSpec) -> String {
    let mut xml = String::new();
    xml.push_str(&format!("    <CreateRequest xmlns=\"{PARTNER_NS}\">\n"));
    if spec.object_type == "DataExtension" {
        let def = first_object(spec)
            .map(DataExtensionDef::from_object)
            .unwrap_or_default();
        xml.push_str("      <Objects xsi:type=\"DataExtension\">\n");
        push_element(&mut xml, 8, "Name", &def.name);
        push_element(
            &mut xml,
            8,
            "CustomerKey",
            def.customer_key.as_deref().unwrap_or(&def.name),
        );
        if let Some(description) = &def.description {
            push_element(&mut xml, 8, "Description", description);
        }
        if def.is_sendable {
            push_element(&mut xml, 8, "IsSendable", "true");
            xml.push_str("        <SendableSubscriberField>\n");
            push_element(
                &mut xml,
                10,
                "Name",
                def.sendable_subscriber_field.as_deref().unwrap_or("_SubscriberKey"),
            );
            xml.push_str("        </SendableSubscriberField>\n");
        }
        if !def.fields.is_empty() {
            xml.push_str("        <Fields>\n");
            for field in &def.fields {
                xml.push_str("          <Field>\n");
                push_element(&mut xml, 12, "Name", &field.name);
                push_element(&mut xml, 12, "FieldType", &field.field_type);
                if let Some(max_length) = field.max_length {
                    push_element(&mut xml, 12, "MaxLength", &max_length.to_string());
                }
                if field.is_primary_key {
                    push_element(&mut xml, 12, "IsPrimaryKey", "true");
                }
                if field.is_required {
                    push_element(&mut xml, 12, "IsRequired", "true");
                }
                xml.push_str("          </Field>\n");
            }
            xml.push_str("        </Fields>\n");
        }
        xml.push_str("      </Objects>\n");
    } else {
        xml.push_str(&format!(
            "      <Objects xsi:type=\"{}\">\n",
            escape(&spec.object_type)
        ));
        if let Some(object) = first_object(spec) {
            serialize_properties(object, 8, &mut xml);
        }
        xml.push_str("      </Objects>\n");
    }
    xml.push_str("    </CreateRequest>\n");
    xml
}

fn build_retrieve(spec: &SoapRequestSpec) -> String {
    let mut xml = String::new();
    xml.push_str(&format!("    <RetrieveRequestMsg xmlns=\"{PARTNER_NS}\">\n"));
    xml.push_str("      <RetrieveRequest>\n");
    push_element(&mut xml, 8, "ObjectType", &spec.object_type);
    for property in spec.properties.iter().flatten() {
        push_element(&mut xml, 8, "Properties", property);
    }
    if let Some(filter) = &spec.filter {
        xml.push_str("        <Filter xsi:type=\"SimpleFilterPart\">\n");
        push_element(&mut xml, 10, "Property", &filter.property);
        push_element(&mut xml, 10, "SimpleOperator", &filter.operator);
        push_element(
            &mut xml,
            10,
            "Value",
            &scalar_text(&filter.value).unwrap_or_default(),
        );
        xml.push_str("        </Filter>\n");
    }
    xml.push_str("      </RetrieveRequest>\n");
    xml.push_str("    </RetrieveRequestMsg>\n");
    xml
}

/// Update and Delete share one shape: the first object serialized flat
/// inside the respective request element.
fn build_object_request(element: &str, spec: &SoapRequestSpec) -> String {
    let mut xml = String::new();
    xml.push_str(&format!("    <{element} xmlns=\"{PARTNER_NS}\">\n"));
    xml.push_str(&format!(
        "      <Objects xsi:type=\"{}\">\n",
        escape(&spec.object_type)
    ));
    if let Some(object) = first_object(spec) {
        serialize_properties(object, 8, &mut xml);
    }
    xml.push_str("      </Objects>\n");
    xml.push_str(&format!("    </{element}>\n"));
    xml
}

/// Flat key/value serialization shared by Create (non-DataExtension), Update
/// and Delete. Scalars only: arrays, nested objects and nulls are dropped —
/// nested structures are not supported on this path.
pub fn serialize_properties(object: &Map<String, Value>, indent: usize, out: &mut String) {
    for (key, value) in object {
        match scalar_text(value) {
            Some(text) => push_element(out, indent, key, &text),
            None => debug!(%key, "dropping non-scalar property"),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn push_element(out: &mut String, indent: usize, name: &str, text: &str) {
    out.push_str(&format!(
        "{:indent$}<{name}>{}</{name}>\n",
        "",
        escape(text),
        indent = indent
    ));
}
