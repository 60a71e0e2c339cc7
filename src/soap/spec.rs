use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

/// SOAP actions the vendor WSDL declares. Only the first four have body
/// builders; Perform and Configure are rejected at envelope build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
pub enum SoapAction {
    Create,
    Retrieve,
    Update,
    Delete,
    Perform,
    Configure,
}

impl SoapAction {
    /// Wire name, used in the addressing header and the SOAPAction header.
    pub fn as_str(&self) -> &'static str {
        match self {
            SoapAction::Create => "Create",
            SoapAction::Retrieve => "Retrieve",
            SoapAction::Update => "Update",
            SoapAction::Delete => "Delete",
            SoapAction::Perform => "Perform",
            SoapAction::Configure => "Configure",
        }
    }
}

/// Simple comparison filter for Retrieve.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SimpleFilter {
    /// Property the filter applies to.
    pub property: String,
    /// Vendor simple operator, e.g. `equals`, `like`, `greaterThan`.
    #[serde(default = "default_operator")]
    pub operator: String,
    /// Comparison value.
    pub value: Value,
}

fn default_operator() -> String {
    "equals".to_owned()
}

/// Generic SOAP request description: action + object type + payload.
///
/// Matches the `soap_request` tool arguments one to one; constructed per
/// call and never persisted.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SoapRequestSpec {
    /// SOAP action to perform.
    pub action: SoapAction,
    /// Vendor object type, e.g. `DataExtension`, `Subscriber`, `Automation`.
    pub object_type: String,
    /// Object literals for Create/Update/Delete; only the first is used.
    pub objects: Option<Vec<Map<String, Value>>>,
    /// Property names to retrieve.
    pub properties: Option<Vec<String>>,
    /// Optional retrieve filter.
    pub filter: Option<SimpleFilter>,
    /// Extra request options, passed through untouched.
    pub options: Option<Map<String, Value>>,
    /// Business unit (MID) scope for this call.
    pub business_unit_id: Option<String>,
}

/// Typed payload for Create on the DataExtension object type. Every other
/// object type stays a generic map; this is the one shape the vendor gives
/// enough structure to deserve real fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExtensionDef {
    #[serde(default)]
    pub name: String,
    pub customer_key: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_sendable: bool,
    pub sendable_subscriber_field: Option<String>,
    #[serde(default)]
    pub fields: Vec<DataExtensionField>,
}

impl DataExtensionDef {
    /// Lenient deserialization: anything malformed degrades to defaults
    /// instead of failing the call.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(object.clone())).unwrap_or_default()
    }
}

/// One column of a data extension.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExtensionField {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_field_type")]
    pub field_type: String,
    pub max_length: Option<u64>,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_required: bool,
}

impl Default for DataExtensionField {
    fn default() -> Self {
        Self {
            name: String::new(),
            field_type: default_field_type(),
            max_length: None,
            is_primary_key: false,
            is_required: false,
        }
    }
}

fn default_field_type() -> String {
    "Text".to_owned()
}
