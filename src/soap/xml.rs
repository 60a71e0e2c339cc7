use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

/// Minimal XML document model: element name plus ordered children.
///
/// Attributes are dropped on purpose; the vendor payloads of interest carry
/// their data in element text. Namespace separators in element names are
/// normalized (`:` -> `_`) so derived JSON keys stay mapping-safe.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub children: Vec<XmlChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(e),
            XmlChild::Text(_) => None,
        })
    }

    fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlChild::Text(t) => Some(t.as_str()),
                XmlChild::Element(_) => None,
            })
            .collect()
    }
}

/// Parse a document into a tree.
pub fn parse_tree(xml: &str) -> Result<XmlElement, String> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e.name().as_ref())?;
                stack.push(XmlElement { name, children: Vec::new() });
            }
            Ok(Event::End(_)) => {
                let completed = stack.pop().ok_or("unexpected closing tag")?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlChild::Element(completed));
                } else {
                    root = Some(completed);
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = element_name(e.name().as_ref())?;
                let elem = XmlElement { name, children: Vec::new() };
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlChild::Element(elem));
                } else {
                    root = Some(elem);
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|err| format!("text error: {err}"))?.to_string();
                if !text.chars().all(|c| c.is_whitespace()) {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlChild::Text(text));
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlChild::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(format!(
                    "XML parse error at byte {}: {err}",
                    reader.buffer_position()
                ))
            }
        }
    }

    if !stack.is_empty() {
        return Err("unclosed element".to_owned());
    }
    root.ok_or_else(|| "missing root element".to_owned())
}

fn element_name(raw: &[u8]) -> Result<String, String> {
    let name = std::str::from_utf8(raw).map_err(|err| format!("invalid element name: {err}"))?;
    Ok(name.replace(':', "_"))
}

/// Convert a tree to JSON: text-only elements become strings, empty elements
/// become null, repeated sibling names become arrays, single children stay
/// plain values.
pub fn element_to_value(element: &XmlElement) -> Value {
    let children: Vec<&XmlElement> = element.child_elements().collect();
    let text = element.text_content();

    if children.is_empty() {
        return if text.is_empty() { Value::Null } else { Value::String(text) };
    }

    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for child in &children {
        *name_counts.entry(child.name.as_str()).or_insert(0) += 1;
    }

    // Group children by name, preserving first-appearance order.
    let mut groups: Vec<(&str, Vec<Value>)> = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for child in &children {
        let child_value = element_to_value(child);
        if let Some(&idx) = seen.get(child.name.as_str()) {
            groups[idx].1.push(child_value);
        } else {
            seen.insert(&child.name, groups.len());
            groups.push((&child.name, vec![child_value]));
        }
    }

    let mut map = Map::new();
    for (name, values) in groups {
        if name_counts.get(name).copied().unwrap_or(0) > 1 {
            map.insert(name.to_owned(), Value::Array(values));
        } else {
            map.insert(name.to_owned(), values.into_iter().next().unwrap());
        }
    }

    if !text.is_empty() {
        map.insert("#text".to_owned(), Value::String(text));
    }

    Value::Object(map)
}

/// Parse and wrap the result under the (normalized) root element name.
pub fn parse_to_value(xml: &str) -> Result<Value, String> {
    let root = parse_tree(xml)?;
    let mut wrapper = Map::new();
    wrapper.insert(root.name.clone(), element_to_value(&root));
    Ok(Value::Object(wrapper))
}
