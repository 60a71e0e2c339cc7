use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, warn};

/// Bundle keys and the files backing them.
const BUNDLE_FILES: &[(&str, &str)] = &[
    ("rest_api", "rest_api.json"),
    ("soap_api", "soap_api.json"),
    ("data_extensions", "data_extensions.json"),
    ("journeys", "journeys.json"),
];

/// Immutable documentation bundle, loaded once at startup and injected into
/// the server. A file that fails to load is omitted from the bundle rather
/// than failing startup.
#[derive(Debug, Clone, Default)]
pub struct DocsBundle {
    entries: Map<String, Value>,
}

impl DocsBundle {
    pub fn load(dir: &Path) -> Self {
        let mut entries = Map::new();
        for (key, file) in BUNDLE_FILES {
            let path = dir.join(file);
            match fs::read_to_string(&path) {
                Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                    Ok(value) => {
                        entries.insert((*key).to_owned(), value);
                    }
                    Err(err) => {
                        warn!(file = %path.display(), %err, "skipping malformed documentation file")
                    }
                },
                Err(err) => {
                    warn!(file = %path.display(), %err, "skipping unreadable documentation file")
                }
            }
        }
        info!(
            loaded = entries.len(),
            total = BUNDLE_FILES.len(),
            "documentation bundle loaded"
        );
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON of the whole bundle.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&Value::Object(self.entries.clone()))
            .unwrap_or_else(|_| "{}".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn loads_known_files_and_skips_broken_ones() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("rest_api.json"),
            r#"{"title": "REST API", "endpoints": []}"#,
        )
        .unwrap();
        fs::write(dir.path().join("soap_api.json"), "{not json").unwrap();
        // data_extensions.json and journeys.json are simply absent.

        let bundle = DocsBundle::load(dir.path());
        let rendered = bundle.render();
        assert!(rendered.contains("\"rest_api\""));
        assert!(rendered.contains("\"title\": \"REST API\""));
        assert!(!rendered.contains("soap_api"));
        assert!(!rendered.contains("journeys"));
    }

    #[test]
    fn missing_directory_yields_an_empty_bundle() {
        let bundle = DocsBundle::load(Path::new("/nonexistent/docs"));
        assert!(bundle.is_empty());
        assert_eq!(bundle.render(), "{}");
    }
}
