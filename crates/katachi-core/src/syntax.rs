//! Serialization detection and file loading

use crate::graph::GraphStore;
use crate::{jsonld, turtle, CoreError};
use std::fs;
use std::path::Path;

/// Supported RDF serializations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfSyntax {
    Turtle,
    JsonLd,
}

impl RdfSyntax {
    /// Infer the serialization from a file extension, if recognized
    pub fn from_path(path: &Path) -> Option<RdfSyntax> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" | "jsonld" => Some(RdfSyntax::JsonLd),
            "ttl" => Some(RdfSyntax::Turtle),
            _ => None,
        }
    }
}

/// Load a graph from a file, inferring the serialization from its suffix.
///
/// Unrecognized suffixes are attempted as JSON-LD first, then as Turtle;
/// if both fail, the error carries both parser diagnostics.
pub fn load_path(path: &Path) -> Result<GraphStore, CoreError> {
    let src = fs::read_to_string(path)?;
    match RdfSyntax::from_path(path) {
        Some(RdfSyntax::JsonLd) => jsonld::parse_str(&src),
        Some(RdfSyntax::Turtle) => turtle::parse_str(&src),
        None => match jsonld::parse_str(&src) {
            Ok(store) => Ok(store),
            Err(jsonld_err) => turtle::parse_str(&src).map_err(|turtle_err| {
                CoreError::UnknownSyntax {
                    jsonld: jsonld_err.to_string(),
                    turtle: turtle_err.to_string(),
                }
            }),
        },
    }
}

/// Load a graph from a file, strictly as Turtle (used for shape files)
pub fn load_turtle_path(path: &Path) -> Result<GraphStore, CoreError> {
    let src = fs::read_to_string(path)?;
    turtle::parse_str(&src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TTL: &str = r#"
        @prefix ex: <http://example.org/> .
        ex:a ex:p ex:b .
    "#;

    const JSONLD: &str = r#"{
        "@context": {"@vocab": "http://example.org/"},
        "@id": "http://example.org/a",
        "p": {"@id": "http://example.org/b"}
    }"#;

    fn write_named(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn detects_by_extension() {
        assert_eq!(RdfSyntax::from_path(Path::new("x.ttl")), Some(RdfSyntax::Turtle));
        assert_eq!(RdfSyntax::from_path(Path::new("x.json")), Some(RdfSyntax::JsonLd));
        assert_eq!(RdfSyntax::from_path(Path::new("x.JSONLD")), Some(RdfSyntax::JsonLd));
        assert_eq!(RdfSyntax::from_path(Path::new("x.rdf")), None);
        assert_eq!(RdfSyntax::from_path(Path::new("noext")), None);
    }

    #[test]
    fn loads_turtle_file() {
        let file = write_named(".ttl", TTL);
        let store = load_path(file.path()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn loads_jsonld_file() {
        let file = write_named(".jsonld", JSONLD);
        let store = load_path(file.path()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_extension_falls_back() {
        // JSON-LD content behind an unknown suffix parses via the fallback
        let file = write_named(".data", JSONLD);
        let store = load_path(file.path()).unwrap();
        assert_eq!(store.len(), 1);

        // Turtle content behind an unknown suffix falls through to Turtle
        let file = write_named(".data", TTL);
        let store = load_path(file.path()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_syntax_reports_both_diagnostics() {
        let file = write_named(".data", "neither { format");
        let err = load_path(file.path()).unwrap_err();
        match err {
            CoreError::UnknownSyntax { jsonld, turtle } => {
                assert!(!jsonld.is_empty());
                assert!(!turtle.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_path(Path::new("/nonexistent/file.ttl")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
