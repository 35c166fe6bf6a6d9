//! Build-system descriptor types.

use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;

/// Name of the manifest table patched on save.
pub const BUILD_SYSTEM_TABLE: &str = "build-system";

/// Declared build backend for a project.
///
/// Staged on a manifest via `set_build_system` and written into the
/// `[build-system]` table on the next save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSystem {
    /// Packages required to run the build backend.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Fully qualified backend identifier.
    #[serde(rename = "build-backend")]
    pub build_backend: String,
}

impl BuildSystem {
    /// Create a descriptor from a requirements list and a backend identifier.
    pub fn new(requires: Vec<String>, build_backend: impl Into<String>) -> Self {
        Self {
            requires,
            build_backend: build_backend.into(),
        }
    }

    /// Read the `[build-system]` table declared in `document`, if any.
    ///
    /// Entries that are not a table, or tables without a string
    /// `build-backend`, yield `None`.
    pub fn from_document(document: &DocumentMut) -> Option<Self> {
        let table = document.get(BUILD_SYSTEM_TABLE)?.as_table()?;
        let build_backend = table.get("build-backend")?.as_str()?.to_string();

        let requires = match table.get("requires").and_then(|item| item.as_array()) {
            Some(array) => array
                .iter()
                .filter_map(|value| value.as_str())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        Some(Self {
            requires,
            build_backend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_document() {
        let document: DocumentMut =
            "[build-system]\nrequires = [\"pkg>=1.0\"]\nbuild-backend = \"backend.x\"\n"
                .parse()
                .unwrap();

        let build_system = BuildSystem::from_document(&document).unwrap();
        assert_eq!(build_system.requires, vec!["pkg>=1.0".to_string()]);
        assert_eq!(build_system.build_backend, "backend.x");
    }

    #[test]
    fn test_from_document_missing_table() {
        let document: DocumentMut = "name = \"demo\"\n".parse().unwrap();
        assert!(BuildSystem::from_document(&document).is_none());
    }

    #[test]
    fn test_from_document_missing_requires() {
        let document: DocumentMut = "[build-system]\nbuild-backend = \"backend.x\"\n"
            .parse()
            .unwrap();

        let build_system = BuildSystem::from_document(&document).unwrap();
        assert!(build_system.requires.is_empty());
    }

    #[test]
    fn test_from_document_non_table_entry() {
        let document: DocumentMut = "build-system = \"nope\"\n".parse().unwrap();
        assert!(BuildSystem::from_document(&document).is_none());
    }

    #[test]
    fn test_serialization_uses_manifest_key_names() {
        let build_system = BuildSystem::new(vec!["pkg>=1.0".to_string()], "backend.x");
        let json = serde_json::to_string(&build_system).unwrap();

        assert!(json.contains("\"build-backend\":\"backend.x\""));
        assert!(json.contains("\"requires\":[\"pkg>=1.0\"]"));
    }
}
