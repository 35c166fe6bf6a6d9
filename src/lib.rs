//! Layered project manifest management.
//!
//! This crate manages a single TOML project manifest with an optional
//! `override.toml` layered on top of it for reads. The merged view is served
//! to callers; saves patch only the tracked `build-system` table and preserve
//! the base file's comments, key ordering, and whitespace everywhere else.

pub mod build_system;
pub mod json;
pub mod manifest;
pub mod merge;
pub mod store;

pub use build_system::BuildSystem;
pub use json::document_to_json;
pub use manifest::{LayeredManifest, ManifestError, OVERRIDE_FILE_NAME};
pub use merge::{apply_overrides, MergeError};
pub use store::{StoreError, TomlFile};
