//! Layered project manifest.
//!
//! A [`LayeredManifest`] combines a base manifest file with an optional
//! `override.toml` next to it. Reads see the merged view; writes go to the
//! base file only, and override values are never written back. The cached
//! view is kept until [`LayeredManifest::reload`] discards it.

use std::path::PathBuf;

use toml_edit::{value, Array, DocumentMut};

use crate::build_system::{BuildSystem, BUILD_SYSTEM_TABLE};
use crate::merge::{apply_overrides, MergeError};
use crate::store::{StoreError, TomlFile};

/// Fixed file name of the override document, looked up in the base file's
/// directory.
pub const OVERRIDE_FILE_NAME: &str = "override.toml";

/// Errors from loading or saving a layered manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("existing 'build-system' entry is {found}, expected a table")]
    BuildSystemKind { found: &'static str },
}

/// Cached document state between a load and the next reload.
#[derive(Debug)]
struct LoadedDocument {
    /// Merged logical view served to callers.
    view: DocumentMut,

    /// Pristine copy of the base document, kept only when an override was
    /// merged into the view. Save writes this copy so override values never
    /// reach the base file. `None` means the view IS the base tree.
    base: Option<DocumentMut>,
}

/// A project manifest with layered overrides and format-preserving saves.
#[derive(Debug)]
pub struct LayeredManifest {
    file: TomlFile,
    override_file: TomlFile,
    loaded: Option<LoadedDocument>,
    build_system: Option<BuildSystem>,
}

impl LayeredManifest {
    /// Create a manifest handle for the given base file path. The override
    /// path is derived by replacing the file name with
    /// [`OVERRIDE_FILE_NAME`]. No file is touched until the first read.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let override_path = path.with_file_name(OVERRIDE_FILE_NAME);

        Self {
            file: TomlFile::new(path),
            override_file: TomlFile::new(override_path),
            loaded: None,
            build_system: None,
        }
    }

    /// The base manifest file. Sole write target.
    pub fn file(&self) -> &TomlFile {
        &self.file
    }

    /// The override file. Read-only, optional.
    pub fn override_file(&self) -> &TomlFile {
        &self.override_file
    }

    /// The staged build-system descriptor, if a patch is pending.
    pub fn build_system(&self) -> Option<&BuildSystem> {
        self.build_system.as_ref()
    }

    /// Stage a build-system descriptor to be applied on the next save. The
    /// document itself is not touched until then.
    pub fn set_build_system(&mut self, build_system: BuildSystem) {
        self.build_system = Some(build_system);
    }

    /// The merged logical view of the manifest.
    ///
    /// The first call loads the base file (a missing base file yields a
    /// fresh empty document) and merges the override file into it if one
    /// exists. Later calls return the same cached tree, so in-place edits
    /// are visible on subsequent reads without a save/reload cycle.
    pub fn data(&mut self) -> Result<&mut DocumentMut, ManifestError> {
        self.ensure_loaded()?;
        Ok(&mut self.loaded.as_mut().expect("loaded above").view)
    }

    /// Write the manifest back to the base file.
    ///
    /// If a build-system descriptor is staged, a `build-system` table is
    /// created when absent and exactly its `requires` and `build-backend`
    /// keys are overwritten; everything else in the document keeps its
    /// content and formatting. When an override was merged, the pristine
    /// base document is patched and written instead of the merged view, so
    /// override values stay out of the file. The override file is never
    /// consulted or written.
    ///
    /// A failed write leaves the cache and the staged descriptor intact, so
    /// save can be retried without reloading.
    pub fn save(&mut self) -> Result<(), ManifestError> {
        self.ensure_loaded()?;
        let loaded = self.loaded.as_mut().expect("loaded above");

        if let Some(build_system) = &self.build_system {
            patch_build_system(&mut loaded.view, build_system)?;
            if let Some(base) = &mut loaded.base {
                patch_build_system(base, build_system)?;
            }
        }

        let document = loaded.base.as_ref().unwrap_or(&loaded.view);
        self.file.write(document)?;
        Ok(())
    }

    /// Discard the cached view and any staged build-system descriptor. The
    /// next read triggers a fresh load-and-merge cycle, picking up on-disk
    /// changes made since the last load.
    pub fn reload(&mut self) {
        self.loaded = None;
        self.build_system = None;
    }

    fn ensure_loaded(&mut self) -> Result<(), ManifestError> {
        if self.loaded.is_some() {
            return Ok(());
        }

        // A missing base file is a valid not-yet-initialized project, not an
        // error.
        let loaded = if !self.file.exists() {
            LoadedDocument {
                view: DocumentMut::new(),
                base: None,
            }
        } else {
            let base = self.file.read()?;
            if self.override_file.exists() {
                let overrides = self.override_file.read()?;
                let mut view = base.clone();
                apply_overrides(view.as_table_mut(), overrides.as_table())?;
                LoadedDocument {
                    view,
                    base: Some(base),
                }
            } else {
                LoadedDocument { view: base, base: None }
            }
        };

        self.loaded = Some(loaded);
        Ok(())
    }
}

/// Overwrite the `requires` and `build-backend` keys of the document's
/// `build-system` table, creating the table if absent. Other keys under the
/// table are left untouched.
fn patch_build_system(
    document: &mut DocumentMut,
    build_system: &BuildSystem,
) -> Result<(), ManifestError> {
    let entry = document
        .entry(BUILD_SYSTEM_TABLE)
        .or_insert_with(toml_edit::table);

    let found = entry.type_name();
    match entry.as_table_mut() {
        Some(table) => {
            let mut requires = Array::new();
            for requirement in &build_system.requires {
                requires.push(requirement.as_str());
            }

            table["requires"] = value(requires);
            table["build-backend"] = value(build_system.build_backend.as_str());
            Ok(())
        }
        None => Err(ManifestError::BuildSystemKind { found }),
    }
}
