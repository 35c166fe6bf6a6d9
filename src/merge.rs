//! Override merge engine.
//!
//! Merge semantics, dispatched on the override item's kind:
//! - Tables: deep-merge by key (recursive)
//! - Arrays, scalars, inline tables: REPLACE (override wins entirely)
//! - Table override onto a non-table base entry: error, never a coercion
//!
//! The engine operates purely on in-memory trees and knows nothing about
//! files.

use toml_edit::{Item, Table};

/// Errors from merging an override document into a base document.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("cannot merge table override into '{key}': base entry is {found}, expected a table")]
    TypeMismatch { key: String, found: &'static str },
}

/// Merge `overrides` into `base`, mutating `base` in place.
///
/// Keys absent from `base` are appended with the formatting they carry in the
/// override document. Keys present in both are replaced wholesale unless the
/// override value is a table, in which case the tables are merged
/// recursively. A table override onto an existing non-table entry fails with
/// [`MergeError::TypeMismatch`].
pub fn apply_overrides(base: &mut Table, overrides: &Table) -> Result<(), MergeError> {
    merge_tables(base, overrides, "")
}

fn merge_tables(base: &mut Table, overrides: &Table, prefix: &str) -> Result<(), MergeError> {
    for (key, override_item) in overrides.iter() {
        match override_item {
            Item::Table(override_table) => match base.get_mut(key) {
                None => {
                    base.insert(key, override_item.clone());
                }
                Some(Item::Table(base_table)) => {
                    merge_tables(base_table, override_table, &joined_key(prefix, key))?;
                }
                Some(other) => {
                    return Err(MergeError::TypeMismatch {
                        key: joined_key(prefix, key),
                        found: other.type_name(),
                    });
                }
            },
            // Leaf-like items (scalars, arrays, inline tables, arrays of
            // tables) replace the base entry wholesale. Remove-then-insert
            // keeps the override's own formatting on the new entry.
            _ => {
                base.remove(key);
                base.insert(key, override_item.clone());
            }
        }
    }

    Ok(())
}

fn joined_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
