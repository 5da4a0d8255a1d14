// crates/provider-testkit-generator/src/schema.rs
// ============================================================================
// Module: Resource Schema Digest
// Description: Digested view of a resource schema's extension keywords.
// Purpose: Expose identifier and mutability markers, and derive pruned
// schemas for create and update generation.
// Dependencies: crate::error, crate::pointer, serde_json
// ============================================================================

//! ## Overview
//! A resource schema is a JSON Schema document plus orchestrator extension
//! keywords marking the primary identifier and read-only, create-only, and
//! write-only properties. [`ResourceSchema`] digests those markers once and
//! derives the pruned schema variants generation draws from: create examples
//! omit read-only properties, update examples additionally omit create-only
//! properties. Pruning also drops the pruned names from sibling `required`
//! lists so the pruned schema stays internally consistent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::GeneratorError;
use crate::pointer::decode_pointer;

// ============================================================================
// SECTION: Property Paths
// ============================================================================

/// Decoded property path, e.g. `["properties", "Id"]`.
pub type PropertyPath = Vec<String>;

// ============================================================================
// SECTION: Schema Digest
// ============================================================================

/// Digested resource schema with extension-keyword markers.
///
/// # Invariants
/// - `raw` is the schema document exactly as supplied.
/// - Marker sets hold decoded paths rooted at the schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSchema {
    /// Schema document as supplied.
    raw: Value,
    /// Primary identifier paths, in schema order.
    primary_identifier: Vec<PropertyPath>,
    /// Read-only property paths.
    read_only: BTreeSet<PropertyPath>,
    /// Create-only property paths.
    create_only: BTreeSet<PropertyPath>,
    /// Write-only property paths.
    write_only: BTreeSet<PropertyPath>,
}

impl ResourceSchema {
    /// Digests a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] when the document is not an object or an
    /// extension pointer cannot be decoded.
    pub fn parse(raw: Value) -> Result<Self, GeneratorError> {
        if !raw.is_object() {
            return Err(GeneratorError::InvalidSchema(
                "schema document must be a JSON object".to_string(),
            ));
        }
        let primary_identifier = pointer_list(&raw, "primaryIdentifier")?;
        let read_only = pointer_set(&raw, "readOnlyProperties")?;
        let create_only = pointer_set(&raw, "createOnlyProperties")?;
        let write_only = pointer_set(&raw, "writeOnlyProperties")?;
        Ok(Self {
            raw,
            primary_identifier,
            read_only,
            create_only,
            write_only,
        })
    }

    /// Returns the schema document as supplied.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns the primary identifier paths in schema order.
    #[must_use]
    pub fn primary_identifier(&self) -> &[PropertyPath] {
        &self.primary_identifier
    }

    /// Returns the read-only property paths.
    #[must_use]
    pub const fn read_only(&self) -> &BTreeSet<PropertyPath> {
        &self.read_only
    }

    /// Returns the create-only property paths.
    #[must_use]
    pub const fn create_only(&self) -> &BTreeSet<PropertyPath> {
        &self.create_only
    }

    /// Returns the write-only property paths.
    #[must_use]
    pub const fn write_only(&self) -> &BTreeSet<PropertyPath> {
        &self.write_only
    }

    /// Returns true when every primary identifier is caller-assigned.
    ///
    /// Scenarios that re-create the same identifier (duplicate-create) only
    /// make sense when the caller controls the identifier values.
    #[must_use]
    pub fn has_only_writable_identifiers(&self) -> bool {
        self.primary_identifier.iter().all(|path| self.create_only.contains(path))
    }

    /// Returns the schema create examples are drawn from.
    ///
    /// Read-only properties (and their `required` entries) are pruned.
    #[must_use]
    pub fn create_schema(&self) -> Value {
        let mut doc = self.raw.clone();
        for path in &self.read_only {
            prune_property(&mut doc, path);
        }
        doc
    }

    /// Returns the schema update examples are drawn from.
    ///
    /// Read-only and create-only properties are pruned.
    #[must_use]
    pub fn update_schema(&self) -> Value {
        let mut doc = self.raw.clone();
        for path in self.read_only.iter().chain(self.create_only.iter()) {
            prune_property(&mut doc, path);
        }
        doc
    }

    /// Reads the model value a property path points at.
    #[must_use]
    pub fn model_value<'model>(model: &'model Value, path: &[String]) -> Option<&'model Value> {
        let mut current = model;
        for key in model_keys(path) {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// Writes a model value at a property path, creating parent objects.
    pub fn set_model_value(model: &mut Value, path: &[String], value: Value) {
        let keys: Vec<&String> = model_keys(path).collect();
        let Some((leaf, parents)) = keys.split_last() else {
            return;
        };
        let mut current = model;
        for key in parents {
            if !current.get(*key).is_some_and(Value::is_object) {
                if let Some(obj) = current.as_object_mut() {
                    obj.insert((*key).clone(), Value::Object(serde_json::Map::new()));
                }
            }
            match current.get_mut(*key) {
                Some(next) => current = next,
                None => return,
            }
        }
        if let Some(obj) = current.as_object_mut() {
            obj.insert((*leaf).clone(), value);
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Iterates the model-facing keys of a schema property path.
///
/// Schema paths interleave `properties` markers with property names; models
/// carry only the names.
fn model_keys(path: &[String]) -> impl Iterator<Item = &String> {
    path.iter().filter(|segment| segment.as_str() != "properties")
}

/// Decodes a pointer-list extension keyword preserving order.
fn pointer_list(raw: &Value, keyword: &str) -> Result<Vec<PropertyPath>, GeneratorError> {
    let Some(entries) = raw.get(keyword) else {
        return Ok(Vec::new());
    };
    let entries = entries.as_array().ok_or_else(|| {
        GeneratorError::InvalidSchema(format!("{keyword} must be an array of pointers"))
    })?;
    let mut paths = Vec::with_capacity(entries.len());
    for entry in entries {
        let pointer = entry.as_str().ok_or_else(|| {
            GeneratorError::InvalidSchema(format!("{keyword} entries must be strings"))
        })?;
        paths.push(decode_pointer(pointer)?);
    }
    Ok(paths)
}

/// Decodes a pointer-list extension keyword into a set.
fn pointer_set(raw: &Value, keyword: &str) -> Result<BTreeSet<PropertyPath>, GeneratorError> {
    Ok(pointer_list(raw, keyword)?.into_iter().collect())
}

/// Removes the property a path names, along with its `required` entry.
///
/// Missing paths are a no-op, matching the permissive pruning the pointers
/// were designed for.
fn prune_property(node: &mut Value, path: &[String]) {
    if path.len() == 2 && path[0] == "properties" {
        if let Some(obj) = node.as_object_mut() {
            if let Some(props) = obj.get_mut("properties").and_then(Value::as_object_mut) {
                props.remove(&path[1]);
            }
            if let Some(required) = obj.get_mut("required").and_then(Value::as_array_mut) {
                required.retain(|name| name.as_str() != Some(path[1].as_str()));
            }
        }
        return;
    }
    if let Some((head, rest)) = path.split_first()
        && !rest.is_empty()
        && let Some(child) = node.get_mut(head)
    {
        prune_property(child, rest);
    }
}
