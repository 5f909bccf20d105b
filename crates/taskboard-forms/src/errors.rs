// File: src/errors.rs
// Purpose: Per-field validation messages produced by FormState::validate

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::FieldKey;

/// Field keys to error messages
///
/// Only invalid fields have an entry. Iteration follows field declaration
/// order. Serializes as a map from raw field name to message, which is the
/// shape templates and JSON responses expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMap<F: FieldKey> {
    errors: BTreeMap<F, String>,
}

impl<F: FieldKey> ErrorMap<F> {
    /// Create an empty error map
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, field: F, message: String) {
        self.errors.insert(field, message);
    }

    /// Check if field has an error
    pub fn has_error(&self, field: F) -> bool {
        self.errors.contains_key(&field)
    }

    /// Get error message for a field
    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Fields that currently have an error
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> + '_ {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Messages keyed by raw field name
    pub fn to_named(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, message)| (field.name(), message.clone()))
            .collect()
    }
}

impl<F: FieldKey> Default for ErrorMap<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FieldKey> Serialize for ErrorMap<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, message) in &self.errors {
            map.serialize_entry(field.name(), message)?;
        }
        map.end()
    }
}
