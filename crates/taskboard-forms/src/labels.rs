// File: src/labels.rs
// Purpose: Field -> human label table used in error messages

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::model::{FieldKey, FormModel};

/// Mapping from field key to display label
///
/// Fields without an entry are shown by their raw name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable<F: FieldKey> {
    labels: BTreeMap<F, Cow<'static, str>>,
}

impl<F: FieldKey> LabelTable<F> {
    /// Create an empty table (every field falls back to its raw name)
    pub fn new() -> Self {
        Self {
            labels: BTreeMap::new(),
        }
    }

    /// Labels declared on the model with `#[form(label = "...")]`
    pub fn declared<T>() -> Self
    where
        T: FormModel<Field = F>,
    {
        T::fields()
            .iter()
            .filter_map(|field| field.label().map(|label| (*field, label)))
            .collect()
    }

    /// Add or replace a label
    pub fn with(mut self, field: F, label: impl Into<Cow<'static, str>>) -> Self {
        self.insert(field, label);
        self
    }

    pub fn insert(&mut self, field: F, label: impl Into<Cow<'static, str>>) {
        self.labels.insert(field, label.into());
    }

    /// Label for a field, if one is mapped
    pub fn get(&self, field: F) -> Option<&str> {
        self.labels.get(&field).map(|label| label.as_ref())
    }

    /// Label for a field, or its raw name when unmapped
    pub fn resolve(&self, field: F) -> &str {
        self.get(field).unwrap_or_else(|| field.name())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<F: FieldKey> Default for LabelTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, L> FromIterator<(F, L)> for LabelTable<F>
where
    F: FieldKey,
    L: Into<Cow<'static, str>>,
{
    fn from_iter<I: IntoIterator<Item = (F, L)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(field, label)| (field, label.into()))
                .collect(),
        }
    }
}
