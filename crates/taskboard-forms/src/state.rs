// File: src/state.rs
// Purpose: Form session holding one draft and its validation errors

use tracing::debug;

use crate::errors::ErrorMap;
use crate::labels::LabelTable;
use crate::model::{FieldLens, FormModel};

/// One editable draft plus the errors of its last validation
///
/// The form is "clean" while [`errors`](Self::errors) is empty and "invalid"
/// otherwise. Only [`validate`](Self::validate) and [`reset`](Self::reset)
/// move between the two; [`set_field`](Self::set_field) never does.
#[derive(Debug, Clone)]
pub struct FormState<T: FormModel> {
    initial: T,
    draft: T,
    required: Vec<T::Field>,
    labels: LabelTable<T::Field>,
    errors: ErrorMap<T::Field>,
}

impl<T: FormModel> FormState<T> {
    /// Start a form session from `initial` values
    ///
    /// `required` lists the fields that must be non-blank, in the order they
    /// are checked. Labels default to the ones declared on the model.
    pub fn new(initial: T, required: &[T::Field]) -> Self {
        Self {
            draft: initial.clone(),
            initial,
            required: required.to_vec(),
            labels: LabelTable::declared::<T>(),
            errors: ErrorMap::new(),
        }
    }

    /// Replace the label table used for error messages
    pub fn with_labels(mut self, labels: LabelTable<T::Field>) -> Self {
        self.labels = labels;
        self
    }

    /// Current draft values
    pub fn draft(&self) -> &T {
        &self.draft
    }

    /// Values captured at construction, restored by [`reset`](Self::reset)
    pub fn initial(&self) -> &T {
        &self.initial
    }

    pub fn get<L: FieldLens<T>>(&self, lens: L) -> &L::Value {
        lens.get(&self.draft)
    }

    /// Replace one field of the draft
    ///
    /// Errors are left as they are; call [`validate`](Self::validate) again
    /// to refresh them.
    pub fn set_field<L: FieldLens<T>>(&mut self, lens: L, value: L::Value) {
        lens.set(&mut self.draft, value);
    }

    /// Check every required field and replace the error map
    ///
    /// A field fails when its display text, trimmed, is empty or absent.
    /// Returns true when no field failed.
    pub fn validate(&mut self) -> bool {
        let mut errors = ErrorMap::new();

        for &field in &self.required {
            let blank = self
                .draft
                .field_text(field)
                .map_or(true, |text| text.trim().is_empty());

            if blank {
                errors.insert(field, format!("{} is required.", self.labels.resolve(field)));
            }
        }

        if !errors.is_empty() {
            debug!(invalid = errors.len(), "form validation failed");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Restore the construction values and clear all errors
    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
        self.errors = ErrorMap::new();
    }

    /// Replace the draft with `values` and clear all errors
    ///
    /// The construction values are kept, so a later [`reset`](Self::reset)
    /// still returns to them.
    pub fn reset_to(&mut self, values: T) {
        self.draft = values;
        self.errors = ErrorMap::new();
    }

    pub fn errors(&self) -> &ErrorMap<T::Field> {
        &self.errors
    }

    pub fn error(&self, field: T::Field) -> Option<&str> {
        self.errors.get(field)
    }

    /// True when the last validation found nothing (or the form was reset since)
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn required_fields(&self) -> &[T::Field] {
        &self.required
    }

    pub fn labels(&self) -> &LabelTable<T::Field> {
        &self.labels
    }

    pub fn into_draft(self) -> T {
        self.draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKey, Lens};
    use crate::value::FieldValue;
    use std::borrow::Cow;

    // Hand-written model so these tests do not depend on the derive
    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        title: String,
        count: Option<u32>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum EntryField {
        Title,
        Count,
    }

    impl FieldKey for EntryField {
        fn name(self) -> &'static str {
            match self {
                EntryField::Title => "title",
                EntryField::Count => "count",
            }
        }

        fn label(self) -> Option<&'static str> {
            match self {
                EntryField::Title => Some("Title"),
                EntryField::Count => None,
            }
        }
    }

    impl FormModel for Entry {
        type Field = EntryField;

        fn fields() -> &'static [EntryField] {
            &[EntryField::Title, EntryField::Count]
        }

        fn field_text(&self, field: EntryField) -> Option<Cow<'_, str>> {
            match field {
                EntryField::Title => self.title.field_text(),
                EntryField::Count => self.count.field_text(),
            }
        }
    }

    const TITLE: Lens<Entry, String> = Lens::new(EntryField::Title, title_ref, title_mut);
    const COUNT: Lens<Entry, Option<u32>> = Lens::new(EntryField::Count, count_ref, count_mut);

    fn title_ref(entry: &Entry) -> &String {
        &entry.title
    }

    fn title_mut(entry: &mut Entry) -> &mut String {
        &mut entry.title
    }

    fn count_ref(entry: &Entry) -> &Option<u32> {
        &entry.count
    }

    fn count_mut(entry: &mut Entry) -> &mut Option<u32> {
        &mut entry.count
    }

    fn blank() -> Entry {
        Entry {
            title: String::new(),
            count: None,
        }
    }

    fn form() -> FormState<Entry> {
        FormState::new(blank(), &[EntryField::Title, EntryField::Count])
    }

    #[test]
    fn test_new_copies_initial_values() {
        let form = form();
        assert_eq!(form.draft(), &blank());
        assert!(form.is_clean());
        assert_eq!(form.required_fields(), &[EntryField::Title, EntryField::Count]);
    }

    #[test]
    fn test_set_field_leaves_other_fields() {
        let mut form = form();
        form.set_field(TITLE, "Hello".to_string());

        assert_eq!(form.get(TITLE), "Hello");
        assert_eq!(form.get(COUNT), &None);
        assert_eq!(form.initial(), &blank());
    }

    #[test]
    fn test_set_field_does_not_touch_errors() {
        let mut form = form();
        assert!(!form.validate());

        form.set_field(TITLE, "Hello".to_string());
        assert!(form.errors().has_error(EntryField::Title));
        assert!(!form.is_clean());
    }

    #[test]
    fn test_absent_value_is_required() {
        let mut form = form();
        form.set_field(TITLE, "Hello".to_string());

        assert!(!form.validate());
        assert_eq!(form.error(EntryField::Count), Some("count is required."));
        assert_eq!(form.error(EntryField::Title), None);
    }

    #[test]
    fn test_zero_counts_as_present() {
        let mut form = form();
        form.set_field(TITLE, "Hello".to_string());
        form.set_field(COUNT, Some(0));

        assert!(form.validate());
    }

    #[test]
    fn test_validate_replaces_stale_errors() {
        let mut form = FormState::new(blank(), &[EntryField::Title]);
        assert!(!form.validate());

        form.set_field(TITLE, "Hello".to_string());
        assert!(form.validate());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_only_required_fields_are_checked() {
        let mut form = FormState::new(blank(), &[EntryField::Count]);
        assert!(!form.validate());

        let fields: Vec<_> = form.errors().fields().collect();
        assert_eq!(fields, vec![EntryField::Count]);
    }

    #[test]
    fn test_custom_label_table() {
        let labels = LabelTable::new().with(EntryField::Count, "Quantity");
        let mut form = form().with_labels(labels);

        form.validate();
        assert_eq!(form.error(EntryField::Count), Some("Quantity is required."));
        // Replacing the table drops the declared "Title" label
        assert_eq!(form.error(EntryField::Title), Some("title is required."));
    }

    #[test]
    fn test_reset_restores_initial_and_clears_errors() {
        let mut form = form();
        form.set_field(TITLE, "Hello".to_string());
        form.validate();

        form.reset();
        assert_eq!(form.draft(), &blank());
        assert!(form.is_clean());
    }

    #[test]
    fn test_reset_to_keeps_initial_for_later_reset() {
        let mut form = form();
        let loaded = Entry {
            title: "Loaded".to_string(),
            count: Some(4),
        };

        form.validate();
        form.reset_to(loaded.clone());
        assert_eq!(form.draft(), &loaded);
        assert!(form.is_clean());

        form.reset();
        assert_eq!(form.draft(), &blank());
    }

    #[test]
    fn test_into_draft() {
        let mut form = form();
        form.set_field(COUNT, Some(2));
        assert_eq!(form.into_draft().count, Some(2));
    }
}
