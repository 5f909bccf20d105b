//! # taskboard-forms
//!
//! Typed form drafts with required-field validation.
//!
//! ## Quick Start
//!
//! ```rust
//! use taskboard_forms::{FormModel, FormState};
//!
//! #[derive(Debug, Clone, PartialEq, FormModel)]
//! struct NoteDraft {
//!     #[form(label = "Title")]
//!     title: String,
//!     body: String,
//! }
//!
//! let blank = NoteDraft { title: String::new(), body: String::new() };
//! let mut form = FormState::new(blank, &[NoteDraftField::Title, NoteDraftField::Body]);
//!
//! assert!(!form.validate());
//! assert_eq!(form.error(NoteDraftField::Title), Some("Title is required."));
//! // No declared label, so the raw field name is used
//! assert_eq!(form.error(NoteDraftField::Body), Some("body is required."));
//!
//! form.set_field(NoteDraft::TITLE, "Groceries".to_string());
//! form.set_field(NoteDraft::BODY, "Milk".to_string());
//! assert!(form.validate());
//! ```
//!
//! ## Architecture
//!
//! - [`FormModel`] describes a draft struct: its field keys and the display
//!   text of each field. Usually generated by `#[derive(FormModel)]`.
//! - [`FieldLens`] gives typed access to one field, so `set_field` only
//!   accepts a value of that field's type.
//! - [`FormState`] owns one draft plus its [`ErrorMap`].

// Generated code refers to `::taskboard_forms`, including inside this crate's own tests
extern crate self as taskboard_forms;

mod errors;
mod labels;
mod model;
mod state;
mod value;

pub use errors::ErrorMap;
pub use labels::LabelTable;
pub use model::{FieldKey, FieldLens, FormModel, Lens};
pub use state::FormState;
pub use value::FieldValue;

// Re-export derive macro (always available)
pub use taskboard_forms_derive::FormModel;
