// taskboard-forms procedural macros
// Provides #[derive(FormModel)] for draft structs

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod model;

/// Derive `taskboard_forms::FormModel` for a struct with named fields
///
/// Generates a `<Struct>Field` enum with one variant per field, one typed
/// lens constant per field (`Struct::FIELD_NAME`), and the `FormModel` impl.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, FormModel)]
/// struct TaskDraft {
///     #[form(label = "Title")]
///     title: String,
///     #[form(label = "Project")]
///     project_id: String,
/// }
///
/// let mut form = FormState::new(draft, &[TaskDraftField::Title, TaskDraftField::ProjectId]);
/// form.set_field(TaskDraft::PROJECT_ID, "3".to_string());
/// ```
///
/// # Attributes
///
/// - `#[form(label = "...")]` - display label used in error messages
#[proc_macro_derive(FormModel, attributes(form))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::impl_form_model(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
