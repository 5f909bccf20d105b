// File: taskboard-forms-derive/src/model.rs
// Purpose: FormModel derive macro and #[form] attribute processing

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr, Type};

/// One struct field as seen by the derive
struct FieldSpec {
    ident: Ident,
    name: String,
    variant: Ident,
    lens: Ident,
    vis: syn::Visibility,
    ty: Type,
    label: Option<LitStr>,
}

/// Parse `#[form(label = "...")]` from a field
fn extract_label(field: &Field) -> syn::Result<Option<LitStr>> {
    let mut label = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("form") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("label") {
                label = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported form attribute, expected `label = \"...\"`"))
            }
        })?;
    }

    Ok(label)
}

fn parse_field(field: &Field) -> syn::Result<FieldSpec> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "FormModel fields must be named"))?;
    let name = ident.unraw().to_string();

    Ok(FieldSpec {
        variant: format_ident!("{}", pascal_case(&name)),
        lens: format_ident!("{}", name.to_uppercase()),
        label: extract_label(field)?,
        vis: field.vis.clone(),
        ty: field.ty.clone(),
        ident,
        name,
    })
}

/// `project_id` -> `ProjectId`
fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Generate the field enum, lens constants and FormModel impl for a struct
pub fn impl_form_model(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "FormModel does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "FormModel only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "FormModel only supports structs",
            ))
        }
    };

    let specs = fields
        .iter()
        .map(parse_field)
        .collect::<syn::Result<Vec<_>>>()?;

    if specs.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "FormModel needs at least one field",
        ));
    }

    let field_enum = format_ident!("{}Field", name);
    let enum_doc = format!("Field keys of [`{}`]", name);

    let variants: Vec<_> = specs.iter().map(|s| &s.variant).collect();
    let names: Vec<_> = specs.iter().map(|s| &s.name).collect();
    let labels = specs.iter().map(|s| match &s.label {
        Some(label) => quote! { ::core::option::Option::Some(#label) },
        None => quote! { ::core::option::Option::None },
    });

    let text_arms = specs.iter().map(|s| {
        let variant = &s.variant;
        let ident = &s.ident;
        quote! {
            #field_enum::#variant => ::taskboard_forms::FieldValue::field_text(&self.#ident),
        }
    });

    let lenses = specs.iter().map(|s| {
        let FieldSpec {
            ident,
            variant,
            lens,
            vis,
            ty,
            name: field_name,
            ..
        } = s;
        let get = format_ident!("__form_{}_ref", field_name);
        let get_mut = format_ident!("__form_{}_mut", field_name);
        let doc = format!("Lens for the `{}` field", field_name);

        quote! {
            #[doc = #doc]
            #vis const #lens: ::taskboard_forms::Lens<Self, #ty> =
                ::taskboard_forms::Lens::new(#field_enum::#variant, Self::#get, Self::#get_mut);

            #[doc(hidden)]
            fn #get(model: &Self) -> &#ty {
                &model.#ident
            }

            #[doc(hidden)]
            fn #get_mut(model: &mut Self) -> &mut #ty {
                &mut model.#ident
            }
        }
    });

    Ok(quote! {
        #[doc = #enum_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #vis enum #field_enum {
            #(#variants,)*
        }

        impl ::taskboard_forms::FieldKey for #field_enum {
            fn name(self) -> &'static str {
                match self {
                    #(#field_enum::#variants => #names,)*
                }
            }

            fn label(self) -> ::core::option::Option<&'static str> {
                match self {
                    #(#field_enum::#variants => #labels,)*
                }
            }
        }

        impl ::core::fmt::Display for #field_enum {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(::taskboard_forms::FieldKey::name(*self))
            }
        }

        #[allow(dead_code)]
        impl #name {
            #(#lenses)*
        }

        impl ::taskboard_forms::FormModel for #name {
            type Field = #field_enum;

            fn fields() -> &'static [#field_enum] {
                &[#(#field_enum::#variants,)*]
            }

            fn field_text(
                &self,
                field: #field_enum,
            ) -> ::core::option::Option<::std::borrow::Cow<'_, str>> {
                match field {
                    #(#text_arms)*
                }
            }
        }
    })
}
