//! Derive macros for the todolists state store
//!
//! This crate provides procedural macros to reduce boilerplate when declaring
//! action vocabularies.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates type-tag helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use todolists_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoListAction {
//!     AddTodolist { title: String, todolist_id: TodoListId },
//!     SetIsAuth { is_auth: bool },
//!
//!     #[action(fallback)]
//!     Unknown,
//! }
//!
//! // Generated methods:
//! assert_eq!(TodoListAction::SetIsAuth { is_auth: true }.action_type(), "SET_IS_AUTH");
//! assert!(!TodoListAction::Unknown.is_recognized());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Variant};

/// Derive macro for Action enums
///
/// Generates helpers for action enums:
/// - `action_type()` - The wire tag of this variant (`SCREAMING_SNAKE_CASE`
///   of the variant name unless renamed)
/// - `is_recognized()` - False only for the fallback variant
/// - `ACTION_TYPES` - Every recognized tag, in declaration order
///
/// # Attributes
///
/// - `#[action(rename = "TAG")]` - Use `TAG` instead of the derived name
/// - `#[action(fallback)]` - Mark the catch-all variant for unrecognized tags
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - More than one variant is marked `#[action(fallback)]`
/// - Two variants resolve to the same tag
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum TodoListAction {
///     RemoveTask { task_id: TaskId, todolist_id: TodoListId },
///
///     #[action(rename = "SET_TODOLISTS")]
///     SetTodoLists { todo_lists: Vec<TodoList> },
/// }
///
/// assert_eq!(TodoListAction::ACTION_TYPES, &["REMOVE_TASK", "SET_TODOLISTS"]);
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut type_arms = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    let mut fallback: Option<&Variant> = None;

    for variant in &data_enum.variants {
        let options = match ActionOptions::from_attrs(&variant.attrs) {
            Ok(options) => options,
            Err(error) => return error.to_compile_error().into(),
        };

        let tag = options
            .rename
            .unwrap_or_else(|| screaming_snake_case(&variant.ident.to_string()));

        if options.fallback {
            if let Some(previous) = fallback {
                return syn::Error::new_spanned(
                    variant,
                    format!(
                        "only one variant may be #[action(fallback)], `{}` already is",
                        previous.ident
                    ),
                )
                .to_compile_error()
                .into();
            }
            fallback = Some(variant);
        } else {
            if tags.contains(&tag) {
                return syn::Error::new_spanned(
                    variant,
                    format!("action type `{tag}` is declared twice"),
                )
                .to_compile_error()
                .into();
            }
            tags.push(tag.clone());
        }

        let pattern = variant_pattern(variant);
        type_arms.push(quote! { #pattern => #tag, });
    }

    let recognized_check = fallback.map_or_else(
        || quote! { true },
        |variant| {
            let pattern = variant_pattern(variant);
            quote! { !matches!(self, #pattern) }
        },
    );

    let expanded = quote! {
        impl #name {
            /// Every recognized action type tag, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#tags),*];

            /// Returns the type tag of this action
            #[must_use]
            pub const fn action_type(&self) -> &'static str {
                // Matching the place keeps zero-variant enums exhaustive
                match *self {
                    #(#type_arms)*
                }
            }

            /// Returns false if this action carries an unrecognized type tag
            #[must_use]
            pub const fn is_recognized(&self) -> bool {
                #recognized_check
            }
        }
    };

    TokenStream::from(expanded)
}

/// Options parsed from `#[action(...)]` on a variant
#[derive(Default)]
struct ActionOptions {
    rename: Option<String>,
    fallback: bool,
}

impl ActionOptions {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut options = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    options.rename = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("fallback") {
                    options.fallback = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `rename = \"...\"` or `fallback`"))
                }
            })?;
        }

        Ok(options)
    }
}

/// Match pattern for a variant regardless of its field shape
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// `AddTodolist` -> `ADD_TODOLIST`, the same rule serde uses for
/// `rename_all = "SCREAMING_SNAKE_CASE"`
fn screaming_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.char_indices() {
        if i > 0 && ch.is_uppercase() {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}
