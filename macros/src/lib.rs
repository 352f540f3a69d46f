//! Derive macros for the Gathering church site store
//!
//! This crate provides procedural macros to reduce boilerplate when defining
//! action enums for a reducer.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `gathering_core::action::Action` for an enum
//!
//! # Example
//!
//! ```ignore
//! use gathering_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum NoteAction {
//!     #[touches(notes)]
//!     AddNote(String),
//!     Refresh,
//! }
//!
//! // Generated:
//! assert_eq!(NoteAction::AddNote("hi".into()).name(), "ADD_NOTE");
//! assert_eq!(NoteAction::Refresh.touches(), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, parse_macro_input};

/// Derive macro for Action enums
///
/// Implements `gathering_core::action::Action`:
/// - `name()` - The variant name in `SCREAMING_SNAKE_CASE` (`AddSermon` → `ADD_SERMON`)
/// - `touches()` - The collection named by the variant's `#[touches(..)]` attribute
///
/// Also generates an inherent `NAMES` constant listing every tag in
/// declaration order.
///
/// The generated matches list every variant without a wildcard, so adding a
/// variant never silently falls through.
///
/// # Attributes
///
/// - `#[touches(collection)]` - Mark the state collection a variant writes to
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A `#[touches(..)]` attribute does not hold a single identifier
/// - A variant has more than one `#[touches(..)]` attribute
#[proc_macro_derive(Action, attributes(touches))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut name_arms = Vec::new();
    let mut touches_arms = Vec::new();
    let mut tags = Vec::new();

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;
        let tag = screaming_snake_case(&variant_name.to_string());

        let touches = match touched_collection(&variant.attrs) {
            Ok(touches) => touches,
            Err(error) => return error.to_compile_error().into(),
        };

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) },
            Fields::Unit => quote! { Self::#variant_name },
        };

        name_arms.push(quote! { #pattern => #tag, });

        let touches_value = match touches {
            Some(collection) => {
                let collection = collection.to_string();
                quote! { ::core::option::Option::Some(#collection) }
            }
            None => quote! { ::core::option::Option::None },
        };
        touches_arms.push(quote! { #pattern => #touches_value, });

        tags.push(tag);
    }

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Every action tag, in declaration order
            pub const NAMES: &'static [&'static str] = &[#(#tags),*];
        }

        impl #impl_generics ::gathering_core::action::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            fn touches(&self) -> ::core::option::Option<&'static str> {
                match self {
                    #(#touches_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Reads the optional `#[touches(collection)]` attribute of a variant
fn touched_collection(attrs: &[Attribute]) -> syn::Result<Option<Ident>> {
    let mut found: Option<Ident> = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("touches")) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a variant can only have one #[touches(..)] attribute",
            ));
        }
        found = Some(attr.parse_args::<Ident>()?);
    }

    Ok(found)
}

/// `AddSermon` → `ADD_SERMON`
fn screaming_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut previous_lower = false;

    for ch in ident.chars() {
        if ch.is_ascii_uppercase() && previous_lower {
            out.push('_');
        }
        previous_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        out.push(ch.to_ascii_uppercase());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::screaming_snake_case;

    #[test]
    fn converts_variant_names() {
        assert_eq!(screaming_snake_case("AddSermon"), "ADD_SERMON");
        assert_eq!(screaming_snake_case("SetLivestream"), "SET_LIVESTREAM");
        assert_eq!(screaming_snake_case("UpdateChurchSettings"), "UPDATE_CHURCH_SETTINGS");
        assert_eq!(screaming_snake_case("Unknown"), "UNKNOWN");
    }
}
