//! Derive macros for `choice_form`.

mod select_choice;

use proc_macro::TokenStream;
use proc_macro_crate::crate_name;
use quote::quote;
use syn::DeriveInput;

use crate::select_choice::impl_select_choice_for_enum;

/// Derives `SelectChoice` for an enum with unit variants only.
///
/// The value and the label of each variant default to the variant name. Both
/// can be overridden with `#[select_choice(value = "...", label = "...")]`.
#[proc_macro_derive(SelectChoice, attributes(select_choice))]
pub fn derive_select_choice(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);
    let token_stream = impl_select_choice_for_enum(&ast);
    token_stream.into()
}

pub(crate) fn choice_form_ident() -> proc_macro2::TokenStream {
    let choice_form_crate = crate_name("choice_form")
        .expect("choice_form is not present in `Cargo.toml`");
    match choice_form_crate {
        proc_macro_crate::FoundCrate::Itself => {
            quote! { ::choice_form }
        }
        proc_macro_crate::FoundCrate::Name(name) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote! { ::#ident }
        }
    }
}
