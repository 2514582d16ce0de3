use darling::{Error, FromVariant};
use quote::quote;
use syn::{Data, Fields};

use crate::choice_form_ident;

#[derive(Debug, FromVariant)]
#[darling(attributes(select_choice))]
struct SelectChoiceVariant {
    ident: syn::Ident,
    value: Option<String>,
    label: Option<String>,
}

pub(super) fn impl_select_choice_for_enum(ast: &syn::DeriveInput) -> proc_macro2::TokenStream {
    let enum_name = &ast.ident;
    let choice_form = choice_form_ident();

    let variants = match &ast.data {
        Data::Enum(data_enum) => &data_enum.variants,
        _ => return Error::custom("SelectChoice can only be derived for enums").write_errors(),
    };
    if variants.is_empty() {
        return Error::custom("SelectChoice cannot be derived for empty enums")
            .with_span(&ast.ident)
            .write_errors();
    }

    let mut errors = Error::accumulator();
    let mut parsed = Vec::with_capacity(variants.len());
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            errors.push(
                Error::custom("SelectChoice can only be derived for enums with unit variants")
                    .with_span(&variant.ident),
            );
            continue;
        }
        if let Some(variant) = errors.handle(SelectChoiceVariant::from_variant(variant)) {
            parsed.push(variant);
        }
    }
    if let Err(error) = errors.finish() {
        return error.write_errors();
    }

    let variant_idents = parsed.iter().map(|v| &v.ident);
    let default_choices = quote! { vec![ #(Self::#variant_idents),* ] };

    let value_match_arms = parsed.iter().map(|v| {
        let ident = &v.ident;
        let value = v.value.clone().unwrap_or_else(|| ident.to_string());
        quote! { Self::#ident => #value, }
    });

    let label_match_arms = parsed.iter().map(|v| {
        let ident = &v.ident;
        let label = v.label.clone().unwrap_or_else(|| ident.to_string());
        quote! { Self::#ident => #label, }
    });

    quote! {
        #[automatically_derived]
        impl #choice_form::form::fields::SelectChoice for #enum_name {
            fn default_choices() -> ::std::vec::Vec<Self> {
                #default_choices
            }
            fn value(&self) -> ::std::string::String {
                match self {
                    #( #value_match_arms )*
                }.to_owned()
            }
            fn label(&self) -> ::std::string::String {
                match self {
                    #( #label_match_arms )*
                }.to_owned()
            }
        }
    }
}
