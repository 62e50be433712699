use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Lowercases a type name and inserts `_` at word boundaries, `BookGenre` -> `book_genre`.
fn snake_case(name: &str) -> String {
    let mut s = String::new();
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() && i != 0 {
            s.push('_');
        }
        s.extend(c.to_lowercase());
    }
    s
}

#[proc_macro_derive(Names)]
pub fn derive_names(input: TokenStream) -> TokenStream {
    let DeriveInput { ident, .. } = parse_macro_input!(input);
    let singular = snake_case(&ident.to_string());
    let plural = singular.clone() + "s";
    quote! {
        impl crate::traits::Names for #ident {
            const NAME_SINGULAR: &'static str = #singular;
            const NAME_PLURAL: &'static str = #plural;
            const TABLE_NAME: &'static str = #plural;
        }
    }
    .into()
}

#[proc_macro_derive(Id)]
pub fn derive_id(input: TokenStream) -> TokenStream {
    let DeriveInput { ident, .. } = parse_macro_input!(input);
    quote! {
        impl crate::traits::Id for #ident {
            fn id(&self) -> &crate::types::uuid::Uuid {
                &self.id
            }
        }
    }
    .into()
}
