#![crate_type = "proc-macro"]

extern crate proc_macro;
mod fields;

use proc_macro::TokenStream;

/// Emit typed field descriptors for a SeaORM `Model`.
///
/// Generates `pub mod fields` next to the model with one
/// `refract::Field<Entity, T>` constant per struct field. `Option<T>` fields
/// become `Field<Entity, T>`. Mark a field `#[refract(skip)]` to leave it out.
#[proc_macro_derive(Fields, attributes(refract))]
pub fn fields_derive(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    fields::generate_fields_module(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
