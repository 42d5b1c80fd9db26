use heck::ToUpperCamelCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, GenericArgument, PathArguments, Type};

pub fn generate_fields_module(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Fields can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Fields requires a struct with named fields",
        ));
    };

    let mut consts = Vec::new();
    for field in &named.named {
        if is_skipped(field)? {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let variant = format_ident!("{}", ident.unraw().to_string().to_upper_camel_case());
        let ty = option_inner(&field.ty).unwrap_or(&field.ty);
        consts.push(quote! {
            pub const #ident: ::refract::Field<super::Entity, #ty> =
                ::refract::Field::new(super::Column::#variant);
        });
    }

    Ok(quote! {
        #[allow(non_upper_case_globals, dead_code, unused_imports)]
        pub mod fields {
            use super::*;

            #(#consts)*
        }
    })
}

fn is_skipped(field: &syn::Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("refract")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported refract attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

// `Option<T>` -> `T`
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
