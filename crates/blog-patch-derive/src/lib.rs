//! `#[derive(Patch)]`: generates the partial-update merge for a record type.
//!
//! For a struct with named fields the derive emits:
//! - `Patch`, folding every `pub` field of the source onto the destination
//!   through its `PatchField` policy,
//! - `PatchField`, so the record can itself be a nested field,
//! - `Reflect`, so the record can go through the dynamic `patch_struct` entry.
//!
//! Non-`pub` fields are never touched. A `pub` field can opt out with
//! `#[patch(skip)]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields, Generics, Ident, Visibility,
};

#[proc_macro_derive(Patch, attributes(patch))]
pub fn derive_patch(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Patch can only be derived for structs",
        ));
    };

    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Patch requires a struct with named fields",
        ));
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Patch cannot be derived for structs with lifetime parameters",
        ));
    }

    let mut merged_fields: Vec<&Field> = Vec::new();
    for field in &fields.named {
        if !matches!(field.vis, Visibility::Public(_)) || is_skipped(field)? {
            continue;
        }
        merged_fields.push(field);
    }
    let merged: Vec<&Ident> = merged_fields.iter().filter_map(|f| f.ident.as_ref()).collect();

    let name = &input.ident;
    let generics = bounded_generics(&input.generics, &merged_fields);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::blog_core::patch::Patch for #name #ty_generics #where_clause {
            fn patch(&mut self, src: &Self) {
                #(
                    ::blog_core::patch::PatchField::patch_field(&mut self.#merged, &src.#merged);
                )*
            }
        }

        impl #impl_generics ::blog_core::patch::PatchField for #name #ty_generics #where_clause {
            fn patch_field(&mut self, src: &Self) {
                ::blog_core::patch::Patch::patch(self, src);
            }
        }

        impl #impl_generics ::blog_core::patch::Reflect for #name #ty_generics #where_clause {
            fn kind(&self) -> ::blog_core::patch::Kind {
                ::blog_core::patch::Kind::Record
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn patch_reflect(
                &mut self,
                src: &dyn ::blog_core::patch::Reflect,
            ) -> ::core::result::Result<(), ::blog_core::error::PatchError> {
                let Some(src) = src.as_any().downcast_ref::<Self>() else {
                    return Err(::blog_core::error::PatchError::TypeMismatch {
                        expected: ::core::any::type_name::<Self>(),
                        found: src.type_name(),
                    });
                };
                ::blog_core::patch::Patch::patch(self, src);
                Ok(())
            }
        }
    })
}

/// Every type parameter must be `'static` for `Reflect`, and every merged
/// field type needs a `PatchField` policy.
fn bounded_generics(generics: &Generics, merged: &[&Field]) -> Generics {
    let mut generics = generics.clone();
    if generics.params.is_empty() {
        return generics;
    }

    let params: Vec<Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause
            .predicates
            .push(parse_quote!(#param: 'static));
    }
    for field in merged {
        let ty = &field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::blog_core::patch::PatchField));
    }
    generics
}

fn is_skipped(field: &Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("patch") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported patch attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}
