// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Derives `ToTerm`/`FromTerm` for a record `struct`, mapping each named
//! field to an ETF map entry. Mirrors the `erlpack:"name"` Go struct tag
//! this crate is descended from, but resolved at compile time instead of
//! through runtime reflection.

#![deny(unused_must_use, unsafe_code, missing_docs)]
// A proc-macro crate's only way to report a compile error is to panic
// (syn's `Diagnostic` API is still unstable); see attribute.rs's doc comment.
#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

extern crate proc_macro;

mod attribute;

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, Fields};

use attribute::FieldAttrs;

struct Field {
    ident: syn::Ident,
    ty: syn::Type,
    wire_name: String,
    skip: bool,
}

fn collect_fields(s: &synstructure::Structure) -> Vec<Field> {
    let data = match &s.ast().data {
        Data::Struct(data) => data,
        _ => panic!("#[derive(ErlTerm)] only supports structs"),
    };
    let named = match &data.fields {
        Fields::Named(named) => named,
        _ => panic!("#[derive(ErlTerm)] requires named fields"),
    };
    named
        .named
        .iter()
        .map(|field| {
            let ident = field.ident.clone().expect("named field has an ident");
            let attrs = FieldAttrs::parse(&field.attrs);
            // No `#[erlpack("name")]` (or an explicit `"-"`) excludes the
            // field from the wire in both directions (spec.md §4.3(11)/§6/§9).
            let skip = attrs.wire_name.is_none();
            let wire_name = attrs.wire_name.unwrap_or_default();
            Field {
                ident,
                ty: field.ty.clone(),
                wire_name,
                skip,
            }
        })
        .collect()
}

/// True if `ty`'s outermost type constructor is `Option`, so a missing map
/// entry can default to `None` instead of raising `MissingField`.
fn is_option(ty: &syn::Type) -> bool {
    matches!(
        ty,
        syn::Type::Path(path)
            if path.path.segments.last().is_some_and(|seg| seg.ident == "Option")
    )
}

fn derive_erl_term(mut s: synstructure::Structure) -> TokenStream2 {
    s.add_bounds(synstructure::AddBounds::Fields)
        .underscore_const(true);
    let fields = collect_fields(&s);
    let kept: Vec<&Field> = fields.iter().filter(|f| !f.skip).collect();
    let field_count = kept.len();

    let encode_body = kept.iter().map(|f| {
        let ident = &f.ident;
        let wire_name = &f.wire_name;
        quote! {
            ::erlterm::ToTerm::encode(#wire_name, pad)?;
            ::erlterm::ToTerm::encode(&self.#ident, pad)?;
        }
    });

    let decode_assignments = fields.iter().map(|f| {
        let ident = &f.ident;
        if f.skip {
            return quote! { #ident: ::core::default::Default::default() };
        }
        let wire_name = &f.wire_name;
        if is_option(&f.ty) {
            quote! {
                #ident: match __fields.remove(#wire_name) {
                    ::core::option::Option::Some(value) => ::erlterm::FromTerm::from_term(value)?,
                    ::core::option::Option::None => ::core::option::Option::None,
                }
            }
        } else {
            quote! {
                #ident: match __fields.remove(#wire_name) {
                    ::core::option::Option::Some(value) => ::erlterm::FromTerm::from_term(value)?,
                    ::core::option::Option::None => {
                        return ::core::result::Result::Err(::erlterm::Error::MissingField(#wire_name))
                    }
                }
            }
        }
    });

    let to_term_impl = s.gen_impl(quote! {
        gen impl ::erlterm::ToTerm for @Self {
            fn encode(&self, pad: &mut ::erlterm::Scratchpad) -> ::core::result::Result<(), ::erlterm::Error> {
                ::erlterm::wire::map_header(pad, #field_count as u32);
                #( #encode_body )*
                ::core::result::Result::Ok(())
            }
        }
    });

    let from_term_impl = s.gen_impl(quote! {
        gen impl ::erlterm::FromTerm for @Self {
            fn from_term(term: ::erlterm::Term) -> ::core::result::Result<Self, ::erlterm::Error> {
                let pairs = match term {
                    ::erlterm::Term::Map(pairs) => pairs,
                    other => return ::core::result::Result::Err(::erlterm::support::cannot_coerce_map(&other)),
                };
                let mut __fields: ::std::collections::HashMap<::std::string::String, ::erlterm::Term> =
                    ::std::collections::HashMap::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let key = ::erlterm::support::term_key_to_string(key)?;
                    __fields.insert(key, value);
                }
                ::core::result::Result::Ok(Self {
                    #( #decode_assignments, )*
                })
            }
        }
    });

    quote! {
        #to_term_impl
        #from_term_impl
    }
}

synstructure::decl_derive!(
    [ErlTerm, attributes(erlpack)] =>
    /// Derives `ToTerm` and `FromTerm` for a record, mapping each named
    /// field to an ETF map entry keyed by `#[erlpack("name")]` (or the
    /// field's Rust name), and dropping fields tagged `#[erlpack("-")]`.
    derive_erl_term
);
