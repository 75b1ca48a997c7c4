// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Parses a field's `#[erlpack("name")]` / `#[erlpack("-")]` attribute.

use syn::{Attribute, Meta};

/// What a field's `erlpack` attribute said.
///
/// A field only appears on the wire if it carries an explicit
/// `#[erlpack("name")]`; a missing attribute excludes the field exactly
/// like `#[erlpack("-")]` does (spec.md §4.3(11)/§6/§9: "missing or empty
/// annotation excludes the field").
pub struct FieldAttrs {
    /// The wire map key this field is keyed under, or `None` if the field
    /// has no `#[erlpack(...)]` attribute (or an explicit `"-"`) and is
    /// dropped from encoding and defaulted on decoding.
    pub wire_name: Option<String>,
}

impl FieldAttrs {
    /// Scans `attrs` for a single `#[erlpack("...")]`, panicking on anything
    /// that isn't a one-string-literal list (proc-macro diagnostics don't
    /// have a stable `Result`-returning surface yet, so panicking here is
    /// the derive's own compile error).
    pub fn parse(attrs: &[Attribute]) -> Self {
        let mut wire_name = None;

        for attr in attrs {
            if !attr.path().is_ident("erlpack") {
                continue;
            }
            let Meta::List(list) = &attr.meta else {
                panic!("expected #[erlpack(\"name\")] or #[erlpack(\"-\")]");
            };
            let lit: syn::LitStr = syn::parse2(list.tokens.clone())
                .unwrap_or_else(|_| panic!("#[erlpack(...)] expects a single string literal"));
            wire_name = if lit.value() == "-" {
                None
            } else {
                Some(lit.value())
            };
        }

        Self { wire_name }
    }
}
