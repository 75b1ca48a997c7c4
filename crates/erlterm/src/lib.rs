// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A codec for the BEAM/Erlang External Term Format (ETF) — the tagged
//! binary wire format Discord's gateway speaks under the `etf` encoding
//! parameter.
//!
//! Three pieces do the work:
//!
//! - [`ToTerm`]/[`pack`]: classify a Rust value and write its wire bytes to
//!   a [`Scratchpad`].
//! - [`decode::parse`]: tag-dispatch wire bytes back into a dynamic
//!   [`Term`] tree.
//! - [`FromTerm`]/[`unpack`]/[`Deferred`]: reshape a `Term` into a
//!   caller-chosen typed destination.
//!
//! `#[derive(ErlTerm)]` (from the companion `erlterm-derive` crate) maps a
//! record struct's fields onto ETF map entries, replacing the Go original's
//! runtime struct-tag reflection with a compile-time expansion.

#![deny(unused_must_use, unsafe_code, missing_docs)]
#![warn(clippy::all)]

mod cast;
mod decode;
mod encode;
mod error;
mod scratchpad;
mod term;
pub mod wire;

pub use cast::{Deferred, FromTerm};
pub use encode::{pack, ToTerm};
pub use error::Error;
pub use scratchpad::Scratchpad;
pub use term::{Atom, Term};

#[doc(hidden)]
pub mod support {
    //! Functions used by `#[derive(ErlTerm)]`-generated code. Not part of
    //! the crate's public API; subject to change without notice.
    pub use crate::cast::{cannot_coerce_map, term_key_to_string};
}

pub use erlterm_derive::ErlTerm;

/// Parses `bytes` as ETF, then casts the result into `T`.
///
/// Equivalent to `decode::parse(bytes).and_then(T::from_term)`, and the
/// counterpart to [`pack`].
pub fn unpack<T: FromTerm>(bytes: &[u8]) -> Result<T, Error> {
    let term = decode::parse(bytes)?;
    T::from_term(term)
}

/// Parses `bytes` as ETF without casting, for callers who need to inspect
/// the term or cast it more than once.
pub fn unpack_deferred(bytes: &[u8]) -> Result<Deferred, Error> {
    let term = decode::parse(bytes)?;
    Ok(Deferred::new(term))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn pack_then_unpack_roundtrips_a_string() {
        let packed = pack(&"hello world".to_string()).unwrap();
        let out: String = unpack(&packed).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn pack_then_unpack_roundtrips_an_integer() {
        let packed = pack(&1024i64).unwrap();
        let out: i64 = unpack(&packed).unwrap();
        assert_eq!(out, 1024);
    }

    #[test]
    fn unpack_deferred_casts_twice() {
        let packed = pack(&3i32).unwrap();
        let deferred = unpack_deferred(&packed).unwrap();
        let as_i32: i32 = deferred.clone().cast().unwrap();
        let as_u8: u8 = deferred.cast().unwrap();
        assert_eq!(as_i32, 3);
        assert_eq!(as_u8, 3);
    }
}
