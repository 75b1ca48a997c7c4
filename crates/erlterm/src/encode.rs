// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The value classifier / encoder driver: reshapes a Rust value into wire
//! bytes on a [`Scratchpad`], recursing into containers.

use std::collections::{BTreeMap, HashMap};

use crate::error::Error;
use crate::scratchpad::Scratchpad;
use crate::term::{Atom, Term};
use crate::wire;

/// The initial scratchpad allocation for a top-level [`crate::pack`] call.
const INITIAL_ALLOC: usize = 4 * 1024;

/// Classifies `self` into an ETF tag and appends its wire bytes to `pad`,
/// recursing into containers. Implemented for the host types spec.md §4.3
/// enumerates, plus `Vec`/slices, maps, and (via `#[derive(ErlTerm)]`)
/// user records.
pub trait ToTerm {
    /// Appends this value's wire encoding to `pad`.
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error>;
}

/// Encodes `value`, producing a complete ETF buffer (version byte + term).
pub fn pack<T: ToTerm + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let mut pad = Scratchpad::new(INITIAL_ALLOC);
    value.encode(&mut pad)?;
    pad.start_append(&[wire::VERSION]);
    let bytes = pad.materialize();
    tracing::trace!(len = bytes.len(), "packed ETF term");
    Ok(bytes)
}

impl ToTerm for () {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::nil_atom(pad);
        Ok(())
    }
}

impl<T: ToTerm> ToTerm for Option<T> {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        match self {
            None => {
                wire::nil_atom(pad);
                Ok(())
            }
            Some(inner) => inner.encode(pad),
        }
    }
}

impl<T: ToTerm + ?Sized> ToTerm for Box<T> {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        self.as_ref().encode(pad)
    }
}

impl<T: ToTerm + ?Sized> ToTerm for &T {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        (*self).encode(pad)
    }
}

impl ToTerm for bool {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::bool_atom(pad, *self);
        Ok(())
    }
}

impl ToTerm for str {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::binary(pad, self.as_bytes());
        Ok(())
    }
}

impl ToTerm for String {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        self.as_str().encode(pad)
    }
}

impl ToTerm for Atom {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::atom(pad, self.as_str())
    }
}

/// Width selection per spec.md §4.2: `SMALL_INTEGER_EXT` for `0..256`,
/// `INTEGER_EXT` for the rest of the signed-32 range, `SMALL_BIG_EXT`
/// beyond that.
fn encode_i64(value: i64, pad: &mut Scratchpad) {
    if (0..256).contains(&value) {
        wire::small_int(pad, value as u8);
    } else if value > i64::from(i32::MIN) && value < i64::from(i32::MAX) {
        wire::int32(pad, value as i32);
    } else {
        wire::small_big(pad, value);
    }
}

macro_rules! impl_to_term_int {
    ($($t:ty),+ $(,)?) => {
        $(
            impl ToTerm for $t {
                fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
                    encode_i64(i64::from(*self), pad);
                    Ok(())
                }
            }
        )+
    };
}
impl_to_term_int!(i8, i16, i32, i64, u8, u16, u32);

impl ToTerm for u64 {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        if *self < 256 {
            wire::small_int(pad, *self as u8);
        } else if *self < i32::MAX as u64 {
            wire::int32(pad, *self as i32);
        } else if let Ok(signed) = i64::try_from(*self) {
            wire::small_big(pad, signed);
        } else {
            return Err(Error::UnsupportedType("u64 value exceeds i64 range"));
        }
        Ok(())
    }
}

impl ToTerm for isize {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        encode_i64(*self as i64, pad);
        Ok(())
    }
}

impl ToTerm for usize {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        (*self as u64).encode(pad)
    }
}

impl ToTerm for f32 {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::float64(pad, f64::from(*self));
        Ok(())
    }
}

impl ToTerm for f64 {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::float64(pad, *self);
        Ok(())
    }
}

/// `Vec<u8>` is the raw-bytes carrier, matching spec.md's "text -> binary"
/// carrier choice rather than encoding each byte as a list element.
impl ToTerm for Vec<u8> {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::binary(pad, self);
        Ok(())
    }
}

impl<T: ToTerm> ToTerm for [T] {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        if self.is_empty() {
            wire::nil_ext(pad);
            return Ok(());
        }
        wire::list_header(pad, self.len() as u32);
        for item in self {
            item.encode(pad)?;
        }
        wire::nil_ext(pad);
        Ok(())
    }
}

impl<T: ToTerm> ToTerm for Vec<T> {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        self.as_slice().encode(pad)
    }
}

impl<K: ToTerm, V: ToTerm> ToTerm for HashMap<K, V> {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::map_header(pad, self.len() as u32);
        for (k, v) in self {
            k.encode(pad)?;
            v.encode(pad)?;
        }
        Ok(())
    }
}

impl<K: ToTerm, V: ToTerm> ToTerm for BTreeMap<K, V> {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        wire::map_header(pad, self.len() as u32);
        for (k, v) in self {
            k.encode(pad)?;
            v.encode(pad)?;
        }
        Ok(())
    }
}

/// Re-encodes an already-decoded [`Term`] — the "deferred-cast handle,
/// unwrap and recurse" rule of spec.md §4.3 step 7, generalized to any
/// open/dynamic value a caller holds.
impl ToTerm for Term {
    fn encode(&self, pad: &mut Scratchpad) -> Result<(), Error> {
        match self {
            Term::Null => {
                wire::nil_atom(pad);
                Ok(())
            }
            Term::Bool(b) => {
                wire::bool_atom(pad, *b);
                Ok(())
            }
            Term::Atom(a) => wire::atom(pad, a.as_str()),
            Term::Byte(b) => {
                wire::small_int(pad, *b);
                Ok(())
            }
            Term::Int32(i) => {
                encode_i64(i64::from(*i), pad);
                Ok(())
            }
            Term::Int64(i) => {
                encode_i64(*i, pad);
                Ok(())
            }
            Term::Float(f) => {
                wire::float64(pad, *f);
                Ok(())
            }
            Term::Binary(bytes) => {
                wire::binary(pad, bytes);
                Ok(())
            }
            Term::List(items) => items.as_slice().encode(pad),
            Term::Map(pairs) => {
                wire::map_header(pad, pairs.len() as u32);
                for (k, v) in pairs {
                    k.encode(pad)?;
                    v.encode(pad)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn bytes<T: ToTerm>(value: &T) -> Vec<u8> {
        pack(value).unwrap()
    }

    #[test]
    fn packs_string_without_null() {
        assert_eq!(bytes(&"hello world".to_string()), b"\x83m\x00\x00\x00\x0bhello world");
    }

    #[test]
    fn packs_string_with_embedded_null() {
        assert_eq!(
            bytes(&"hello\x00 world".to_string()),
            b"\x83m\x00\x00\x00\x0chello\x00 world"
        );
    }

    #[test]
    fn packs_nil() {
        assert_eq!(bytes(&()), b"\x83s\x03nil");
    }

    #[test]
    fn packs_true_and_false() {
        assert_eq!(bytes(&true), b"\x83s\x04true");
        assert_eq!(bytes(&false), b"\x83s\x05false");
    }

    #[test]
    fn packs_empty_list_as_two_bytes() {
        let empty: Vec<i32> = Vec::new();
        assert_eq!(bytes(&empty), b"\x83j");
    }

    #[test]
    fn packs_nil_option() {
        let p: Option<String> = None;
        assert_eq!(bytes(&p), b"\x83s\x03nil");
    }

    #[test]
    fn packs_non_nil_boxed_string() {
        let s = Box::new("hello world".to_string());
        assert_eq!(bytes(&s), b"\x83m\x00\x00\x00\x0bhello world");
    }

    #[test]
    fn packs_small_int() {
        assert_eq!(bytes(&3i32), b"\x83a\x03");
    }

    #[test]
    fn packs_32_bit_int() {
        assert_eq!(bytes(&1024i32), b"\x83b\x00\x00\x04\x00");
    }

    #[test]
    fn packs_heterogeneous_list_via_term() {
        let list = Term::List(vec![
            Term::Byte(1),
            Term::Binary(b"two".to_vec()),
            Term::Float(3.1),
            Term::Binary(b"four".to_vec()),
            Term::List(vec![Term::Binary(b"five".to_vec())]),
        ]);
        let expected: &[u8] = b"\x83l\x00\x00\x00\x05a\x01m\x00\x00\x00\x03twoF\x40\x08\xcc\xcc\xcc\xcc\xcc\xcdm\x00\x00\x00\x04fourl\x00\x00\x00\x01m\x00\x00\x00\x04fivejj";
        assert_eq!(bytes(&list), expected);
    }

    #[test]
    fn packs_map() {
        let map = Term::Map(vec![(Term::Binary(b"a".to_vec()), Term::Byte(1))]);
        assert_eq!(
            bytes(&map),
            b"\x83t\x00\x00\x00\x01m\x00\x00\x00\x01aa\x01"
        );
    }

    #[test]
    fn atom_too_long_surfaces_error() {
        let a = Atom("x".repeat(256));
        assert_eq!(pack(&a), Err(Error::AtomTooLong(256)));
    }
}
