// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The target-directed caster: reshapes a [`Term`] into a caller-chosen
//! typed destination. Rust has no runtime struct-tag reflection, so the
//! Go original's single reflective `processItem` becomes a `FromTerm`
//! trait implemented per destination type — generically for scalars,
//! `Option`/`Box`, `Vec`, and maps here, and via `#[derive(ErlTerm)]` for
//! user records (see `erlterm-derive`).

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::error::Error;
use crate::term::{Atom, Term};

/// A destination type a decoded [`Term`] can be cast into.
///
/// "First matching rule wins" (spec.md §4.6) is expressed here as: each
/// impl matches the `Term` variants it accepts and returns
/// [`Error::CannotCoerce`] for the rest.
pub trait FromTerm: Sized {
    /// Reshapes `term` into `Self`.
    fn from_term(term: Term) -> Result<Self, Error>;
}

fn term_kind(term: &Term) -> &'static str {
    match term {
        Term::Null => "null",
        Term::Bool(_) => "boolean",
        Term::Atom(_) => "atom",
        Term::Byte(_) => "byte",
        Term::Int32(_) => "integer32",
        Term::Int64(_) => "integer64",
        Term::Float(_) => "float",
        Term::Binary(_) => "binary",
        Term::List(_) => "list",
        Term::Map(_) => "map",
    }
}

fn cannot_coerce(term: &Term, destination: &'static str) -> Error {
    let kind = term_kind(term);
    tracing::debug!(term = kind, destination, "cast rule mismatch");
    Error::CannotCoerce {
        term: kind,
        destination,
    }
}

/// Converts a map key term into a `String`. Used directly by hand-written
/// code and by `#[derive(ErlTerm)]`-generated record casts.
pub fn term_key_to_string(term: Term) -> Result<String, Error> {
    match term {
        Term::Binary(bytes) => String::from_utf8(bytes).map_err(|_| Error::KeyMustBeString),
        Term::Atom(atom) => Ok(atom.0),
        _ => Err(Error::KeyMustBeString),
    }
}

/// The "term cast into a record destination" error, used by
/// `#[derive(ErlTerm)]`-generated code.
#[must_use]
pub fn cannot_coerce_map(term: &Term) -> Error {
    cannot_coerce(term, "record")
}

/// Rule 2: an "open" destination takes the decoded term as-is.
impl FromTerm for Term {
    fn from_term(term: Term) -> Result<Self, Error> {
        Ok(term)
    }
}

/// Rule 3: a symbolic atom into an atom-shaped destination. Rules 10/11
/// extend this to an atom destination too: a boolean writes its textual
/// form (`"true"`/`"false"`) and null writes `"nil"` (spec.md §8 scenario
/// 10: `unpack(\x83s\x04true, into symbolic-atom)` yields atom `"true"`).
impl FromTerm for Atom {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Atom(a) => Ok(a),
            Term::Bool(true) => Ok(Atom("true".to_string())),
            Term::Bool(false) => Ok(Atom("false".to_string())),
            Term::Null => Ok(Atom("nil".to_string())),
            other => Err(cannot_coerce(&other, "Atom")),
        }
    }
}

/// Rule 1, nullable half: null maps to `None`; anything else recurses into
/// `Some`.
impl<T: FromTerm> FromTerm for Option<T> {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Null => Ok(None),
            other => Ok(Some(T::from_term(other)?)),
        }
    }
}

/// Rule 1, non-nullable half: allocate a fresh `T` and recurse into it.
impl<T: FromTerm> FromTerm for Box<T> {
    fn from_term(term: Term) -> Result<Self, Error> {
        Ok(Box::new(T::from_term(term)?))
    }
}

macro_rules! impl_from_term_signed {
    ($($t:ty),+ $(,)?) => {
        $(
            impl FromTerm for $t {
                fn from_term(term: Term) -> Result<Self, Error> {
                    match term {
                        Term::Byte(b) => Ok(Self::from(b)),
                        Term::Int32(i) => <$t>::try_from(i)
                            .map_err(|_| Error::CannotCoerce { term: "integer32", destination: stringify!($t) }),
                        Term::Int64(i) => <$t>::try_from(i)
                            .map_err(|_| Error::CannotCoerce { term: "integer64", destination: stringify!($t) }),
                        other => Err(cannot_coerce(&other, stringify!($t))),
                    }
                }
            }
        )+
    };
}
impl_from_term_signed!(i8, i16, i32, i64, isize);

macro_rules! impl_from_term_unsigned {
    ($($t:ty),+ $(,)?) => {
        $(
            impl FromTerm for $t {
                fn from_term(term: Term) -> Result<Self, Error> {
                    match term {
                        Term::Byte(b) => Ok(Self::from(b)),
                        Term::Int32(i) => <$t>::try_from(i)
                            .map_err(|_| Error::CannotCoerce { term: "integer32", destination: stringify!($t) }),
                        Term::Int64(i) => <$t>::try_from(i)
                            .map_err(|_| Error::CannotCoerce { term: "integer64", destination: stringify!($t) }),
                        other => Err(cannot_coerce(&other, stringify!($t))),
                    }
                }
            }
        )+
    };
}
impl_from_term_unsigned!(u8, u16, u32, u64, usize);

/// Rule 6: floats copy straight across; no int-to-float coercion.
impl FromTerm for f64 {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Float(f) => Ok(f),
            other => Err(cannot_coerce(&other, "f64")),
        }
    }
}

impl FromTerm for f32 {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Float(f) => Ok(f as f32),
            other => Err(cannot_coerce(&other, "f32")),
        }
    }
}

/// Rule 10: booleans copy directly; they do not widen from other terms.
impl FromTerm for bool {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Bool(b) => Ok(b),
            other => Err(cannot_coerce(&other, "bool")),
        }
    }
}

/// Rules 8/9/10/11 for a text destination: binary bytes interpreted as
/// UTF-8, an atom's own body, a boolean's textual form, or (rule 11) the
/// destination's default (empty string) for null.
impl FromTerm for String {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Binary(bytes) => String::from_utf8(bytes)
                .map_err(|_| Error::CannotCoerce { term: "binary", destination: "String" }),
            Term::Atom(a) => Ok(a.0),
            Term::Bool(true) => Ok("true".to_string()),
            Term::Bool(false) => Ok("false".to_string()),
            Term::Null => Ok(String::new()),
            other => Err(cannot_coerce(&other, "String")),
        }
    }
}

/// Rule 9: a byte sequence into a raw-bytes destination, as-is.
impl FromTerm for Vec<u8> {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Binary(bytes) => Ok(bytes),
            other => Err(cannot_coerce(&other, "Vec<u8>")),
        }
    }
}

/// Rule 12: a list, element by element, into an ordered-sequence
/// destination. Rule 11 (null leaves the destination at its zero value)
/// applies here too: an absent list unpacks to an empty `Vec`.
impl<T: FromTerm> FromTerm for Vec<T> {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::List(items) => items.into_iter().map(T::from_term).collect(),
            Term::Null => Ok(Vec::new()),
            other => Err(cannot_coerce(&other, "Vec<T>")),
        }
    }
}

/// Rule 13, homogeneous map: cast every key and value independently.
impl<K: FromTerm + Eq + Hash, V: FromTerm> FromTerm for HashMap<K, V> {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Map(pairs) => pairs
                .into_iter()
                .map(|(k, v)| Ok((K::from_term(k)?, V::from_term(v)?)))
                .collect(),
            other => Err(cannot_coerce(&other, "HashMap<K, V>")),
        }
    }
}

impl<K: FromTerm + Ord, V: FromTerm> FromTerm for BTreeMap<K, V> {
    fn from_term(term: Term) -> Result<Self, Error> {
        match term {
            Term::Map(pairs) => pairs
                .into_iter()
                .map(|(k, v)| Ok((K::from_term(k)?, V::from_term(v)?)))
                .collect(),
            other => Err(cannot_coerce(&other, "BTreeMap<K, V>")),
        }
    }
}

/// A carrier for an undecoded [`Term`], letting a caller decode once and
/// cast into more than one destination type (spec.md §4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred(Term);

impl Deferred {
    /// Wraps a parsed term for later casting.
    #[must_use]
    pub fn new(term: Term) -> Self {
        Self(term)
    }

    /// Casts the held term into `T`, equivalent to calling
    /// [`FromTerm::from_term`] directly.
    pub fn cast<T: FromTerm>(self) -> Result<T, Error> {
        T::from_term(self.0)
    }

    /// Borrows the held term without consuming it.
    #[must_use]
    pub fn term(&self) -> &Term {
        &self.0
    }
}

impl FromTerm for Deferred {
    fn from_term(term: Term) -> Result<Self, Error> {
        Ok(Deferred(term))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn casts_byte_into_signed_and_unsigned() {
        assert_eq!(i32::from_term(Term::Byte(1)).unwrap(), 1);
        assert_eq!(u8::from_term(Term::Byte(1)).unwrap(), 1);
    }

    #[test]
    fn casts_nil_into_pointer_as_none() {
        assert_eq!(Option::<bool>::from_term(Term::Null).unwrap(), None);
    }

    #[test]
    fn casts_atom_into_atom_destination() {
        assert_eq!(
            Atom::from_term(Term::Atom(Atom("true".to_string()))).unwrap(),
            Atom("true".to_string())
        );
    }

    #[test]
    fn casts_bool_and_null_into_atom_textual_form() {
        assert_eq!(Atom::from_term(Term::Bool(true)).unwrap(), Atom::from("true"));
        assert_eq!(Atom::from_term(Term::Bool(false)).unwrap(), Atom::from("false"));
        assert_eq!(Atom::from_term(Term::Null).unwrap(), Atom::from("nil"));
    }

    #[test]
    fn casts_bool_into_atom_shaped_string() {
        assert_eq!(String::from_term(Term::Bool(true)).unwrap(), "true");
        assert_eq!(String::from_term(Term::Bool(false)).unwrap(), "false");
    }

    #[test]
    fn casts_binary_into_string() {
        assert_eq!(
            String::from_term(Term::Binary(b"hello world".to_vec())).unwrap(),
            "hello world"
        );
    }

    #[test]
    fn casts_generic_list() {
        let list = Term::List(vec![Term::Byte(1)]);
        assert_eq!(Vec::<i32>::from_term(list).unwrap(), vec![1]);
    }

    #[test]
    fn casts_generic_map() {
        let map = Term::Map(vec![(Term::Binary(b"a".to_vec()), Term::Byte(1))]);
        let out = HashMap::<String, i32>::from_term(map).unwrap();
        assert_eq!(out.get("a"), Some(&1));
    }

    #[test]
    fn cannot_coerce_surfaces_kinds() {
        let err = bool::from_term(Term::Byte(1)).unwrap_err();
        assert_eq!(
            err,
            Error::CannotCoerce {
                term: "byte",
                destination: "bool"
            }
        );
    }

    #[test]
    fn deferred_casts_twice() {
        let deferred = Deferred::new(Term::Byte(1));
        let as_i32: i32 = deferred.clone().cast().unwrap();
        let as_u8: u8 = deferred.cast().unwrap();
        assert_eq!(as_i32, 1);
        assert_eq!(as_u8, 1);
    }
}
