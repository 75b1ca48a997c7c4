// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The dynamic intermediate value produced by the decoder and consumed by
//! the encoder's container recursion and the caster.

/// A symbolic ETF atom, distinct from a binary/text value.
///
/// Atoms carry semantic meaning (`:ok`, `:error`, a field name) and are
/// name-interned on the receiving BEAM node; they are the wire's "keyword"
/// type. A newtype over `String` is enough to let the caster tell an
/// atom-destined value apart from a string-destined one without a second
/// storage representation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom(pub String);

impl Atom {
    /// Borrows the atom's textual body.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom(s.to_string())
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom(s)
    }
}

impl core::fmt::Display for Atom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One parsed (or about-to-be-encoded) ETF term.
///
/// Maps are represented as an ordered list of pairs rather than a hash map:
/// `Term` holds `f64`, which has no total `Eq`, so it cannot itself be a
/// hash key. Casting a `Map` into a typed `HashMap`/`BTreeMap` destination
/// re-hashes each already-cast key (see [`crate::cast::FromTerm`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `nil` — absent value / null pointer.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// A symbolic atom body other than `true`/`false`/`nil`.
    Atom(Atom),
    /// `SMALL_INTEGER_EXT` — an unsigned byte on the wire.
    Byte(u8),
    /// `INTEGER_EXT` — a signed 32-bit two's-complement integer.
    Int32(i32),
    /// `SMALL_BIG_EXT` — a sign-magnitude integer, widened to 64 bits.
    Int64(i64),
    /// `NEW_FLOAT_EXT` — an IEEE-754 double.
    Float(f64),
    /// `BINARY_EXT` — an uninterpreted byte sequence. The wire's carrier
    /// for text; the caster decides between raw bytes and a `String`.
    Binary(Vec<u8>),
    /// `LIST_EXT`/`NIL_EXT` — an ordered sequence of terms.
    List(Vec<Term>),
    /// `MAP_EXT` — key-value pairs in decode order.
    Map(Vec<(Term, Term)>),
}

impl Term {
    /// True if this term is the empty list (`NIL_EXT` used as a value).
    #[must_use]
    pub fn is_nil_list(&self) -> bool {
        matches!(self, Term::List(items) if items.is_empty())
    }
}
