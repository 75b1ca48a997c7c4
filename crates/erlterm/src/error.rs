// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors produced by encoding, decoding, and casting.

/// Everything that can go wrong packing a value, parsing a wire buffer, or
/// casting a [`crate::Term`] into a typed destination.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The input didn't open with the ETF version byte (`131`).
    #[error("input does not start with the ETF version byte (131)")]
    BadVersion,
    /// The cursor ran off the end of the input mid-term.
    #[error("unexpected end of input while reading a term")]
    UnexpectedEof,
    /// The tag byte isn't one of the supported tags (see module docs).
    #[error("unknown or unsupported tag byte: 0x{0:02x}")]
    UnknownTag(u8),
    /// A `SMALL_BIG_EXT` declared a magnitude longer than 8 bytes.
    #[error("SMALL_BIG_EXT magnitude of {0} bytes exceeds the 64-bit target")]
    IntegerTooLarge(u8),
    /// A map key being cast into a record field wasn't textual.
    #[error("map key must be a string to cast into a record field")]
    KeyMustBeString,
    /// The caster has no rule reshaping this term into the destination type.
    #[error("cannot coerce {term} into {destination}")]
    CannotCoerce {
        /// A short name for the term's shape (e.g. `"binary"`, `"list"`).
        term: &'static str,
        /// A short name for the destination type that rejected it.
        destination: &'static str,
    },
    /// The encoder was handed a value it has no classification rule for.
    #[error("unsupported type for encoding: {0}")]
    UnsupportedType(&'static str),
    /// An atom body exceeded the 255-byte small-atom length limit.
    #[error("atom body of {0} bytes exceeds the 255-byte small-atom limit")]
    AtomTooLong(usize),
    /// A derive-generated record cast could not find a required field.
    #[error("record field `{0}` was not present in the decoded map")]
    MissingField(&'static str),
}
