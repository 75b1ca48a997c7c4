// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tag-dispatched parser: reads the version byte, then one term,
//! recursively, into a [`Term`] tree. Bytes are never re-read; truncation
//! anywhere is [`Error::UnexpectedEof`].

use crate::error::Error;
use crate::term::{Atom, Term};
use crate::wire::{self, Cursor};

/// Parses a full ETF buffer (version byte + one term) into a [`Term`].
pub fn parse(bytes: &[u8]) -> Result<Term, Error> {
    match parse_inner(bytes) {
        Ok(term) => Ok(term),
        Err(err) => {
            tracing::debug!(error = %err, len = bytes.len(), "failed to parse ETF buffer");
            Err(err)
        }
    }
}

fn parse_inner(bytes: &[u8]) -> Result<Term, Error> {
    let mut cursor = Cursor::new(bytes);
    if cursor.byte()? != wire::VERSION {
        return Err(Error::BadVersion);
    }
    read_term(&mut cursor)
}

/// Reads one tag-prefixed term from `cursor`, recursing into containers.
fn read_term(cursor: &mut Cursor<'_>) -> Result<Term, Error> {
    let tag = cursor.byte()?;
    match tag {
        wire::TAG_ATOM_SMALL => {
            let len = cursor.byte()? as usize;
            let body = cursor.take(len)?;
            Ok(interpret_atom(body))
        }
        wire::TAG_NIL => Ok(Term::List(Vec::new())),
        wire::TAG_LIST => {
            let len = cursor.u32_be()? as usize;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(read_term(cursor)?);
            }
            // The list tail must be NIL_EXT; a strict decoder verifies it.
            let tail = cursor.byte()?;
            if tail != wire::TAG_NIL {
                return Err(Error::UnknownTag(tail));
            }
            Ok(Term::List(items))
        }
        wire::TAG_BINARY => {
            let len = cursor.u32_be()? as usize;
            let bytes = cursor.take(len)?;
            Ok(Term::Binary(bytes.to_vec()))
        }
        wire::TAG_SMALL_INTEGER => Ok(Term::Byte(cursor.byte()?)),
        wire::TAG_INTEGER => Ok(Term::Int32(cursor.i32_be()?)),
        wire::TAG_SMALL_BIG => {
            let len = cursor.byte()?;
            let sign = cursor.byte()?;
            if len > 8 {
                return Err(Error::IntegerTooLarge(len));
            }
            let digits = cursor.take(len as usize)?;
            let mut magnitude: u64 = 0;
            for (i, &digit) in digits.iter().enumerate() {
                magnitude |= (digit as u64) << (8 * i);
            }
            let value = if sign == 1 {
                -(magnitude as i64)
            } else {
                magnitude as i64
            };
            Ok(Term::Int64(value))
        }
        wire::TAG_NEW_FLOAT => Ok(Term::Float(cursor.f64_be()?)),
        wire::TAG_MAP => {
            let len = cursor.u32_be()? as usize;
            let mut pairs = Vec::with_capacity(len);
            for _ in 0..len {
                let key = read_term(cursor)?;
                let value = read_term(cursor)?;
                pairs.push((key, value));
            }
            Ok(Term::Map(pairs))
        }
        other => Err(Error::UnknownTag(other)),
    }
}

/// Translates an atom's raw ASCII body into `true`/`false`/`nil`/a symbolic
/// atom, per spec.md §4.5.
fn interpret_atom(body: &[u8]) -> Term {
    match body {
        b"true" => Term::Bool(true),
        b"false" => Term::Bool(false),
        b"nil" => Term::Null,
        _ => Term::Atom(Atom(String::from_utf8_lossy(body).into_owned())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_version() {
        assert_eq!(parse(&[0, b's']), Err(Error::BadVersion));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse(&[]), Err(Error::UnexpectedEof));
    }

    #[test]
    fn rejects_version_only() {
        assert_eq!(parse(&[131]), Err(Error::UnexpectedEof));
    }

    #[test]
    fn parses_nil_atom() {
        assert_eq!(parse(b"\x83s\x03nil").unwrap(), Term::Null);
    }

    #[test]
    fn parses_true_false() {
        assert_eq!(parse(b"\x83s\x04true").unwrap(), Term::Bool(true));
        assert_eq!(parse(b"\x83s\x05false").unwrap(), Term::Bool(false));
    }

    #[test]
    fn parses_symbolic_atom() {
        assert_eq!(
            parse(b"\x83s\x02ok").unwrap(),
            Term::Atom(Atom("ok".to_string()))
        );
    }

    #[test]
    fn parses_empty_list() {
        assert_eq!(parse(b"\x83j").unwrap(), Term::List(Vec::new()));
    }

    #[test]
    fn list_truncated_mid_element_is_eof() {
        // Declares 5 elements but only ships one.
        let bytes = b"\x83l\x00\x00\x00\x05a\x01";
        assert_eq!(parse(bytes), Err(Error::UnexpectedEof));
    }

    #[test]
    fn small_big_too_long_rejected() {
        let mut bytes = vec![131, b'n', 9, 0];
        bytes.extend_from_slice(&[1u8; 9]);
        assert_eq!(parse(&bytes), Err(Error::IntegerTooLarge(9)));
    }

    #[test]
    fn small_big_decodes_with_correct_shift() {
        // 0x0400 = 1024, little-endian magnitude bytes [0x00, 0x04].
        let bytes = [131, b'n', 2, 0, 0x00, 0x04];
        assert_eq!(parse(&bytes).unwrap(), Term::Int64(1024));
    }

    #[test]
    fn small_big_negative() {
        let bytes = [131, b'n', 1, 1, 5];
        assert_eq!(parse(&bytes).unwrap(), Term::Int64(-5));
    }

    #[test]
    fn parses_map() {
        let bytes = b"\x83t\x00\x00\x00\x01m\x00\x00\x00\x01aa\x01";
        let Term::Map(pairs) = parse(bytes).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, Term::Binary(b"a".to_vec()));
        assert_eq!(pairs[0].1, Term::Byte(1));
    }
}
