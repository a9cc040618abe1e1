// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turning a double-quoted tag value like `"a\tb"` into the string it
//! denotes. The accepted escapes are those of Go string literals:
//! `\a \b \f \n \r \t \v \\ \"`, `\xHH`, `\ooo` (three octal digits),
//! `\uHHHH` and `\UHHHHHHHH`. Offsets in errors are byte offsets into
//! the quoted string, i.e. the opening quote is at 0.

use crate::settings::{Format, InvalidUtf8, LENIENT_FORMAT};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnquoteError {
    #[error("value is not enclosed in double quotes")]
    MissingQuotes,
    #[error("unescaped newline at {0}")]
    Newline(usize),
    #[error("unescaped '\"' at {0}")]
    UnescapedQuote(usize),
    #[error("invalid escaped character '{0}' at {1}")]
    InvalidEscapedChar(char, usize),
    #[error("not a digit of the escape sequence: '{0}' at {1}")]
    InvalidDigit(char, usize),
    #[error("escape sequence starting at {0} is cut short")]
    UnexpectedEnd(usize),
    #[error("invalid code point {0:#x} in escape sequence at {1}")]
    InvalidCodePoint(u32, usize),
    #[error("octal escape value {0} at {1} is larger than 255")]
    OctalOutOfRange(u32, usize),
    #[error("escaped bytes do not form valid UTF-8")]
    InvalidUtf8,
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

// Reads exactly numdigits digits in the given radix.
fn read_digits(
    cs: &mut impl Iterator<Item = (usize, char)>,
    radix: u32,
    numdigits: u32,
    escapepos: usize,
) -> Result<u32, UnquoteError> {
    let mut res: u32 = 0;
    for _ in 0..numdigits {
        let (pos, c) = cs.next().ok_or(UnquoteError::UnexpectedEnd(escapepos))?;
        let d = c.to_digit(radix).ok_or(UnquoteError::InvalidDigit(c, pos))?;
        res = res * radix + d;
    }
    Ok(res)
}

fn read_code_point(
    cs: &mut impl Iterator<Item = (usize, char)>,
    numdigits: u32,
    escapepos: usize,
) -> Result<char, UnquoteError> {
    let code = read_digits(cs, 16, numdigits, escapepos)?;
    char::from_u32(code).ok_or(UnquoteError::InvalidCodePoint(code, escapepos))
}

// Called after the backslash at escapepos has been consumed.
fn read_escape(
    cs: &mut impl Iterator<Item = (usize, char)>,
    escapepos: usize,
    out: &mut Vec<u8>,
) -> Result<(), UnquoteError> {
    let (pos, c) = cs.next().ok_or(UnquoteError::UnexpectedEnd(escapepos))?;
    match c {
        'a' => out.push(b'\x07'),
        'b' => out.push(b'\x08'),
        'f' => out.push(b'\x0C'),
        'n' => out.push(b'\n'),
        'r' => out.push(b'\r'),
        't' => out.push(b'\t'),
        'v' => out.push(b'\x0B'),
        '\\' => out.push(b'\\'),
        '"' => out.push(b'"'),
        'x' => {
            let n = read_digits(cs, 16, 2, escapepos)?;
            out.push(n as u8);
        }
        'u' => push_char(out, read_code_point(cs, 4, escapepos)?),
        'U' => push_char(out, read_code_point(cs, 8, escapepos)?),
        '0'..='7' => {
            let first = c as u32 - '0' as u32;
            let n = first * 64 + read_digits(cs, 8, 2, escapepos)?;
            if n > 255 {
                return Err(UnquoteError::OctalOutOfRange(n, escapepos))
            }
            out.push(n as u8);
        }
        _ => return Err(UnquoteError::InvalidEscapedChar(c, pos)),
    }
    Ok(())
}

/// Unquote with `LENIENT_FORMAT`.
pub fn unquote(quoted: &str) -> Result<String, UnquoteError> {
    unquote_with(quoted, &LENIENT_FORMAT)
}

/// The empty string stands for "no value" and gives "".
pub fn unquote_with(quoted: &str, format: &Format) -> Result<String, UnquoteError> {
    if quoted.is_empty() {
        return Ok(String::new())
    }
    let inner = quoted.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(UnquoteError::MissingQuotes)?;
    if ! inner.contains(|c: char| c == '\\' || c == '"' || c == '\n') {
        return Ok(inner.to_string())
    }

    let mut out = Vec::with_capacity(inner.len());
    let mut cs = inner.char_indices().map(|(i, c)| (i + 1, c));
    while let Some((pos, c)) = cs.next() {
        match c {
            '\\' => read_escape(&mut cs, pos, &mut out)?,
            '"' => return Err(UnquoteError::UnescapedQuote(pos)),
            '\n' => return Err(UnquoteError::Newline(pos)),
            _ => push_char(&mut out, c),
        }
    }
    match String::from_utf8(out) {
        Ok(s) => Ok(s),
        Err(e) => match format.invalid_utf8 {
            InvalidUtf8::Replace =>
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            InvalidUtf8::Reject => Err(UnquoteError::InvalidUtf8),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::STRICT_FORMAT;

    #[test]
    fn empty_means_no_value() {
        assert_eq!(unquote(""), Ok(String::new()));
        assert_eq!(unquote(r#""""#), Ok(String::new()));
    }

    #[test]
    fn plain() {
        assert_eq!(unquote(r#""v3a v3b""#).unwrap(), "v3a v3b");
        assert_eq!(unquote(r#""héllo, wörld""#).unwrap(), "héllo, wörld");
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(unquote(r#""a\r\n\t""#).unwrap(), "a\r\n\t");
        assert_eq!(unquote(r#""a\\b""#).unwrap(), "a\\b");
        assert_eq!(unquote(r#""a\"b""#).unwrap(), "a\"b");
        assert_eq!(unquote(r#""\a\b\f\v""#).unwrap(), "\x07\x08\x0C\x0B");
    }

    #[test]
    fn numeric_escapes() {
        assert_eq!(unquote(r#""\x41\101""#).unwrap(), "AA");
        assert_eq!(unquote(r#""é\U0001F600""#).unwrap(), "é\u{1F600}");
        // UTF-8 of 'é' spelled as bytes
        assert_eq!(unquote(r#""\xc3\xa9""#).unwrap(), "é");
    }

    #[test]
    fn invalid_utf8_depends_on_format() {
        assert_eq!(unquote(r#""a\xffb""#).unwrap(), "a\u{FFFD}b");
        assert_eq!(unquote_with(r#""a\xffb""#, &STRICT_FORMAT),
                   Err(UnquoteError::InvalidUtf8));
        assert_eq!(unquote_with(r#""a\x41b""#, &STRICT_FORMAT).unwrap(), "aAb");
    }

    #[test]
    fn malformed() {
        assert_eq!(unquote("abc"), Err(UnquoteError::MissingQuotes));
        assert_eq!(unquote("\""), Err(UnquoteError::MissingQuotes));
        assert_eq!(unquote(r#""a\qb""#), Err(UnquoteError::InvalidEscapedChar('q', 3)));
        assert_eq!(unquote(r#""\'""#), Err(UnquoteError::InvalidEscapedChar('\'', 2)));
        assert_eq!(unquote(r#""\x4""#), Err(UnquoteError::UnexpectedEnd(1)));
        assert_eq!(unquote(r#""\xg0""#), Err(UnquoteError::InvalidDigit('g', 3)));
        assert_eq!(unquote(r#""\400""#), Err(UnquoteError::OctalOutOfRange(256, 1)));
        assert_eq!(unquote(r#""\uD800""#),
                   Err(UnquoteError::InvalidCodePoint(0xD800, 1)));
        assert_eq!(unquote("\"a\nb\""), Err(UnquoteError::Newline(2)));
        assert_eq!(unquote(r#""a"b""#), Err(UnquoteError::UnescapedQuote(2)));
        assert_eq!(unquote(r#""ab\""#), Err(UnquoteError::UnexpectedEnd(3)));
    }
}
