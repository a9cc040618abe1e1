// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating an annotation string like `k1 k2:"v2" k3:"v3a v3b"`
//! into position records: where each tag name lives, and where its
//! quoted value lives, if it has one. Nothing is unquoted or copied
//! here; see [unquote](../unquote/index.html) and
//! [parse](../parse/index.html) for that.

use crate::settings::Format;
use crate::unquote::{unquote_with, UnquoteError};
use genawaiter::rc::Gen;
use thiserror::Error;
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// The states of the scanner. There is no final state; what happens
/// at the end of the input depends on the state reached then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Initial,
    ReadingName,
    ExpectValue,
    ReadingValue,
    ReadingEscapedCharacter,
}

impl State {
    pub fn name(self) -> &'static str {
        match self {
            State::Initial => "Initial",
            State::ReadingName => "ReadingName",
            State::ExpectValue => "ExpectValue",
            State::ReadingValue => "ReadingValue",
            State::ReadingEscapedCharacter => "ReadingEscapedCharacter",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Character, its byte offset, and the state that rejected it.
    #[error("unexpected '{0}' at {1} in state {2}")]
    UnexpectedCharacter(char, usize, State),
    #[error("unexpected end of input in state {0}")]
    UnexpectedEndOfInput(State),
}

/// Byte offsets of one tag in the annotation string. `value` includes
/// the surrounding quotes and is only meaningful if `colon` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPosition {
    pub name: Range<usize>,
    pub colon: Option<usize>,
    pub value: Range<usize>,
}

impl TagPosition {
    fn valueless(name: Range<usize>) -> TagPosition {
        TagPosition { name, colon: None, value: 0..0 }
    }

    pub fn has_value(&self) -> bool {
        self.colon.is_some()
    }

    /// `s` must be the string the position was scanned from.
    pub fn name_in<'s>(&self, s: &'s str) -> &'s str {
        &s[self.name.clone()]
    }

    /// The quoted value including its quotes, or "" for a bare name.
    pub fn quoted_value_in<'s>(&self, s: &'s str) -> &'s str {
        if self.has_value() {
            &s[self.value.clone()]
        } else {
            ""
        }
    }

    pub fn name_and_value<'s>(&self, s: &'s str) -> RawNameValue<'s> {
        RawNameValue {
            name: self.name_in(s),
            quoted_value: self.quoted_value_in(s),
        }
    }
}

/// A tag name and its still-quoted value, sliced from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawNameValue<'s> {
    pub name: &'s str,
    pub quoted_value: &'s str,
}

impl<'s> RawNameValue<'s> {
    pub fn unquoted_value(&self, format: &Format) -> Result<String, UnquoteError> {
        unquote_with(self.quoted_value, format)
    }
}

pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Scan `input` lazily. The iterator ends after the first error.
pub fn positions<'s>(
    input: &'s str
) -> impl Iterator<Item = Result<TagPosition, ScanError>> + 's
{
    Gen::new(|co| async move {
        let mut state = State::Initial;
        let mut name_start = 0;
        let mut colon = 0;
        let mut value_start = 0;
        for (i, c) in input.char_indices() {
            // `continue` re-examines c in the new state, `break` moves
            // on to the next character. Falling out of the match means
            // c is not acceptable in `state`.
            loop {
                match state {
                    State::Initial => {
                        if c == ' ' {
                            break
                        }
                        if is_name_char(c) {
                            name_start = i;
                            state = State::ReadingName;
                            continue
                        }
                    }
                    State::ReadingName => {
                        if is_name_char(c) {
                            break
                        }
                        if c == ':' {
                            colon = i;
                            state = State::ExpectValue;
                            break
                        }
                        if c == ' ' {
                            tracing::trace!(start = name_start, end = i,
                                            "bare tag name");
                            co.yield_(Ok(TagPosition::valueless(name_start..i)))
                                .await;
                            state = State::Initial;
                            continue
                        }
                    }
                    State::ExpectValue => {
                        if c == ' ' {
                            break
                        }
                        if c == '"' {
                            value_start = i;
                            state = State::ReadingValue;
                            break
                        }
                    }
                    State::ReadingValue => {
                        if c == '"' {
                            tracing::trace!(start = name_start,
                                            value_start, value_end = i + 1,
                                            "tag with value");
                            co.yield_(Ok(TagPosition {
                                name: name_start..colon,
                                colon: Some(colon),
                                value: value_start..i + 1,
                            })).await;
                            state = State::Initial;
                        } else if c == '\\' {
                            state = State::ReadingEscapedCharacter;
                        }
                        break
                    }
                    State::ReadingEscapedCharacter => {
                        state = State::ReadingValue;
                        break
                    }
                }
                tracing::debug!(offset = i, state = state.name(),
                                "unexpected character in annotation");
                co.yield_(Err(ScanError::UnexpectedCharacter(c, i, state))).await;
                return;
            }
        }
        match state {
            State::Initial => {}
            State::ReadingName => {
                co.yield_(Ok(TagPosition::valueless(name_start..input.len())))
                    .await;
            }
            _ => {
                tracing::debug!(state = state.name(),
                                "annotation ended too early");
                co.yield_(Err(ScanError::UnexpectedEndOfInput(state))).await;
            }
        }
    }).into_iter()
}

/// All positions of `input`, or the first error.
pub fn position_list(input: &str) -> Result<Vec<TagPosition>, ScanError> {
    positions(input).collect()
}

pub fn names_and_values<'s>(
    input: &'s str,
    positions: &[TagPosition]
) -> Vec<RawNameValue<'s>> {
    positions.iter().map(|p| p.name_and_value(input)).collect()
}
