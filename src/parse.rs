// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! From annotation strings to [Tag](../tag/struct.Tag.html) lists:
//! scanning positions, unquoting the values, and splitting each value
//! into the primary value and its parameters.

use crate::scan::{self, ScanError};
use crate::settings::{Format, LENIENT_FORMAT};
use crate::tag::{Parameter, ParameterList, Tag, TagList};
use crate::unquote::UnquoteError;
use kstring::KString;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("could not parse annotation positions: {0}")]
    Scan(ScanError),
    #[error("could not unquote value for tag {tag}: {err}")]
    Unquote {
        tag: KString,
        err: UnquoteError,
    },
}

fn parameter_list(section: &str) -> ParameterList {
    section.split(',')
        .filter(|e| ! e.is_empty())
        .map(|e| match e.split_once(':') {
            Some((name, value)) => Parameter::new(name, value),
            None => Parameter::new(e, ""),
        })
        .collect()
}

/// Split an unquoted tag value at its first comma into the primary
/// value and the parameters, e.g. `id,table:t` into `id` and
/// `[table:t]`. Empty parameter entries are skipped.
pub fn split_value_and_parameters(tag_value: &str) -> (&str, ParameterList) {
    match tag_value.split_once(',') {
        None => (tag_value, ParameterList::new()),
        Some((value, "")) => (value, ParameterList::new()),
        Some((value, rest)) => (value, parameter_list(rest)),
    }
}

/// Build a tag from a name and its already unquoted value.
pub fn parse_tag(name: &str, tag_value: &str) -> Tag {
    let (value, parameters) = split_value_and_parameters(tag_value);
    Tag::new(name, value, parameters)
}

pub fn parse_tag_list(annotation: &str) -> Result<TagList, TagError> {
    parse_tag_list_with(annotation, &LENIENT_FORMAT)
}

/// Parse a whole annotation string like `sql:"id,table:t" json:"id"`.
/// Stops at the first error; no partial list is returned.
pub fn parse_tag_list_with(
    annotation: &str,
    format: &Format
) -> Result<TagList, TagError>
{
    let positions = scan::position_list(annotation).map_err(TagError::Scan)?;
    let mut tags = Vec::with_capacity(positions.len());
    for raw in scan::names_and_values(annotation, &positions) {
        let unquoted = raw.unquoted_value(format).map_err(|err| {
            tracing::debug!(tag = raw.name, %err, "could not unquote tag value");
            TagError::Unquote { tag: KString::from_ref(raw.name), err }
        })?;
        tags.push(parse_tag(raw.name, &unquoted));
    }
    Ok(TagList::from(tags))
}
