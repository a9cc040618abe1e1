// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Descriptions of record types whose fields carry annotation strings.

//! Rust has no runtime reflection, so the fields have to be listed by
//! whoever knows them: either a type implements
//! [Described](Described) (most easily via the
//! [described_struct!](../macro.described_struct.html) macro), or a
//! list of [RawField](RawField) entries is passed to
//! [StructDescription::from_raw](StructDescription::from_raw)
//! directly.

use crate::parse::{parse_tag_list, TagError};
use crate::tag::{Tag, TagList};
use kstring::KString;
use thiserror::Error;
use std::ops::Deref;

/// One field as supplied by the host: its name, the name of its type,
/// and its annotation string ("" if it has none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    pub name: &'a str,
    pub type_name: &'a str,
    pub annotation: &'a str,
}

pub trait Described {
    fn struct_name() -> &'static str;
    /// The fields in declaration order.
    fn raw_fields() -> Vec<RawField<'static>>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not get tags for field {field} of {strukt}: {err}")]
pub struct DescribeError {
    pub strukt: KString,
    pub field: KString,
    pub err: TagError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: KString,
    index: usize,
    type_name: KString,
    tags: TagList,
}

impl Field {
    pub fn name(&self) -> &str { self.name.as_str() }
    /// Position in declaration order, starting at 0.
    pub fn index(&self) -> usize { self.index }
    pub fn type_name(&self) -> &str { self.type_name.as_str() }
    pub fn tags(&self) -> &TagList { &self.tags }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldList(Vec<Field>);

impl FieldList {
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Field::name).collect()
    }
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|f| f.name() == name)
    }
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn filter(&self, pred: impl Fn(&Field) -> bool) -> FieldList {
        self.0.iter().filter(|f| pred(f)).cloned().collect()
    }

    /// Fields having at least one tag called `name`.
    pub fn with_tag(&self, name: &str) -> FieldList {
        self.filter(|f| f.tags.has(name))
    }
    pub fn without_tag(&self, name: &str) -> FieldList {
        self.filter(|f| ! f.tags.has(name))
    }

    /// Fields having at least one tag called `name` whose value is
    /// `value`; with repeated tags any of them may match.
    pub fn with_tag_value(&self, name: &str, value: &str) -> FieldList {
        self.filter(|f| has_tag_value(f, name, value))
    }
    pub fn without_tag_value(&self, name: &str, value: &str) -> FieldList {
        self.filter(|f| ! has_tag_value(f, name, value))
    }
}

fn has_tag_value(f: &Field, name: &str, value: &str) -> bool {
    f.tags.iter().any(|t| t.name() == name && t.value() == value)
}

impl Deref for FieldList {
    type Target = [Field];
    fn deref(&self) -> &[Field] {
        &self.0
    }
}

impl FromIterator<Field> for FieldList {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> FieldList {
        FieldList(iter.into_iter().collect())
    }
}

impl<'t> IntoIterator for &'t FieldList {
    type Item = &'t Field;
    type IntoIter = std::slice::Iter<'t, Field>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDescription {
    name: KString,
    type_name: KString,
    fields: FieldList,
}

impl StructDescription {
    /// Parse the annotation of every field; the first field that does
    /// not parse makes the whole description fail.
    pub fn from_raw<'a>(
        name: &str,
        type_name: &str,
        fields: impl IntoIterator<Item = RawField<'a>>
    ) -> Result<StructDescription, DescribeError>
    {
        let fields = fields.into_iter().enumerate().map(|(index, raw)| {
            match parse_tag_list(raw.annotation) {
                Ok(tags) => Ok(Field {
                    name: KString::from_ref(raw.name),
                    index,
                    type_name: KString::from_ref(raw.type_name),
                    tags,
                }),
                Err(err) => {
                    tracing::debug!(strukt = name, field = raw.name, %err,
                                    "could not describe field");
                    Err(DescribeError {
                        strukt: KString::from_ref(name),
                        field: KString::from_ref(raw.name),
                        err,
                    })
                }
            }
        }).collect::<Result<FieldList, DescribeError>>()?;
        Ok(StructDescription {
            name: KString::from_ref(name),
            type_name: KString::from_ref(type_name),
            fields,
        })
    }

    pub fn name(&self) -> &str { self.name.as_str() }
    /// Full type path as given by `std::any::type_name`.
    pub fn type_name(&self) -> &str { self.type_name.as_str() }
    pub fn fields(&self) -> &FieldList { &self.fields }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
}

pub fn describe<T: Described>() -> Result<StructDescription, DescribeError> {
    StructDescription::from_raw(T::struct_name(),
                                std::any::type_name::<T>(),
                                T::raw_fields())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{ScanError, State};

    fn raw(name: &'static str, annotation: &'static str) -> RawField<'static> {
        RawField { name, type_name: "String", annotation }
    }

    #[test]
    fn fields_keep_declaration_order() {
        let d = StructDescription::from_raw("S", "m::S", [
            raw("B", r#"json:"b""#),
            raw("A", ""),
        ]).unwrap();
        assert_eq!(d.name(), "S");
        assert_eq!(d.type_name(), "m::S");
        assert_eq!(d.fields().names(), ["B", "A"]);
        assert_eq!(d.field("A").map(Field::index), Some(1));
        assert!(d.field("A").unwrap().tags().is_empty());
        assert_eq!(d.field("B").unwrap().tag("json").map(Tag::value), Some("b"));
        assert!(d.field("C").is_none());
    }

    #[test]
    fn duplicate_field_names_give_first_match() {
        let d = StructDescription::from_raw("S", "S", [
            raw("A", r#"n:"1""#),
            raw("A", r#"n:"2""#),
        ]).unwrap();
        assert_eq!(d.field("A").map(Field::index), Some(0));
    }

    #[test]
    fn bad_annotation_names_the_field() {
        let e = StructDescription::from_raw("S", "S", [
            raw("Good", r#"json:"good""#),
            raw("Bad", "json:"),
        ]).unwrap_err();
        assert_eq!(e.field.as_str(), "Bad");
        assert_eq!(e.err, TagError::Scan(
            ScanError::UnexpectedEndOfInput(State::ExpectValue)));
        assert_eq!(e.to_string(),
                   "could not get tags for field Bad of S: \
                    could not parse annotation positions: \
                    unexpected end of input in state ExpectValue");
    }
}
