// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsed tags and their parameters.

//! A [Tag](Tag) is one `name:"value,param,param:v"` entry of an
//! annotation string. An empty value and a missing value are the same
//! thing here (both are ""), for tags as well as for parameters.
//! Lookups by name return the first match; duplicates are kept in
//! source order.

use kstring::KString;
use std::fmt::{Display, Formatter, Write};
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: KString,
    value: KString,
}

impl Parameter {
    pub fn new(name: &str, value: &str) -> Parameter {
        Parameter {
            name: KString::from_ref(name),
            value: KString::from_ref(value),
        }
    }
    pub fn name(&self) -> &str { self.name.as_str() }
    pub fn value(&self) -> &str { self.value.as_str() }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(&self.name)?;
        if ! self.value.is_empty() {
            f.write_char(':')?;
            f.write_str(&self.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterList(Vec<Parameter>);

impl ParameterList {
    pub fn new() -> ParameterList {
        ParameterList(Vec::new())
    }
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Parameter::name).collect()
    }
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.iter().find(|p| p.name() == name)
    }
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl Deref for ParameterList {
    type Target = [Parameter];
    fn deref(&self) -> &[Parameter] {
        &self.0
    }
}

impl From<Vec<Parameter>> for ParameterList {
    fn from(v: Vec<Parameter>) -> ParameterList {
        ParameterList(v)
    }
}

impl FromIterator<Parameter> for ParameterList {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> ParameterList {
        ParameterList(iter.into_iter().collect())
    }
}

impl<'t> IntoIterator for &'t ParameterList {
    type Item = &'t Parameter;
    type IntoIter = std::slice::Iter<'t, Parameter>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: KString,
    value: KString,
    parameters: ParameterList,
}

impl Tag {
    pub fn new(name: &str, value: &str, parameters: ParameterList) -> Tag {
        Tag {
            name: KString::from_ref(name),
            value: KString::from_ref(value),
            parameters,
        }
    }
    pub fn name(&self) -> &str { self.name.as_str() }
    pub fn value(&self) -> &str { self.value.as_str() }
    pub fn parameters(&self) -> &ParameterList { &self.parameters }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }
}

// Write s as the inside of a double-quoted tag value.
fn write_escaped(f: &mut Formatter<'_>, s: &str) -> Result<(), std::fmt::Error> {
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => {
                f.write_fmt(format_args!("\\u{:04x}", c as u32))?
            }
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Formats back to annotation syntax, e.g. `sql:"id,table:t"`. A tag
/// without value is written as `name:""`, which parses back to the
/// same `Tag`.
impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(&self.name)?;
        f.write_str(":\"")?;
        write_escaped(f, &self.value)?;
        for p in &self.parameters {
            f.write_char(',')?;
            write_escaped(f, &p.to_string())?;
        }
        f.write_char('"')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagList(Vec<Tag>);

impl TagList {
    pub fn new() -> TagList {
        TagList(Vec::new())
    }
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Tag::name).collect()
    }
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.0.iter().find(|t| t.name() == name)
    }
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    /// All tags called `name`, in order of appearance.
    pub fn with_name(&self, name: &str) -> TagList {
        self.0.iter().filter(|t| t.name() == name).cloned().collect()
    }
}

impl Deref for TagList {
    type Target = [Tag];
    fn deref(&self) -> &[Tag] {
        &self.0
    }
}

impl From<Vec<Tag>> for TagList {
    fn from(v: Vec<Tag>) -> TagList {
        TagList(v)
    }
}

impl FromIterator<Tag> for TagList {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> TagList {
        TagList(iter.into_iter().collect())
    }
}

impl<'t> IntoIterator for &'t TagList {
    type Item = &'t Tag;
    type IntoIter = std::slice::Iter<'t, Tag>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Space separated, as in an annotation string.
impl Display for TagList {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            t.fmt(f)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn params(ps: &[(&str, &str)]) -> ParameterList {
        ps.iter().map(|(n, v)| Parameter::new(n, v)).collect()
    }

    #[test]
    fn parameter_lookup_is_first_match() {
        let ps = params(&[("x", "1"), ("y", ""), ("x", "2")]);
        assert_eq!(ps.names(), ["x", "y", "x"]);
        assert_eq!(ps.get("x"), Some(&Parameter::new("x", "1")));
        assert!(ps.has("y"));
        assert!(! ps.has("z"));
        assert_eq!(ps.get("z"), None);
    }

    #[test]
    fn tag_list_with_name_keeps_order() {
        let tags: TagList = vec![
            Tag::new("z", "x", params(&[("x", "1")])),
            Tag::new("json", "id", ParameterList::new()),
            Tag::new("z", "y", params(&[("y", "1")])),
        ].into();
        assert_eq!(tags.names(), ["z", "json", "z"]);
        assert_eq!(tags.get("z").map(Tag::value), Some("x"));
        let zs = tags.with_name("z");
        assert_eq!(zs.len(), 2);
        assert_eq!(zs[0].value(), "x");
        assert_eq!(zs[1].value(), "y");
        assert!(tags.with_name("sql").is_empty());
    }

    #[test]
    fn tag_accessors() {
        let t = Tag::new("sql", "id", params(&[("table", "t"), ("pk", "")]));
        assert_eq!(t.name(), "sql");
        assert_eq!(t.value(), "id");
        assert_eq!(t.parameter("table").map(Parameter::value), Some("t"));
        assert_eq!(t.parameter("pk").map(Parameter::value), Some(""));
        assert_eq!(t.parameter("nope"), None);
    }

    #[test]
    fn display() {
        let t = Tag::new("sql", "id", params(&[("table", "t"), ("pk", "")]));
        assert_eq!(t.to_string(), r#"sql:"id,table:t,pk""#);
        let t = Tag::new("k", "a \"b\"\n", ParameterList::new());
        assert_eq!(t.to_string(), r#"k:"a \"b\"\n""#);
        let tags: TagList = vec![
            Tag::new("k1", "", ParameterList::new()),
            Tag::new("k2", "", params(&[("p", "")])),
        ].into();
        assert_eq!(tags.to_string(), r#"k1:"" k2:",p""#);
    }
}
