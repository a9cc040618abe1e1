// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A parser for struct-tag style annotation strings like
//!
//! ```text
//! sql:"id,table:users" json:"id,omitempty" primary
//! ```
//!
//! and a small description layer on top for asking which fields of a
//! record carry which tags. The pieces are:
//!
//! * `fieldtags::scan`, a character level state machine that finds
//!   the tag names and their quoted values and reports errors with
//!   the offending character, its byte offset and the scanner state.
//!
//! * `fieldtags::unquote`, which resolves the backslash escapes of a
//!   quoted value.
//!
//! * `fieldtags::parse`, splitting each value into the primary value
//!   and its `name[:value]` parameters, and `parse_tag_list` which
//!   does all of the above for an annotation string.
//!
//! * `fieldtags::describe` and the `described_struct!` macro, for
//!   filtering fields by tag or tag value.
//!
//! Only the lexical structure is recovered; what a value means is up
//! to the caller. An empty value and no value at all are the same
//! thing (""), for tags as well as for parameters.

pub mod describe;
mod macros;
pub mod parse;
pub mod scan;
pub mod settings;
pub mod tag;
pub mod unquote;

pub use parse::{parse_tag, parse_tag_list, TagError};
pub use tag::{Parameter, ParameterList, Tag, TagList};
