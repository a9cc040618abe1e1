// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for turning quoted tag values into strings.

/// What to do when `\x` or octal escapes produce bytes that are not
/// valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidUtf8 {
    /// Substitute U+FFFD for each invalid sequence.
    Replace,
    /// Fail with `UnquoteError::InvalidUtf8`.
    Reject,
}

#[derive(Debug)]
pub struct Format {
    pub invalid_utf8: InvalidUtf8,
}

/// Never fails on byte escapes; used by `parse_tag_list`.
pub const LENIENT_FORMAT : Format = Format {
    invalid_utf8: InvalidUtf8::Replace,
};

pub const STRICT_FORMAT : Format = Format {
    invalid_utf8: InvalidUtf8::Reject,
};
