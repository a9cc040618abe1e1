// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Declare a struct whose fields carry annotation strings, and
/// implement [Described](describe/trait.Described.html) for it.
///
/// ```
/// use fieldtags::described_struct;
/// use fieldtags::describe::describe;
///
/// described_struct! {
///     #[derive(Debug, Default)]
///     pub struct User {
///         #[tag = r#"sql:"id,table:users" json:"id""#]
///         pub id: u64,
///         #[tag = r#"json:"name,omitempty""#]
///         pub name: String,
///         pub cache: Vec<u8>,
///     }
/// }
///
/// let d = describe::<User>().unwrap();
/// assert_eq!(d.fields().with_tag("json").names(), ["id", "name"]);
/// let sql = d.field("id").unwrap().tag("sql").unwrap();
/// assert_eq!(sql.parameter("table").unwrap().value(), "users");
/// ```
#[macro_export]
macro_rules! described_struct {
    (@annotation) => {
        ""
    };
    (@annotation $annotation:literal) => {
        $annotation
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[tag = $annotation:literal])?
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $fvis $field : $ty ),*
        }

        impl $crate::describe::Described for $name {
            fn struct_name() -> &'static str {
                stringify!($name)
            }
            fn raw_fields() -> ::std::vec::Vec<$crate::describe::RawField<'static>> {
                ::std::vec![
                    $(
                        $crate::describe::RawField {
                            name: stringify!($field),
                            type_name: ::std::any::type_name::<$ty>(),
                            annotation: $crate::described_struct!(
                                @annotation $($annotation)?),
                        }
                    ),*
                ]
            }
        }
    };
}
