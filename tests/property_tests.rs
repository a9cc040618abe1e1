//! Properties of the annotation parser over generated inputs.

use fieldtags::unquote::unquote;
use fieldtags::{parse_tag_list, Parameter, ParameterList, Tag};
use proptest::prelude::*;

// Escape the three characters that cannot appear raw in a quoted value.
fn quote(s: &str) -> String {
    let mut out = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,8}"
}

proptest! {
    #[test]
    fn bare_names_give_valueless_tags(
        names in prop::collection::vec(name_strategy(), 0..6),
        gaps in prop::collection::vec(" {1,3}", 6),
        lead in " {0,2}",
    ) {
        let mut input = lead;
        for (name, gap) in names.iter().zip(gaps.iter()) {
            input.push_str(name);
            input.push_str(gap);
        }
        let tags = parse_tag_list(&input).unwrap();
        prop_assert_eq!(tags.names(), names.iter().map(String::as_str).collect::<Vec<_>>());
        for t in &tags {
            prop_assert_eq!(t.value(), "");
            prop_assert!(t.parameters().is_empty());
        }
    }

    #[test]
    fn parsing_is_repeatable(input in ".{0,40}") {
        prop_assert_eq!(parse_tag_list(&input), parse_tag_list(&input));
    }

    #[test]
    fn quoted_values_come_back(value in any::<String>()) {
        let quoted = quote(&value);
        prop_assert_eq!(unquote(&quoted).unwrap(), value.clone());

        let tags = parse_tag_list(&format!("k:{}", quoted)).unwrap();
        prop_assert_eq!(tags.len(), 1);
        let primary = value.split(',').next().unwrap_or("");
        prop_assert_eq!(tags[0].value(), primary);
    }

    #[test]
    fn displayed_tags_parse_back(
        name in "[A-Za-z_][A-Za-z0-9_]{0,6}",
        value in "[^,]{0,10}",
        ps in prop::collection::vec(("[^,:]{1,6}", "[^,]{0,6}"), 0..4),
    ) {
        let parameters: ParameterList =
            ps.iter().map(|(n, v)| Parameter::new(n, v)).collect();
        let tag = Tag::new(&name, &value, parameters);
        let tags = parse_tag_list(&tag.to_string()).unwrap();
        prop_assert_eq!(tags.len(), 1);
        prop_assert_eq!(&tags[0], &tag);
    }
}
