use proptest::prelude::*;

use crate::{sanitize, escape_text, Codec, Html5Codec, Policy};

const TAGS: &[&str] = &[
    "strong", "EM", "b", "I", "u", "a", "br", "Span",
    "div", "p", "script", "style", "img", "h1", "li", "iframe",
];
const ATTRS: &[&str] = &["href", "class", "target", "rel", "onclick", "style", "src"];
const VALUES: &[&str] = &[
    "x", "javascript:alert(1)", " JavaScript:void(0)", "https://example.com",
    "http://a.org/?q=1&r=2", "Http://caps.org", "/local", "a\"b", "",
];

fn attribute() -> impl Strategy<Value = String> {
    (prop::sample::select(ATTRS), prop::sample::select(VALUES))
        .prop_map(|(name, value)| format!(" {}=\"{}\"", name, value.replace('"', "&quot;")))
}

fn piece() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z &<>;]{0,6}",
        (prop::sample::select(TAGS), prop::collection::vec(attribute(), 0..3))
            .prop_map(|(tag, attrs)| format!("<{}{}>", tag, attrs.concat())),
        prop::sample::select(TAGS).prop_map(|tag| format!("</{}>", tag)),
    ]
}

fn markup() -> impl Strategy<Value = String> {
    prop::collection::vec(piece(), 0..16).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(input in markup()) {
        let once = sanitize(input.as_str());
        prop_assert_eq!(sanitize(once.as_str()), once);
    }

    #[test]
    fn output_only_contains_allowed_tags_and_attributes(input in markup()) {
        let policy = Policy::default();
        let output = Html5Codec.parse(&sanitize(input.as_str()));
        let mut violations = Vec::new();
        for el in output.elements() {
            if !policy.allows_tag(&el.name) {
                violations.push(format!("tag {}", el.name));
            }
            for (name, _) in &el.attrs {
                if !policy.allows_attribute(&el.name, name) {
                    violations.push(format!("attribute {} on {}", name, el.name));
                }
            }
        }
        prop_assert!(violations.is_empty(), "{:?} in output for {:?}", violations, input);
    }

    #[test]
    fn text_content_is_preserved(input in markup()) {
        let before = Html5Codec.parse(&input).text_content();
        let after = Html5Codec.parse(&sanitize(input.as_str())).text_content();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn no_anchor_keeps_a_script_href(input in markup()) {
        let output = Html5Codec.parse(&sanitize(input.as_str()));
        let found = output.elements()
            .filter_map(|el| el.attr("href"))
            .find(|href| href.trim().to_lowercase().starts_with("javascript:"));
        prop_assert_eq!(found, None);
    }

    #[test]
    fn escaped_text_has_no_markup(input in any::<String>()) {
        let escaped = escape_text(&input);
        prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
        // every ampersand starts a character reference
        for (i, _) in escaped.match_indices('&') {
            let rest = &escaped[i + 1..];
            let end = rest.find(';');
            prop_assert!(end.is_some(), "dangling ampersand in {:?}", escaped);
            prop_assert!(rest[..end.unwrap_or(0)].chars().all(|c| c.is_ascii_alphanumeric() || c == '#'));
        }
    }

    #[test]
    fn escaping_twice_escapes_the_ampersands(input in "[a-z<>&]{1,12}") {
        let once = escape_text(&input);
        let twice = escape_text(&once);
        prop_assert_eq!(twice, once.replace('&', "&amp;"));
    }
}
