//! Allow-list sanitizer for author-supplied rich text.
//!
//! Disallowed elements are collapsed to their text content rather than
//! dropped, so no characters of the input text are lost.

#[macro_use]
extern crate tracing;

use std::sync::OnceLock;

use ego_tree::iter::Edge;
use ego_tree::NodeId;

pub mod markup;
pub mod policy;
#[cfg(test)]
mod properties;

pub use markup::{escape_attribute, escape_body, text_content, Codec, Element, Fragment, FragmentBuilder, Html5Codec, Markup};
pub use policy::{Policy, ALLOWED_ATTRIBUTES, ALLOWED_TAGS};

pub struct Sanitizer<C = Html5Codec> {
    policy: Policy,
    codec: C,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Sanitizer::new(Policy::default())
    }
}

impl Sanitizer {
    pub fn new(policy: Policy) -> Self {
        Sanitizer::with_codec(policy, Html5Codec)
    }
}

impl<C: Codec> Sanitizer<C> {
    pub fn with_codec(policy: Policy, codec: C) -> Self {
        Sanitizer { policy, codec }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn clean<'a>(&self, input: impl Into<Option<&'a str>>) -> String {
        let Some(input) = input.into() else { return String::new() };
        let fragment = self.clean_fragment(&self.codec.parse(input));
        self.codec.serialize(&fragment)
    }

    /// Builds a new fragment from `fragment` in a single walk. Disallowed
    /// elements contribute their text in place of themselves.
    pub fn clean_fragment(&self, fragment: &Fragment) -> Fragment {
        let mut out = FragmentBuilder::new();
        // disallowed element being collapsed, and its text so far
        let mut collapsing: Option<(NodeId, String)> = None;

        for edge in fragment.root().traverse() {
            if let Some((id, text)) = &mut collapsing {
                match edge {
                    Edge::Open(node) => {
                        if let Markup::Text(t) = node.value() {
                            text.push_str(t);
                        }
                    },
                    Edge::Close(node) if node.id() == *id => {
                        out.text(std::mem::take(text));
                        collapsing = None;
                    },
                    Edge::Close(_) => {},
                }
                continue;
            }

            match edge {
                Edge::Open(node) => match node.value() {
                    Markup::Element(el) if self.policy.allows_tag(&el.name) => {
                        out.open(self.clean_element(el.clone()));
                    },
                    Markup::Element(el) => {
                        trace!(tag = %el.name, "collapsing disallowed element to text");
                        collapsing = Some((node.id(), String::new()));
                    },
                    Markup::Text(text) => out.text(text.as_str()),
                    Markup::Root => {},
                },
                Edge::Close(node) => {
                    if let Markup::Element(_) = node.value() {
                        out.close();
                    }
                },
            }
        }
        out.finish()
    }

    fn clean_element(&self, mut el: Element) -> Element {
        let tag = el.tag();
        el.attrs.retain(|(name, _)| {
            let keep = self.policy.allows_attribute(&tag, name);
            if !keep {
                trace!(%tag, attr = %name, "stripping attribute");
            }
            keep
        });
        if tag == "A" {
            self.harden_anchor(&mut el);
        }
        el
    }

    /// Drops `javascript:` hrefs and forces `target`/`rel` on links that
    /// start with `http`.
    ///
    /// The scheme test trims and lowercases the href; the `http` test is a
    /// raw, case-sensitive prefix match, so `Http://x` or ` http://x` are
    /// left without `target`/`rel`.
    fn harden_anchor(&self, el: &mut Element) {
        let Some(href) = el.attr("href").map(str::to_owned) else { return };

        if is_script_href(&href) {
            debug!(%href, "removing script href from anchor");
            el.remove_attr("href");
        } else if href.starts_with("http") {
            if self.policy.allows_attribute("A", "target") {
                el.set_attr("target", "_blank");
            }
            if self.policy.allows_attribute("A", "rel") {
                el.set_attr("rel", "noopener noreferrer");
            }
        }
    }
}

/// Unicode whitespace other than U+0085 (NEL), plus U+FEFF.
fn is_trim_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

fn is_script_href(href: &str) -> bool {
    href.trim_matches(is_trim_whitespace)
        .to_lowercase()
        .starts_with("javascript:")
}

fn default_sanitizer() -> &'static Sanitizer {
    static DEFAULT: OnceLock<Sanitizer> = OnceLock::new();
    DEFAULT.get_or_init(Sanitizer::default)
}

/// Sanitizes rich text with the default policy. `None` yields `""`.
pub fn sanitize<'a>(input: impl Into<Option<&'a str>>) -> String {
    default_sanitizer().clean(input)
}

/// Escapes text so that no character of it can be read as markup, in
/// element content or in any attribute position.
pub fn escape_text(value: impl std::fmt::Display) -> String {
    ammonia::clean_text(&value.to_string())
}

pub fn escape_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(escape_text).unwrap_or_default()
}
