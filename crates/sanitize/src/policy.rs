use std::collections::{HashMap, HashSet};

/// Tags that survive sanitization as elements. Everything else is
/// collapsed to its text content.
pub const ALLOWED_TAGS: &[&str] = &["STRONG", "EM", "B", "I", "U", "A", "BR", "SPAN"];

/// Attributes kept per tag. Tags without an entry keep no attributes.
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("A", &["href", "target", "rel"]),
    ("SPAN", &["class"]),
];

/// An allow-list of tags and per-tag attributes.
///
/// Tag names are matched case-insensitively; they are stored uppercase.
/// Attribute names are stored lowercase, which is how the parser reports
/// them for HTML elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    tags: HashSet<String>,
    attributes: HashMap<String, HashSet<String>>,
}

impl Default for Policy {
    fn default() -> Self {
        let mut policy = Policy::empty().add_tags(ALLOWED_TAGS.iter().copied());
        for (tag, attrs) in ALLOWED_ATTRIBUTES {
            policy = policy.add_tag_attributes(tag, attrs.iter().copied());
        }
        policy
    }
}

impl Policy {
    /// A policy that allows nothing; every element collapses to text.
    pub fn empty() -> Self {
        Policy {
            tags: HashSet::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn add_tags<'a>(mut self, tags: impl IntoIterator<Item = &'a str>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.to_ascii_uppercase()));
        self
    }

    pub fn add_tag_attributes<'a>(
        mut self,
        tag: &str,
        attrs: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.attributes.entry(tag.to_ascii_uppercase())
            .or_default()
            .extend(attrs.into_iter().map(|a| a.to_ascii_lowercase()));
        self
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_uppercase())
    }

    pub fn allows_attribute(&self, tag: &str, attr: &str) -> bool {
        self.attributes.get(&tag.to_ascii_uppercase())
            .map(|set| set.contains(&attr.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Attributes permitted on `tag`; empty when the tag has no entry.
    pub fn attributes_for(&self, tag: &str) -> impl Iterator<Item = &str> {
        self.attributes.get(&tag.to_ascii_uppercase())
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}
