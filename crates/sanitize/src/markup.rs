use std::io;

use ego_tree::iter::Edge;
use ego_tree::{NodeId, NodeMut, NodeRef, Tree};
use html5ever::serialize::{HtmlSerializer, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{namespace_url, ns, LocalName, QualName};
use scraper::node::Node;
use scraper::Html;

/// A node of a parsed fragment. Comments and other non-content nodes are
/// not represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// The fragment itself. Only ever the root of the tree.
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Local name as reported by the parser (lowercase for HTML elements).
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

/// Markup tree stored in an arena. Walking and dropping it never recurse,
/// however deep the nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    tree: Tree<Markup>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Uppercase tag name, the form used for policy comparisons.
    pub fn tag(&self) -> String {
        self.name.to_ascii_uppercase()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrites an existing attribute in place, or appends a new one.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.into(),
            None => self.attrs.push((name.into(), value.into())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Fragment {
            tree: Tree::new(Markup::Root),
        }
    }
}

impl Fragment {
    pub fn root(&self) -> NodeRef<'_, Markup> {
        self.tree.root()
    }

    /// Concatenation of all text, in document order.
    pub fn text_content(&self) -> String {
        text_content(self.root())
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.tree.root()
            .descendants()
            .filter_map(|node| match node.value() {
                Markup::Element(el) => Some(el),
                _ => None,
            })
    }
}

/// Concatenation of the text below `node`, in document order.
pub fn text_content(node: NodeRef<'_, Markup>) -> String {
    node.descendants()
        .filter_map(|node| match node.value() {
            Markup::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Builds a fragment in document order: `open` descends into a new element,
/// `close` returns to its parent.
#[derive(Debug)]
pub struct FragmentBuilder {
    tree: Tree<Markup>,
    open: Vec<NodeId>,
}

impl Default for FragmentBuilder {
    fn default() -> Self {
        let tree = Tree::new(Markup::Root);
        let root = tree.root().id();
        FragmentBuilder { tree, open: vec![root] }
    }
}

impl FragmentBuilder {
    pub fn new() -> Self {
        FragmentBuilder::default()
    }

    fn current(&mut self) -> NodeMut<'_, Markup> {
        let id = self.open.last().copied().unwrap_or_else(|| self.tree.root().id());
        self.tree.get_mut(id).expect("open nodes belong to the tree")
    }

    pub fn text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.current().append(Markup::Text(text));
        }
    }

    pub fn open(&mut self, el: Element) {
        let id = self.current().append(Markup::Element(el)).id();
        self.open.push(id);
    }

    /// Closing with only the root open is a no-op.
    pub fn close(&mut self) {
        if self.open.len() > 1 {
            self.open.pop();
        }
    }

    pub fn finish(self) -> Fragment {
        Fragment { tree: self.tree }
    }
}

/// Parsing and serialization of markup fragments.
///
/// Parsing must never fail: malformed input yields a best-effort tree.
pub trait Codec {
    fn parse(&self, input: &str) -> Fragment;
    fn serialize(&self, fragment: &Fragment) -> String;
}

/// html5ever-backed codec (through `scraper`), parsing in a `<body>`
/// context with the standard HTML error recovery. Attributes are
/// serialized in name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Codec;

impl Codec for Html5Codec {
    fn parse(&self, input: &str) -> Fragment {
        if input.is_empty() {
            return Fragment::default();
        }
        let html = Html::parse_fragment(input);
        if !html.errors.is_empty() {
            trace!("recovered from {} parse errors", html.errors.len());
        }

        let root = html.root_element();
        let mut builder = FragmentBuilder::new();
        for edge in root.traverse() {
            match edge {
                Edge::Open(node) if node.id() == root.id() => {},
                Edge::Open(node) => match node.value() {
                    Node::Text(text) => builder.text(&**text),
                    Node::Element(el) => builder.open(Element {
                        name: el.name().to_owned(),
                        attrs: el.attrs().map(|(k, v)| (k.to_owned(), v.to_owned())).collect(),
                    }),
                    // comments, doctypes, processing instructions
                    _ => {},
                },
                Edge::Close(node) if node.id() != root.id() && node.value().is_element() => {
                    builder.close()
                },
                Edge::Close(_) => {},
            }
        }
        builder.finish()
    }

    fn serialize(&self, fragment: &Fragment) -> String {
        let mut out = Vec::new();
        html5ever::serialize(&mut out, fragment, SerializeOpts::default())
            .expect("writing to memory cannot fail");
        String::from_utf8_lossy(&out).into_owned()
    }
}

fn html_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}

impl Serialize for Fragment {
    /// The root has no tag of its own, so both traversal scopes write only
    /// its children.
    fn serialize<S: Serializer>(&self, serializer: &mut S, _scope: TraversalScope) -> io::Result<()> {
        for edge in self.tree.root().traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    Markup::Element(el) => {
                        // name order, so output does not depend on how attributes were added
                        let mut attrs = el.attrs.iter().collect::<Vec<_>>();
                        attrs.sort_by(|a, b| a.0.cmp(&b.0));
                        let names = attrs.iter()
                            .map(|(name, _)| QualName::new(None, ns!(), LocalName::from(name.as_str())))
                            .collect::<Vec<_>>();
                        serializer.start_elem(
                            html_name(&el.name),
                            names.iter().zip(&attrs).map(|(name, (_, value))| (name, value.as_str())),
                        )?;
                    },
                    Markup::Text(text) => serializer.write_text(text)?,
                    Markup::Root => {},
                },
                Edge::Close(node) => {
                    if let Markup::Element(el) = node.value() {
                        serializer.end_elem(html_name(&el.name))?;
                    }
                },
            }
        }
        Ok(())
    }
}

/// Escapes text for use as element content.
pub fn escape_body(text: &str) -> String {
    let mut serializer = HtmlSerializer::new(Vec::with_capacity(text.len()), SerializeOpts::default());
    serializer.write_text(text).expect("writing to memory cannot fail");
    String::from_utf8_lossy(&serializer.writer).into_owned()
}

/// Escapes text for use inside a double-quoted attribute value.
pub fn escape_attribute(text: &str) -> String {
    escape_body(text).replace('"', "&quot;")
}
