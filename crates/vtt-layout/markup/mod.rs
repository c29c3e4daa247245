//! Cue markup parsing into a styleable text tree
//!
//! Parses WebVTT cue text (`<b>`, `<i>`, `<u>`, `<c.class>`, `<v Name>`,
//! `<lang en>`, `<ruby>`/`<rt>`, inline timestamps and character references)
//! into a [`CueTree`]. Parsing is total: unknown tags, malformed tags and
//! stray closing tags are skipped and their content is kept.
//!
//! # Tree Design
//!
//! - Arena of [`Node`]s addressed by [`NodeId`], no back-pointer ownership
//! - Root node always at index 0
//! - Ruby annotations only ever appear directly under a ruby element
//!
//! # Example
//!
//! ```rust
//! use vtt_layout::markup::{parse, ElementKind, NodeKind};
//!
//! let tree = parse("<v.loud Joe>Hi &amp; bye</v>");
//! let voice = tree.children(tree.root())[0];
//! match tree.node(voice).kind() {
//!     NodeKind::Element(element) => {
//!         assert_eq!(element.kind, ElementKind::Voice);
//!         assert_eq!(element.classes, vec!["loud".to_string()]);
//!         assert_eq!(element.annotation.as_deref(), Some("Joe"));
//!     }
//!     other => panic!("unexpected node {other:?}"),
//! }
//! assert_eq!(tree.text_content(), "Hi & bye");
//! ```

pub(crate) mod diagnostics;
pub mod escape;
mod parser;
pub mod timestamp;

pub use escape::decode_entities;
pub use parser::parse;
pub use timestamp::parse_timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a node inside a [`CueTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Element kinds a cue tag can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementKind {
    /// `<c>` generic class span
    Class,
    /// `<i>`
    Italic,
    /// `<b>`
    Bold,
    /// `<u>`
    Underline,
    /// `<ruby>` container
    Ruby,
    /// `<rt>` ruby annotation
    RubyText,
    /// `<v>` voice span
    Voice,
    /// `<lang>` language span
    Language,
}

impl ElementKind {
    /// Map a cue tag name to its element kind
    #[must_use]
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "c" => Some(Self::Class),
            "i" => Some(Self::Italic),
            "b" => Some(Self::Bold),
            "u" => Some(Self::Underline),
            "ruby" => Some(Self::Ruby),
            "rt" => Some(Self::RubyText),
            "v" => Some(Self::Voice),
            "lang" => Some(Self::Language),
            _ => None,
        }
    }

    /// Cue tag name of this kind
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::Class => "c",
            Self::Italic => "i",
            Self::Bold => "b",
            Self::Underline => "u",
            Self::Ruby => "ruby",
            Self::RubyText => "rt",
            Self::Voice => "v",
            Self::Language => "lang",
        }
    }

    /// Kind that must be the immediate parent, if constrained
    #[must_use]
    pub const fn required_parent(self) -> Option<Self> {
        match self {
            Self::RubyText => Some(Self::Ruby),
            _ => None,
        }
    }

    /// Whether the tag's annotation text is kept (voice name, language tag)
    #[must_use]
    pub const fn keeps_annotation(self) -> bool {
        matches!(self, Self::Voice | Self::Language)
    }
}

/// Element payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    /// Element kind
    pub kind: ElementKind,
    /// Class tokens from `.a.b`
    pub classes: Vec<String>,
    /// Voice name or language tag
    pub annotation: Option<String>,
}

impl Element {
    /// Class list joined with spaces, as a renderer's `class` attribute
    #[must_use]
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    /// Tree root
    Root,
    /// Decoded text run
    Text(String),
    /// Styled element scope
    Element(Element),
    /// Zero-width inline timestamp in seconds
    Timestamp(f64),
}

/// Tree node with its links
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Node payload
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Parent node, `None` for the root
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Element payload if this node is an element
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text if this node is a text run
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this node is a ruby annotation element
    #[must_use]
    pub fn is_ruby_text(&self) -> bool {
        self.as_element()
            .is_some_and(|element| element.kind == ElementKind::RubyText)
    }
}

/// Parsed cue text
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CueTree {
    nodes: Vec<Node>,
}

impl Default for CueTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CueTree {
    /// Create a tree holding only the root
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Root node id
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes including the root
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no children
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Look up a node
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Look up a node without panicking
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Children of `id` in document order
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .map_or(&[] as &[NodeId], |node| node.children.as_slice())
    }

    /// Parent of `id`
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Node ids in document order (pre-order, root first)
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// All text, ruby annotations included
    #[must_use]
    pub fn text_content(&self) -> String {
        self.descendants()
            .filter_map(|id| self.node(id).as_text())
            .collect()
    }

    /// Text that occupies line space: ruby annotations and timestamps excluded
    #[must_use]
    pub fn renderable_text(&self) -> String {
        let mut out = String::new();
        self.collect_renderable(self.root(), &mut out);
        out
    }

    /// Whether any non-whitespace renderable character exists
    #[must_use]
    pub fn has_renderable_text(&self) -> bool {
        self.renderable_text().chars().any(|ch| !ch.is_whitespace())
    }

    fn collect_renderable(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(element) if element.kind == ElementKind::RubyText => {}
            NodeKind::Root | NodeKind::Element(_) => {
                for &child in &node.children {
                    self.collect_renderable(child, out);
                }
            }
            NodeKind::Timestamp(_) => {}
        }
    }

    /// Append a node under `parent` and return its id
    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}

/// Pre-order iterator over a [`CueTree`]
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a CueTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_is_empty() {
        let tree = CueTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root()).kind(), &NodeKind::Root);
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.text_content(), "");
    }

    #[test]
    fn append_links_parent_and_child() {
        let mut tree = CueTree::new();
        let root = tree.root();
        let bold = tree.append(
            root,
            NodeKind::Element(Element {
                kind: ElementKind::Bold,
                classes: Vec::new(),
                annotation: None,
            }),
        );
        let text = tree.append(bold, NodeKind::Text("x".to_string()));

        assert_eq!(tree.children(root), &[bold]);
        assert_eq!(tree.parent(text), Some(bold));
        assert_eq!(tree.descendants().collect::<Vec<_>>(), vec![root, bold, text]);
    }

    #[test]
    fn renderable_text_skips_ruby_annotations() {
        let tree = parse("<ruby>漢<rt>kan</rt></ruby>字");
        assert_eq!(tree.text_content(), "漢kan字");
        assert_eq!(tree.renderable_text(), "漢字");
    }

    #[test]
    fn whitespace_only_is_not_renderable() {
        assert!(!parse(" \n ").has_renderable_text());
        assert!(!parse("<00:00:01.000>").has_renderable_text());
        assert!(parse("<i>a</i>").has_renderable_text());
    }

    #[test]
    fn element_kind_mapping() {
        assert_eq!(ElementKind::from_tag("c"), Some(ElementKind::Class));
        assert_eq!(ElementKind::from_tag("span"), None);
        assert_eq!(ElementKind::Voice.tag_name(), "v");
        assert_eq!(ElementKind::RubyText.required_parent(), Some(ElementKind::Ruby));
        assert!(ElementKind::Language.keeps_annotation());
        assert!(!ElementKind::Bold.keeps_annotation());
    }
}
