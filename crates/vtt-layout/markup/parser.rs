//! Cue markup tokenizer and tree builder
//!
//! The tokenizer splits raw cue text into text runs and tags. The builder
//! keeps an explicit stack of open elements and appends into the tree arena;
//! every token either applies or is skipped with a recorded reason.

use log::trace;

use super::{
    decode_entities,
    diagnostics::{MarkupDiagnostic, ParseOutcome, SkipReason},
    parse_timestamp, CueTree, Element, ElementKind, NodeId, NodeKind,
};

/// Parse raw cue text into a tree
///
/// Never fails: malformed or unsupported markup is skipped and its text kept.
///
/// # Example
///
/// ```rust
/// use vtt_layout::markup::{parse, NodeKind};
///
/// let tree = parse("<rt>x</rt>");
/// let children = tree.children(tree.root());
/// assert_eq!(children.len(), 1);
/// assert_eq!(tree.node(children[0]).kind(), &NodeKind::Text("x".to_string()));
/// ```
#[must_use]
pub fn parse(raw: &str) -> CueTree {
    parse_with_diagnostics(raw).0
}

/// Parse raw cue text and report every skipped token
pub(crate) fn parse_with_diagnostics(raw: &str) -> (CueTree, Vec<MarkupDiagnostic>) {
    let mut builder = TreeBuilder::new();
    let mut diagnostics = Vec::new();

    for token in Tokens::new(raw) {
        let outcome = match token.kind {
            TokenKind::Text => builder.push_text(token.text),
            TokenKind::Tag => builder.push_tag(token.text),
        };
        if let ParseOutcome::Skipped(reason) = outcome {
            let diagnostic = MarkupDiagnostic {
                offset: token.offset,
                token: token.text.to_owned(),
                reason,
            };
            trace!("skipped cue markup token {diagnostic}");
            diagnostics.push(diagnostic);
        }
    }

    (builder.finish(), diagnostics)
}

/// Token classes produced by [`Tokens`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    /// Characters up to the next `<`
    Text,
    /// `<` up to and including `>`, or to end of input
    Tag,
}

/// A token borrowed from the raw cue text
#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    offset: usize,
}

/// Iterator over text runs and tags
struct Tokens<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Tokens<'a> {
    const fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.source.get(self.position..)?;
        if rest.is_empty() {
            return None;
        }

        let (kind, len) = if rest.starts_with('<') {
            (TokenKind::Tag, rest.find('>').map_or(rest.len(), |end| end + 1))
        } else {
            (TokenKind::Text, rest.find('<').unwrap_or(rest.len()))
        };

        let token = Token {
            kind,
            text: &rest[..len],
            offset: self.position,
        };
        self.position += len;
        Some(token)
    }
}

/// Opening tag split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenTag<'a> {
    name: &'a str,
    classes: &'a str,
    annotation: &'a str,
}

impl<'a> OpenTag<'a> {
    /// Split `name[.classes][annotation][\]`; `None` when the shape is wrong
    fn parse(body: &'a str) -> Option<Self> {
        let name_end = body
            .find(|ch: char| {
                matches!(ch, '.' | '/' | '>' | '\\') || ch.is_whitespace() || ch.is_ascii_digit()
            })
            .unwrap_or(body.len());
        if name_end == 0 {
            return None;
        }
        let name = &body[..name_end];
        let mut rest = &body[name_end..];

        let mut classes = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let end = after_dot
                .find(|ch: char| ch == '\\' || ch == '>' || ch.is_whitespace())
                .unwrap_or(after_dot.len());
            classes = &after_dot[..end];
            rest = &after_dot[end..];
        }

        let (annotation, trailing) = rest.split_once('\\').unwrap_or((rest, ""));
        if !trailing.is_empty() {
            return None;
        }

        Some(Self {
            name,
            classes,
            annotation,
        })
    }

    fn class_list(&self) -> Vec<String> {
        self.classes
            .split('.')
            .filter(|class| !class.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// An element currently accepting children
#[derive(Debug, Clone, Copy)]
struct OpenElement {
    id: NodeId,
    kind: ElementKind,
}

/// Arena builder with an explicit open-element stack
struct TreeBuilder {
    tree: CueTree,
    open: Vec<OpenElement>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            tree: CueTree::new(),
            open: Vec::new(),
        }
    }

    fn current(&self) -> NodeId {
        self.open
            .last()
            .map_or_else(|| self.tree.root(), |element| element.id)
    }

    fn current_kind(&self) -> Option<ElementKind> {
        self.open.last().map(|element| element.kind)
    }

    fn push_text(&mut self, text: &str) -> ParseOutcome {
        let decoded = decode_entities(text).into_owned();
        self.tree.append(self.current(), NodeKind::Text(decoded));
        ParseOutcome::Applied
    }

    fn push_tag(&mut self, token: &str) -> ParseOutcome {
        let body = token.strip_prefix('<').unwrap_or(token);
        let body = body.strip_suffix('>').unwrap_or(body);

        if let Some(name) = body.strip_prefix('/') {
            return self.close(name.trim_end());
        }

        if body.starts_with(|ch: char| ch.is_ascii_digit()) {
            let kind = parse_timestamp(body)
                .map_or_else(|| NodeKind::Text(token.to_owned()), NodeKind::Timestamp);
            self.tree.append(self.current(), kind);
            return ParseOutcome::Applied;
        }

        let Some(tag) = OpenTag::parse(body) else {
            return ParseOutcome::Skipped(SkipReason::MalformedTag);
        };
        let Some(kind) = ElementKind::from_tag(tag.name) else {
            return ParseOutcome::Skipped(SkipReason::UnknownTag(tag.name.to_owned()));
        };
        if let Some(required) = kind.required_parent() {
            if self.current_kind() != Some(required) {
                return ParseOutcome::Skipped(SkipReason::MissingParent {
                    tag: kind.tag_name(),
                    required: required.tag_name(),
                });
            }
        }

        let annotation = Some(tag.annotation.trim())
            .filter(|text| kind.keeps_annotation() && !text.is_empty())
            .map(str::to_owned);
        let element = Element {
            kind,
            classes: tag.class_list(),
            annotation,
        };
        let id = self.tree.append(self.current(), NodeKind::Element(element));
        self.open.push(OpenElement { id, kind });
        ParseOutcome::Applied
    }

    fn close(&mut self, name: &str) -> ParseOutcome {
        match self.open.last() {
            Some(top) if top.kind.tag_name() == name => {
                self.open.pop();
                ParseOutcome::Applied
            }
            _ => ParseOutcome::Skipped(SkipReason::MismatchedClose(name.to_owned())),
        }
    }

    fn finish(self) -> CueTree {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Text of each child of `id`, `None` for non-text nodes
    fn child_texts(tree: &CueTree, id: NodeId) -> Vec<Option<String>> {
        tree.children(id)
            .iter()
            .map(|&child| tree.node(child).as_text().map(str::to_owned))
            .collect()
    }

    fn element(tree: &CueTree, id: NodeId) -> &Element {
        tree.node(id).as_element().expect("expected element node")
    }

    fn reasons(raw: &str) -> Vec<SkipReason> {
        parse_with_diagnostics(raw)
            .1
            .into_iter()
            .map(|diagnostic| diagnostic.reason)
            .collect()
    }

    #[test]
    fn tokenizer_splits_text_and_tags() {
        let tokens: Vec<_> = Tokens::new("a<b>c</b><i")
            .map(|token| (token.kind, token.text, token.offset))
            .collect();
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Text, "a", 0),
                (TokenKind::Tag, "<b>", 1),
                (TokenKind::Text, "c", 4),
                (TokenKind::Tag, "</b>", 5),
                (TokenKind::Tag, "<i", 9),
            ]
        );
    }

    #[test]
    fn nested_elements() {
        let tree = parse("<b>bold <i>both</i></b> plain");
        let root = tree.root();
        let children = tree.children(root);
        assert_eq!(children.len(), 2);

        let bold = children[0];
        assert_eq!(element(&tree, bold).kind, ElementKind::Bold);
        let italic = tree.children(bold)[1];
        assert_eq!(element(&tree, italic).kind, ElementKind::Italic);
        assert_eq!(child_texts(&tree, italic), vec![Some("both".to_string())]);
        assert_eq!(tree.text_content(), "bold both plain");
    }

    #[test]
    fn escaped_reference_decodes_once() {
        let tree = parse("&amp;lt;");
        assert_eq!(
            child_texts(&tree, tree.root()),
            vec![Some("&lt;".to_string())]
        );
    }

    #[test]
    fn ruby_annotation_requires_ruby_parent() {
        let tree = parse("<rt>x</rt>");
        assert_eq!(child_texts(&tree, tree.root()), vec![Some("x".to_string())]);
        assert_eq!(
            reasons("<rt>x</rt>"),
            vec![
                SkipReason::MissingParent {
                    tag: "rt",
                    required: "ruby"
                },
                SkipReason::MismatchedClose("rt".to_string()),
            ]
        );

        let tree = parse("<ruby><rt>x</rt></ruby>");
        let ruby = tree.children(tree.root())[0];
        assert_eq!(element(&tree, ruby).kind, ElementKind::Ruby);
        let rt = tree.children(ruby)[0];
        assert_eq!(element(&tree, rt).kind, ElementKind::RubyText);
        assert_eq!(tree.parent(rt), Some(ruby));
        assert!(reasons("<ruby><rt>x</rt></ruby>").is_empty());
    }

    #[test]
    fn ruby_annotation_must_be_immediate_child() {
        let tree = parse("<ruby><b><rt>x</rt></b></ruby>");
        let ruby = tree.children(tree.root())[0];
        let bold = tree.children(ruby)[0];
        assert_eq!(child_texts(&tree, bold), vec![Some("x".to_string())]);
    }

    #[test]
    fn mismatched_close_is_ignored() {
        let tree = parse("<b>x</i>y</b>z");
        let bold = tree.children(tree.root())[0];
        assert_eq!(
            child_texts(&tree, bold),
            vec![Some("x".to_string()), Some("y".to_string())]
        );
        assert_eq!(reasons("<b>x</i>y</b>z"), vec![SkipReason::MismatchedClose("i".to_string())]);

        let tree = parse("<b><i>x</b>y");
        let italic = tree.children(tree.children(tree.root())[0])[0];
        assert_eq!(
            child_texts(&tree, italic),
            vec![Some("x".to_string()), Some("y".to_string())]
        );
    }

    #[test]
    fn unknown_tag_content_is_flattened() {
        let tree = parse("a<font>b</font>c");
        assert_eq!(
            child_texts(&tree, tree.root()),
            vec![
                Some("a".to_string()),
                Some("b".to_string()),
                Some("c".to_string())
            ]
        );
        assert_eq!(
            reasons("a<font>b</font>c"),
            vec![
                SkipReason::UnknownTag("font".to_string()),
                SkipReason::MismatchedClose("font".to_string()),
            ]
        );
    }

    #[test]
    fn timestamps_are_markers() {
        let tree = parse("a<00:00:01.250>b");
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 3);
        assert_eq!(tree.node(children[1]).kind(), &NodeKind::Timestamp(1.25));
        assert!(tree.children(children[1]).is_empty());
        assert_eq!(tree.parent(children[2]), Some(tree.root()));
    }

    #[test]
    fn malformed_timestamp_stays_text() {
        let tree = parse("I <3 you");
        assert_eq!(tree.text_content(), "I <3 you");

        let tree = parse("<1:2.3>");
        assert_eq!(child_texts(&tree, tree.root()), vec![Some("<1:2.3>".to_string())]);
    }

    #[test]
    fn class_lists() {
        let tree = parse("<c.yellow.bg_blue>x</c>");
        let span = element(&tree, tree.children(tree.root())[0]);
        assert_eq!(span.kind, ElementKind::Class);
        assert_eq!(span.classes, vec!["yellow".to_string(), "bg_blue".to_string()]);
        assert_eq!(span.class_name(), "yellow bg_blue");
        assert_eq!(span.annotation, None);
    }

    #[test]
    fn voice_and_language_annotations() {
        let tree = parse("<v   Bob Smith >hi</v><lang en-US>there</lang>");
        let children = tree.children(tree.root());
        let voice = element(&tree, children[0]);
        assert_eq!(voice.kind, ElementKind::Voice);
        assert_eq!(voice.annotation.as_deref(), Some("Bob Smith"));
        let lang = element(&tree, children[1]);
        assert_eq!(lang.kind, ElementKind::Language);
        assert_eq!(lang.annotation.as_deref(), Some("en-US"));

        let tree = parse("<b loud>x</b>");
        assert_eq!(element(&tree, tree.children(tree.root())[0]).annotation, None);
    }

    #[test]
    fn unterminated_tags() {
        let tree = parse("<b>bold");
        let bold = tree.children(tree.root())[0];
        assert_eq!(child_texts(&tree, bold), vec![Some("bold".to_string())]);

        let tree = parse("text<i");
        let children = tree.children(tree.root());
        assert_eq!(children.len(), 2);
        assert_eq!(element(&tree, children[1]).kind, ElementKind::Italic);
    }

    #[test]
    fn malformed_tags_are_skipped() {
        assert_eq!(reasons("<>"), vec![SkipReason::MalformedTag]);
        assert_eq!(reasons("<b\\x>y"), vec![SkipReason::MalformedTag]);
        assert_eq!(reasons("< b>"), vec![SkipReason::MalformedTag]);
        assert_eq!(parse("<>x").text_content(), "x");
    }

    #[test]
    fn backslash_ends_the_tag_name() {
        let tree = parse("<i\\>slanted</i>");
        let italic = tree.children(tree.root())[0];
        assert_eq!(element(&tree, italic).kind, ElementKind::Italic);
        assert_eq!(child_texts(&tree, italic), vec![Some("slanted".to_string())]);
        assert!(reasons("<i\\>x</i>").is_empty());
    }

    #[test]
    fn open_tag_shapes() {
        assert_eq!(
            OpenTag::parse("c.a.b note"),
            Some(OpenTag {
                name: "c",
                classes: "a.b",
                annotation: " note"
            })
        );
        assert_eq!(
            OpenTag::parse("i\\"),
            Some(OpenTag {
                name: "i",
                classes: "",
                annotation: ""
            })
        );
        assert_eq!(OpenTag::parse(".a"), None);
    }

    #[test]
    fn diagnostics_carry_offsets() {
        let (_, diagnostics) = parse_with_diagnostics("ok <x>");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].offset, 3);
        assert_eq!(diagnostics[0].token, "<x>");
        assert_eq!(
            diagnostics[0].to_string(),
            "<x> at byte 3: unknown tag 'x'"
        );
    }
}
