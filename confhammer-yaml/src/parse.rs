//! Building a [`Node`] tree from YAML text
//!
//! The event stream of `yaml-rust2` carries a source marker per event, which
//! is all that is needed to attach lines and columns to every node. Anchored
//! nodes are remembered by their parser-assigned anchor number so that later
//! aliases can carry a copy of the target with the target's identity.
//! Every alias copy counts towards an expansion budget, so a small document
//! cannot unfold into an exponentially large tree.

use std::collections::HashMap;

use tracing::{debug, trace};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::error::{Result, YamlError};
use crate::node::{Node, NodeContent, NodeId, ScalarStyle};

/// Parse the first document of `src` into a positional node tree.
///
/// An empty input yields a null scalar.
pub fn parse(src: &str) -> Result<Node> {
    let mut builder = TreeBuilder::new(src);
    let mut parser = Parser::new_from_str(src);
    parser.load(&mut builder, false)?;
    builder.finish()
}

/// Below these counts aliasing is never considered excessive.
const MIN_DECODED_FOR_ALIAS_CHECK: usize = 1000;
const MIN_ALIASED_FOR_ALIAS_CHECK: usize = 100;

/// Decoded node counts between which the allowed alias ratio falls from
/// 0.99 to 0.10.
const ALIAS_RATIO_RANGE_LOW: usize = 400_000;
const ALIAS_RATIO_RANGE_HIGH: usize = 4_000_000;

fn allowed_alias_ratio(decoded: usize) -> f64 {
    if decoded <= ALIAS_RATIO_RANGE_LOW {
        return 0.99;
    }
    if decoded >= ALIAS_RATIO_RANGE_HIGH {
        return 0.10;
    }
    let span = (ALIAS_RATIO_RANGE_HIGH - ALIAS_RATIO_RANGE_LOW) as f64;
    0.99 - 0.89 * ((decoded - ALIAS_RATIO_RANGE_LOW) as f64 / span)
}

/// An open collection waiting for its end event.
struct Frame {
    line: usize,
    column: usize,
    anchor: Option<usize>,
    mapping: bool,
    items: Vec<Node>,
    /// Nodes in this collection once aliases are expanded, itself included
    size: usize,
}

impl Frame {
    fn close(self) -> (Node, usize) {
        let content = if self.mapping {
            let mut pairs = Vec::with_capacity(self.items.len() / 2);
            let mut items = self.items.into_iter();
            while let (Some(key), Some(value)) = (items.next(), items.next()) {
                pairs.push((key, value));
            }
            NodeContent::Mapping(pairs)
        } else {
            NodeContent::Sequence(self.items)
        };
        let node = Node {
            id: NodeId::fresh(),
            line: self.line,
            column: self.column,
            anchor: self.anchor,
            content,
        };
        (node, self.size)
    }
}

struct TreeBuilder<'a> {
    src: &'a str,
    stack: Vec<Frame>,
    /// Anchored nodes with their expanded sizes
    anchors: HashMap<usize, (Node, usize)>,
    root: Option<Node>,
    error: Option<YamlError>,
    decoded: usize,
    aliased: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
            decoded: 0,
            aliased: 0,
        }
    }

    fn open(&mut self, mark: Marker, anchor: usize, mapping: bool) {
        self.decoded += 1;
        self.stack.push(Frame {
            line: mark.line(),
            column: mark.col(),
            anchor: anchor_id(anchor),
            mapping,
            items: Vec::new(),
            size: 1,
        });
    }

    fn complete(&mut self, node: Node, size: usize) {
        if let Some(anchor) = node.anchor {
            self.anchors.insert(anchor, (node.clone(), size));
        }
        match self.stack.last_mut() {
            Some(frame) => {
                frame.size += size;
                frame.items.push(node);
            }
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
        }
    }

    /// Where an empty plain scalar really sits. The parser marks such a
    /// scalar at the token that follows it, which may be lines further on,
    /// so a mapping value takes its key's position and a sequence item takes
    /// its `-` indicator's.
    fn empty_scalar_position(&self, mark: Marker) -> (usize, usize) {
        let fallback = (mark.line(), mark.col());
        let Some(frame) = self.stack.last() else {
            return fallback;
        };
        if frame.mapping {
            return match frame.items.last() {
                Some(key) if frame.items.len() % 2 == 1 => (key.line, key.column),
                _ => fallback,
            };
        }
        entry_indicator_before(self.src, mark).unwrap_or(fallback)
    }

    /// Account for an alias of a `size` node target, failing once aliases
    /// make up too much of the document.
    fn expand_alias(&mut self, size: usize) -> bool {
        self.decoded = self.decoded.saturating_add(size);
        self.aliased = self.aliased.saturating_add(size);
        !(self.decoded > MIN_DECODED_FOR_ALIAS_CHECK
            && self.aliased > MIN_ALIASED_FOR_ALIAS_CHECK
            && self.aliased as f64 / self.decoded as f64 > allowed_alias_ratio(self.decoded))
    }

    fn finish(self) -> Result<Node> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self
            .root
            .unwrap_or_else(|| Node::null().with_position(1, 0)))
    }
}

impl MarkedEventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, event: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        match event {
            Event::Scalar(value, style, anchor, ..) => {
                let (line, column) = if value.is_empty() && style == TScalarStyle::Plain {
                    self.empty_scalar_position(mark)
                } else {
                    (mark.line(), mark.col())
                };
                self.decoded += 1;
                let node = Node {
                    id: NodeId::fresh(),
                    line,
                    column,
                    anchor: anchor_id(anchor),
                    content: NodeContent::Scalar {
                        value,
                        style: scalar_style(style),
                    },
                };
                self.complete(node, 1);
            }
            Event::SequenceStart(anchor, ..) => self.open(mark, anchor, false),
            Event::MappingStart(anchor, ..) => self.open(mark, anchor, true),
            Event::SequenceEnd | Event::MappingEnd => {
                if let Some(frame) = self.stack.pop() {
                    let (node, size) = frame.close();
                    self.complete(node, size);
                }
            }
            Event::Alias(anchor) => {
                let Some(size) = self.anchors.get(&anchor).map(|(_, size)| *size) else {
                    self.error = Some(YamlError::UnknownAlias { line: mark.line() });
                    return;
                };
                if !self.expand_alias(size) {
                    debug!(
                        decoded = self.decoded,
                        aliased = self.aliased,
                        "rejecting document with excessive aliasing"
                    );
                    self.error = Some(YamlError::ExcessiveAliasing { line: mark.line() });
                    return;
                }
                if let Some((target, _)) = self.anchors.get(&anchor) {
                    trace!(anchor, line = mark.line(), "resolved alias");
                    let node = Node {
                        id: NodeId::fresh(),
                        line: mark.line(),
                        column: mark.col(),
                        anchor: None,
                        content: NodeContent::Alias(Box::new(target.clone())),
                    };
                    self.complete(node, size);
                }
            }
            _ => {}
        }
    }
}

/// Find the `-` indicator that opened an empty block sequence item, looking
/// back from `mark` past blank lines and comments.
fn entry_indicator_before(src: &str, mark: Marker) -> Option<(usize, usize)> {
    let before: String = src.chars().take(mark.index()).collect();
    let lines: Vec<&str> = before.split('\n').collect();
    for (offset, text) in lines.iter().enumerate().rev() {
        let content = strip_comment(text).trim_end();
        if content.is_empty() {
            continue;
        }
        if !content.ends_with('-') {
            return None;
        }
        return Some((offset + 1, content.chars().count() - 1));
    }
    None
}

fn strip_comment(line: &str) -> &str {
    let mut prev_blank = true;
    for (i, c) in line.char_indices() {
        if c == '#' && prev_blank {
            return &line[..i];
        }
        prev_blank = c.is_whitespace();
    }
    line
}

/// The parser uses 0 for "no anchor".
fn anchor_id(anchor: usize) -> Option<usize> {
    (anchor > 0).then_some(anchor)
}

fn scalar_style(style: TScalarStyle) -> ScalarStyle {
    match style {
        TScalarStyle::Plain => ScalarStyle::Plain,
        TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        TScalarStyle::Literal => ScalarStyle::Literal,
        _ => ScalarStyle::Folded,
    }
}
