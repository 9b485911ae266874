//! Template parser: turns template text into a node tree.
//!
//! # Syntax
//! - `{{{key}}}`: scalar placeholder (`{{{this}}}` is the current iteration element)
//! - `{{#if key}}…{{/if}}`: conditional block
//! - `{{#each key}}…{{/each}}`: iteration block
//!
//! A close marker is matched by counting nested opens of the same block type only.
//! An open marker with no matching close disables that block type for the rest of
//! the text being parsed: the marker is kept as literal text and the other
//! directive types keep resolving.

use tracing::debug;

pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Reserved placeholder bound to the current element of a scalar iteration.
pub const CURRENT_ITEM: &str = "this";

const PLACEHOLDER_OPEN: &str = "{{{";
const PLACEHOLDER_CLOSE: &str = "}}}";
const TAG_END: &str = "}}";

/// A node in the parsed template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, emitted as-is.
    Text(String),
    /// `{{{key}}}`
    Placeholder(String),
    /// `{{#if key}}…{{/if}}`
    Conditional { key: String, body: Vec<Node> },
    /// `{{#each key}}…{{/each}}`
    Iteration {
        key: String,
        body: Vec<Node>,
        /// The trimmed body is exactly `{{{this}}}`; scalar elements get comma-joined.
        bare_item: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Each,
    If,
}

impl BlockKind {
    fn open(self) -> &'static str {
        match self {
            BlockKind::Each => "{{#each ",
            BlockKind::If => "{{#if ",
        }
    }

    fn close(self) -> &'static str {
        match self {
            BlockKind::Each => "{{/each}}",
            BlockKind::If => "{{/if}}",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    Placeholder,
    Block(BlockKind),
}

/// Which block types are still being resolved in the current text.
#[derive(Debug, Clone, Copy)]
struct Enabled {
    each: bool,
    cond: bool,
}

impl Enabled {
    fn allows(self, kind: BlockKind) -> bool {
        match kind {
            BlockKind::Each => self.each,
            BlockKind::If => self.cond,
        }
    }

    fn disable(&mut self, kind: BlockKind) {
        match kind {
            BlockKind::Each => self.each = false,
            BlockKind::If => self.cond = false,
        }
    }
}

/// A block split out of the source: its key, raw body, and the text after its close marker.
struct BlockSpan<'a> {
    key: &'a str,
    body: &'a str,
    after: &'a str,
}

/// A parsed, reusable template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses `source` with the default nesting bound.
    pub fn parse(source: &str) -> Self {
        Self::parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
    }

    /// Parses `source`; block bodies nested deeper than `max_depth` are kept as raw text.
    pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Self {
        Template {
            nodes: parse_nodes(source, 0, max_depth),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

fn parse_nodes(source: &str, depth: usize, max_depth: usize) -> Vec<Node> {
    if depth > max_depth {
        debug!("Template nesting exceeds depth {max_depth}; leaving body unprocessed");
        return text_node(source).into_iter().collect();
    }

    let mut nodes = Vec::new();
    let mut text = String::new();
    let mut enabled = Enabled {
        each: true,
        cond: true,
    };
    let mut rest = source;

    while let Some((pos, marker)) = next_marker(rest, enabled) {
        text.push_str(&rest[..pos]);
        let at = &rest[pos..];

        match marker {
            Marker::Placeholder => {
                let inner = &at[PLACEHOLDER_OPEN.len()..];
                match inner.find(PLACEHOLDER_CLOSE) {
                    Some(end) if !inner[..end].contains(PLACEHOLDER_OPEN) => {
                        flush_text(&mut text, &mut nodes);
                        nodes.push(Node::Placeholder(inner[..end].trim().to_string()));
                        rest = &inner[end + PLACEHOLDER_CLOSE.len()..];
                    }
                    _ => {
                        text.push_str(PLACEHOLDER_OPEN);
                        rest = inner;
                    }
                }
            }
            Marker::Block(kind) => match split_block(at, kind) {
                Some(span) => {
                    flush_text(&mut text, &mut nodes);
                    let body = parse_nodes(span.body, depth + 1, max_depth);
                    let key = span.key.trim().to_string();
                    nodes.push(match kind {
                        BlockKind::Each => Node::Iteration {
                            key,
                            body,
                            bare_item: is_bare_item(span.body),
                        },
                        BlockKind::If => Node::Conditional { key, body },
                    });
                    rest = span.after;
                }
                None => {
                    debug!(
                        "Unmatched '{}' marker; no further {:?} blocks resolved in this text",
                        kind.open().trim_end(),
                        kind
                    );
                    enabled.disable(kind);
                    text.push_str(kind.open());
                    rest = &at[kind.open().len()..];
                }
            },
        }
    }

    text.push_str(rest);
    flush_text(&mut text, &mut nodes);
    nodes
}

/// Finds the leftmost directive marker still enabled in `text`.
fn next_marker(text: &str, enabled: Enabled) -> Option<(usize, Marker)> {
    let mut candidates = vec![(text.find(PLACEHOLDER_OPEN), Marker::Placeholder)];
    for kind in [BlockKind::Each, BlockKind::If] {
        if enabled.allows(kind) {
            candidates.push((text.find(kind.open()), Marker::Block(kind)));
        }
    }

    candidates
        .into_iter()
        .filter_map(|(pos, marker)| pos.map(|p| (p, marker)))
        .min_by_key(|(pos, _)| *pos)
}

/// Splits a block starting at `text[0]` into key, body and trailing text.
fn split_block(text: &str, kind: BlockKind) -> Option<BlockSpan<'_>> {
    let after_open = &text[kind.open().len()..];
    let tag_end = after_open.find(TAG_END)?;
    let key = &after_open[..tag_end];
    let content = &after_open[tag_end + TAG_END.len()..];
    let close = find_block_close(content, kind.open(), kind.close())?;

    Some(BlockSpan {
        key,
        body: &content[..close],
        after: &content[close + kind.close().len()..],
    })
}

/// Finds the close marker balancing an already-consumed open marker.
///
/// Only opens of the same block type count towards nesting depth.
fn find_block_close(text: &str, open: &str, close: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut index = 0;
    let mut next_close = text.find(close)?;

    loop {
        // Markers never overlap: an open before `next_close` lies wholly inside this slice.
        match text[index..next_close].find(open) {
            Some(p) => {
                depth += 1;
                index += p + open.len();
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                index = next_close + close.len();
                next_close = index + text[index..].find(close)?;
            }
        }
    }
}

fn is_bare_item(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed
        .strip_prefix(PLACEHOLDER_OPEN)
        .and_then(|s| s.strip_suffix(PLACEHOLDER_CLOSE))
        .is_some_and(|key| key.trim() == CURRENT_ITEM)
}

fn text_node(text: &str) -> Option<Node> {
    (!text.is_empty()).then(|| Node::Text(text.to_string()))
}

fn flush_text(text: &mut String, nodes: &mut Vec<Node>) {
    if !text.is_empty() {
        nodes.push(Node::Text(std::mem::take(text)));
    }
}
