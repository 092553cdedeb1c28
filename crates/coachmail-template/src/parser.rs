//! Template parser.
//!
//! Pairs block openers with their closers in a single linear pass over the
//! token stream, then lays the result out as a flat list of [`Node`]s, one
//! per token. A paired opener records where its closer sits, so the renderer
//! walks blocks of any depth with a loop instead of recursion. Pairing
//! happens before any value is looked at, so nesting of same-kind blocks (an
//! `{{#if}}` inside an `{{#if}}`) is always resolved correctly.
//!
//! Pairing is proper nesting: a closer takes the innermost unclosed opener
//! it can close, and every opener above that one stays unpaired. A bare
//! `{{k}}...{{/k}}` block starts at the earliest `{{k}}` in the run of
//! adjacent unpaired variables that ends at the innermost `{{k}}`.
//!
//! Parsing is total. Openers that are never closed and closers with no
//! opener become [`Node::Discard`]: the tag disappears and whatever followed
//! it is parsed as ordinary siblings.

use std::collections::HashMap;

use crate::lexer::{BlockKey, Tag, Token};

/// The kind of a block section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// `{{#if key}}...{{/if}}`: body kept when `key` is truthy.
    If,
    /// `{{^key}}...{{/key}}`: body kept when `key` is falsy.
    Inverted,
    /// `{{key}}...{{/key}}`: body kept when `key` is truthy.
    Bare,
    /// `{{#each key}}...{{/each}}`: body repeated per element of `key`.
    Each,
}

/// One parsed token. `nodes[i]` always corresponds to `tokens[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text.
    Text(String),
    /// `{{key}}` placeholder.
    Variable(String),
    /// Start of a block whose body runs up to the node at `close`.
    Open {
        kind: SectionKind,
        key: String,
        close: usize,
    },
    /// End of a block opened earlier.
    Close(SectionKind),
    /// An unpaired or unknown tag; renders as nothing.
    Discard,
}

/// Parses a token stream.
pub fn parse(tokens: &[Token]) -> Vec<Node> {
    let partners = pair_blocks(tokens);
    (0..tokens.len())
        .map(|i| node_at(tokens, &partners, i))
        .collect()
}

fn node_at(tokens: &[Token], partners: &[Option<usize>], index: usize) -> Node {
    let tag = match &tokens[index] {
        Token::Text(text) => return Node::Text(text.clone()),
        Token::Tag(tag) => tag,
    };

    match partners[index] {
        Some(close) if close > index => section_of(tag).map_or(Node::Discard, |(kind, key)| Node::Open {
            kind,
            key: key.to_string(),
            close,
        }),
        Some(open) => match &tokens[open] {
            Token::Tag(opener) => section_of(opener).map_or(Node::Discard, |(kind, _)| Node::Close(kind)),
            Token::Text(_) => Node::Discard,
        },
        None => match tag {
            Tag::Variable(key) => Node::Variable(key.clone()),
            _ => Node::Discard,
        },
    }
}

fn section_of(tag: &Tag) -> Option<(SectionKind, &str)> {
    match tag {
        Tag::If(key) => Some((SectionKind::If, key)),
        Tag::Each(key) => Some((SectionKind::Each, key)),
        Tag::Inverted(key) => Some((SectionKind::Inverted, key)),
        Tag::Variable(key) => Some((SectionKind::Bare, key)),
        _ => None,
    }
}

/// Returns, for each token, the index of the token it pairs with.
fn pair_blocks(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut partners = vec![None; tokens.len()];
    let mut open = OpenBlocks::default();

    for (i, token) in tokens.iter().enumerate() {
        let Token::Tag(tag) = token else { continue };

        if let Some(key) = tag.opens() {
            open.push(i, key, matches!(tag, Tag::Variable(_)));
        } else if let Some(opener) = tag.closes().and_then(|key| open.close(key)) {
            partners[opener] = Some(i);
            partners[i] = Some(opener);
        }
    }

    partners
}

struct Opener<'t> {
    token: usize,
    key: BlockKey<'t>,
    bare: bool,
    /// Stack position where the run of adjacent bare variables holding this
    /// opener begins.
    run_start: usize,
}

/// The unclosed openers, innermost last, indexed by the closer they accept
/// so no closer has to scan the stack.
#[derive(Default)]
struct OpenBlocks<'t> {
    stack: Vec<Opener<'t>>,
    /// Stack positions by accepted closer, ascending.
    by_key: HashMap<BlockKey<'t>, Vec<usize>>,
    /// Stack positions of bare variables by key, ascending.
    bare: HashMap<&'t str, Vec<usize>>,
}

impl<'t> OpenBlocks<'t> {
    fn push(&mut self, token: usize, key: BlockKey<'t>, bare: bool) {
        let pos = self.stack.len();
        let run_start = match self.stack.last() {
            Some(prev) if bare && prev.bare => prev.run_start,
            _ => pos,
        };
        self.stack.push(Opener {
            token,
            key,
            bare,
            run_start,
        });
        self.by_key.entry(key).or_default().push(pos);
        if let (true, BlockKey::Named(name)) = (bare, key) {
            self.bare.entry(name).or_default().push(pos);
        }
    }

    /// Pops the opener `key` closes, and everything above it. Returns the
    /// opener's token index.
    fn close(&mut self, key: BlockKey<'t>) -> Option<usize> {
        let nearest = *self.by_key.get(&key)?.last()?;
        let opener = &self.stack[nearest];

        let pos = match key {
            BlockKey::Named(name) if opener.bare => {
                let run_start = opener.run_start;
                let positions = self.bare.get(name).map_or(&[][..], Vec::as_slice);
                positions
                    .get(positions.partition_point(|&p| p < run_start))
                    .copied()
                    .unwrap_or(nearest)
            }
            _ => nearest,
        };

        let token = self.stack[pos].token;
        self.truncate(pos);
        Some(token)
    }

    fn truncate(&mut self, len: usize) {
        for opener in self.stack.drain(len..).rev() {
            if let Some(positions) = self.by_key.get_mut(&opener.key) {
                positions.pop();
            }
            if let (true, BlockKey::Named(name)) = (opener.bare, opener.key) {
                if let Some(positions) = self.bare.get_mut(name) {
                    positions.pop();
                }
            }
        }
    }
}
