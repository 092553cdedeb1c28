//! Template expansion.
//!
//! [`render`] is the core pipeline: tokenize, pair blocks, expand the flat
//! node list against a data context, then sweep away any `{{...}}` that survived.
//! It is a pure function of its inputs and never fails.
//!
//! Block keys (`#if`, `^`, bare and `#each`) always resolve against the root
//! context. Inside an `{{#each}}` body a plain `{{field}}` binds to the current
//! element's field only, and renders empty when the element lacks it; dotted
//! `{{obj.field}}` placeholders keep resolving against the root.

use std::sync::OnceLock;

use regex::Regex;

use crate::context::{Data, Value};
use crate::lexer;
use crate::parser::{self, Node, SectionKind};

/// Renders `template` against `data`.
///
/// No default context is merged here; see
/// [`Engine::render_str`](crate::engine::Engine::render_str) for that.
///
/// # Examples
///
/// ```
/// use coachmail_template::context::Data;
/// use coachmail_template::render::render;
///
/// let data = Data::new().with("name", "Ravi").with("overdue", true);
/// let out = render("Hi {{name}}{{#if overdue}}, pay now{{/if}}.", &data);
/// assert_eq!(out, "Hi Ravi, pay now.");
/// ```
pub fn render(template: &str, data: &Data) -> String {
    if template.is_empty() {
        return String::new();
    }

    let nodes = parser::parse(&lexer::tokenize(template));
    let mut output = String::with_capacity(template.len());
    expand(&nodes, data, &mut output);
    sweep(&output)
}

/// Where placeholders resolve during expansion.
struct Scope<'a> {
    root: &'a Data,
    /// The current `{{#each}}` element, if inside a loop body.
    item: Option<&'a Value>,
}

impl<'a> Scope<'a> {
    fn variable(&self, path: &str) -> Option<&'a Value> {
        match self.item {
            Some(item) if !path.contains('.') => item.as_map()?.get(path),
            _ => self.root.lookup(path),
        }
    }

    fn is_truthy(&self, key: &str) -> bool {
        self.root.lookup(key).is_some_and(Value::is_truthy)
    }
}

/// An `{{#each}}` block being expanded.
struct Pass<'a> {
    /// Index of the first body node.
    body: usize,
    items: &'a [Value],
    /// Index into `items` of the element bound by the next pass.
    next: usize,
    /// The element bound before the block was entered.
    outer: Option<&'a Value>,
}

/// Expands `nodes` in one forward walk. Skipped blocks jump to their closer;
/// an each closer jumps back to the body while elements remain.
fn expand(nodes: &[Node], root: &Data, output: &mut String) {
    let mut scope = Scope { root, item: None };
    let mut passes: Vec<Pass<'_>> = Vec::new();
    let mut i = 0;

    while i < nodes.len() {
        match &nodes[i] {
            Node::Text(text) => output.push_str(text),
            Node::Variable(path) => {
                if let Some(value) = scope.variable(path) {
                    output.push_str(&value.to_display_string());
                }
            }
            Node::Open { kind, key, close } => {
                let enter = match kind {
                    SectionKind::If | SectionKind::Bare => scope.is_truthy(key),
                    SectionKind::Inverted => !scope.is_truthy(key),
                    SectionKind::Each => {
                        let items = root.lookup(key).and_then(Value::as_list).unwrap_or_default();
                        if let Some(first) = items.first() {
                            passes.push(Pass {
                                body: i + 1,
                                items,
                                next: 1,
                                outer: scope.item,
                            });
                            scope.item = Some(first);
                            true
                        } else {
                            false
                        }
                    }
                };
                if !enter {
                    i = *close;
                }
            }
            Node::Close(SectionKind::Each) => {
                if let Some(pass) = passes.last_mut() {
                    if let Some(item) = pass.items.get(pass.next) {
                        pass.next += 1;
                        scope.item = Some(item);
                        i = pass.body;
                        continue;
                    }
                    scope.item = pass.outer;
                    passes.pop();
                }
            }
            Node::Close(_) | Node::Discard => {}
        }
        i += 1;
    }
}

/// Deletes every remaining `{{...}}` span.
///
/// Repeats until nothing matches, since removing a span can bring a stray
/// `{` next to another.
fn sweep(output: &str) -> String {
    static LEFTOVER_RE: OnceLock<Regex> = OnceLock::new();
    let leftover_re = LEFTOVER_RE.get_or_init(|| Regex::new(r"(?s)\{\{.*?\}\}").unwrap());

    let mut current = output.to_string();
    while leftover_re.is_match(&current) {
        current = leftover_re.replace_all(&current, "").into_owned();
    }
    current
}
