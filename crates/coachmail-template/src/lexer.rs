//! Template lexer (tokenizer).
//!
//! Converts raw template source into a flat stream of [`Token`]s: literal text
//! and `{{ ... }}` tags. Tags are classified here (block openers, closers,
//! variables, unknown) so the parser only has to pair them up.
//!
//! Tokenizing never fails. A `{{` with no closing `}}` is literal text. Keys
//! are any text without braces; a tag that is not a key or a known block form
//! becomes [`Tag::Unknown`], which renders as nothing.

/// A classified `{{ ... }}` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// `{{#if key}}`
    If(String),
    /// `{{#each key}}`
    Each(String),
    /// `{{^key}}`
    Inverted(String),
    /// `{{/if}}`
    EndIf,
    /// `{{/each}}`
    EndEach,
    /// `{{/key}}`, closing an inverted or bare block with the same key.
    End(String),
    /// `{{key}}` or `{{key.field}}`. Also opens a bare block when a matching
    /// `{{/key}}` follows.
    Variable(String),
    /// Anything else between `{{` and `}}`, kept only for diagnostics.
    Unknown(String),
}

/// The closer a block waits for: `{{/if}}`, `{{/each}}` or `{{/key}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKey<'a> {
    If,
    Each,
    Named(&'a str),
}

impl Tag {
    /// The closer this tag would need to open a block, if it can open one.
    pub fn opens(&self) -> Option<BlockKey<'_>> {
        match self {
            Self::If(_) => Some(BlockKey::If),
            Self::Each(_) => Some(BlockKey::Each),
            Self::Inverted(key) | Self::Variable(key) => Some(BlockKey::Named(key)),
            _ => None,
        }
    }

    /// The block this tag ends, if it is a closer.
    pub fn closes(&self) -> Option<BlockKey<'_>> {
        match self {
            Self::EndIf => Some(BlockKey::If),
            Self::EndEach => Some(BlockKey::Each),
            Self::End(key) => Some(BlockKey::Named(key)),
            _ => None,
        }
    }
}

/// A token produced by the template lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A literal text segment.
    Text(String),
    /// A `{{ ... }}` tag.
    Tag(Tag),
}

/// Tokenizes a template source string into a sequence of [`Token`]s.
///
/// Whitespace just inside the braces is ignored, so `{{ name }}` and
/// `{{name}}` are the same tag.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut remaining = source;

    while !remaining.is_empty() {
        let Some(open) = remaining.find("{{") else {
            push_text(&mut tokens, remaining);
            break;
        };

        let after_open = &remaining[open + 2..];
        let Some(close) = after_open.find("}}") else {
            // Unclosed: the rest is plain text
            push_text(&mut tokens, remaining);
            break;
        };

        push_text(&mut tokens, &remaining[..open]);
        tokens.push(Token::Tag(classify(after_open[..close].trim())));
        remaining = &after_open[close + 2..];
    }

    tokens
}

/// Appends text, merging with a preceding text token.
fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Text(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(Token::Text(text.to_string()));
    }
}

/// Classifies the trimmed contents of a tag.
fn classify(content: &str) -> Tag {
    if let Some(rest) = keyword_arg(content, "#if") {
        return key_of(rest).map_or_else(|| unknown(content), |k| Tag::If(k.to_string()));
    }
    if let Some(rest) = keyword_arg(content, "#each") {
        return key_of(rest).map_or_else(|| unknown(content), |k| Tag::Each(k.to_string()));
    }
    if let Some(rest) = content.strip_prefix('^') {
        return key_of(rest.trim()).map_or_else(|| unknown(content), |k| Tag::Inverted(k.to_string()));
    }
    if let Some(rest) = content.strip_prefix('/') {
        return match rest.trim() {
            "if" => Tag::EndIf,
            "each" => Tag::EndEach,
            key => key_of(key).map_or_else(|| unknown(content), |k| Tag::End(k.to_string())),
        };
    }
    if content.starts_with('#') {
        return unknown(content);
    }
    key_of(content).map_or_else(|| unknown(content), |k| Tag::Variable(k.to_string()))
}

/// Returns the argument of `{{#keyword arg}}`, requiring whitespace after the keyword.
fn keyword_arg<'a>(content: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = content.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Any non-empty key without braces. `first-name` and `student name` are
/// keys too; dots are split later, at lookup.
fn key_of(s: &str) -> Option<&str> {
    if s.is_empty() || s.contains(['{', '}']) {
        None
    } else {
        Some(s)
    }
}

fn unknown(content: &str) -> Tag {
    Tag::Unknown(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    fn var(s: &str) -> Token {
        Token::Tag(Tag::Variable(s.to_string()))
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(tokenize("Hello world"), vec![text("Hello world")]);
    }

    #[test]
    fn test_empty_template() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_variable_tag() {
        assert_eq!(tokenize("{{name}}"), vec![var("name")]);
        assert_eq!(tokenize("{{   name   }}"), vec![var("name")]);
    }

    #[test]
    fn test_dotted_variable() {
        assert_eq!(tokenize("{{user.name}}"), vec![var("user.name")]);
    }

    #[test]
    fn test_block_tags() {
        assert_eq!(
            tokenize("{{#if paid}}{{/if}}{{#each items}}{{/each}}{{^due}}{{/due}}"),
            vec![
                Token::Tag(Tag::If("paid".into())),
                Token::Tag(Tag::EndIf),
                Token::Tag(Tag::Each("items".into())),
                Token::Tag(Tag::EndEach),
                Token::Tag(Tag::Inverted("due".into())),
                Token::Tag(Tag::End("due".into())),
            ]
        );
    }

    #[test]
    fn test_if_with_dotted_key() {
        assert_eq!(
            tokenize("{{#if user.active}}"),
            vec![Token::Tag(Tag::If("user.active".into()))]
        );
    }

    #[test]
    fn test_mixed_content() {
        assert_eq!(
            tokenize("Hi {{name}}!{{#if due}} Pay now.{{/if}}"),
            vec![
                text("Hi "),
                var("name"),
                text("!"),
                Token::Tag(Tag::If("due".into())),
                text(" Pay now."),
                Token::Tag(Tag::EndIf),
            ]
        );
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(
            tokenize("{{#unless x}}{{a}b}}{{}}{{#if}}{{#ifx}}"),
            vec![
                Token::Tag(Tag::Unknown("#unless x".into())),
                Token::Tag(Tag::Unknown("a}b".into())),
                Token::Tag(Tag::Unknown(String::new())),
                Token::Tag(Tag::Unknown("#if".into())),
                Token::Tag(Tag::Unknown("#ifx".into())),
            ]
        );
    }

    #[test]
    fn test_unclosed_tag_is_text() {
        assert_eq!(tokenize("Total {{amount"), vec![text("Total {{amount")]);
    }

    #[test]
    fn test_single_braces_are_text() {
        assert_eq!(tokenize("a { b } c"), vec![text("a { b } c")]);
    }

    #[test]
    fn test_adjacent_tags() {
        assert_eq!(tokenize("{{a}}{{b}}"), vec![var("a"), var("b")]);
    }

    #[test]
    fn test_triple_brace_content_is_unknown() {
        // `{{{x}}}` -> tag content `{x` then literal `}`
        assert_eq!(
            tokenize("{{{x}}}"),
            vec![Token::Tag(Tag::Unknown("{x".into())), text("}")]
        );
    }

    #[test]
    fn test_opens_and_closes() {
        assert_eq!(Tag::If("a".into()).opens(), Some(BlockKey::If));
        assert_eq!(Tag::EndIf.closes(), Tag::If("b".into()).opens());
        assert_eq!(Tag::EndEach.closes(), Tag::Each("a".into()).opens());
        assert_eq!(Tag::End("a".into()).closes(), Tag::Inverted("a".into()).opens());
        assert_eq!(Tag::End("a".into()).closes(), Tag::Variable("a".into()).opens());
        assert_ne!(Tag::End("a".into()).closes(), Tag::Variable("b".into()).opens());
        assert_ne!(Tag::End("if".into()).closes(), Tag::If("if".into()).opens());
        assert_eq!(Tag::EndIf.opens(), None);
        assert_eq!(Tag::Variable("a".into()).closes(), None);
        assert_eq!(Tag::Unknown("a".into()).opens(), None);
    }

    #[test]
    fn test_keys_with_punctuation_and_spaces() {
        assert_eq!(
            tokenize("{{first-name}}{{ student name }}{{#if fee-due}}{{/fee-due}}{{^late fee}}"),
            vec![
                var("first-name"),
                var("student name"),
                Token::Tag(Tag::If("fee-due".into())),
                Token::Tag(Tag::End("fee-due".into())),
                Token::Tag(Tag::Inverted("late fee".into())),
            ]
        );
    }
}
