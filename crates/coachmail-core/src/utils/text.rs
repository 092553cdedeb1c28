//! String utility functions.
//!
//! Used to derive the plain-text alternative of an HTML mail body and to turn
//! template names into readable subjects.

use regex::Regex;
use std::sync::OnceLock;

/// Removes all HTML tags from a string.
///
/// # Examples
///
/// ```
/// use coachmail_core::utils::text::strip_tags;
///
/// assert_eq!(strip_tags("<p>Fee <b>due</b></p>"), "Fee due");
/// ```
pub fn strip_tags(s: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let tag_re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    tag_re.replace_all(s, "").into_owned()
}

/// Converts an HTML mail body into a readable plain-text alternative.
///
/// Block-level closing tags and `<br>` become line breaks, `<style>` and
/// `<script>` contents are dropped, the common entities are decoded, and runs
/// of blank lines collapse to one.
///
/// # Examples
///
/// ```
/// use coachmail_core::utils::text::html_to_text;
///
/// let text = html_to_text("<h1>Hi Ravi</h1><p>Your fee is due.</p>");
/// assert_eq!(text, "Hi Ravi\nYour fee is due.");
/// ```
pub fn html_to_text(html: &str) -> String {
    static DROP_RE: OnceLock<Regex> = OnceLock::new();
    static BREAK_RE: OnceLock<Regex> = OnceLock::new();
    static BLANK_RE: OnceLock<Regex> = OnceLock::new();

    let drop_re = DROP_RE
        .get_or_init(|| Regex::new(r"(?is)<(style|script|head)[^>]*>.*?</(style|script|head)>").unwrap());
    let break_re = BREAK_RE.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|tr|table|ul|ol)>").unwrap()
    });
    let blank_re = BLANK_RE.get_or_init(|| Regex::new(r"\n{2,}").unwrap());

    let s = drop_re.replace_all(html, "");
    let s = break_re.replace_all(&s, "\n");
    let s = strip_tags(&s);
    let s = decode_entities(&s);

    let lines: Vec<&str> = s.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    blank_re.replace_all(&joined, "\n").trim().to_string()
}

/// Decodes the handful of HTML entities that appear in mail templates.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&middot;", "·")
        .replace("&copy;", "©")
        .replace("&amp;", "&")
}

/// Capitalizes the first character of a string.
///
/// # Examples
///
/// ```
/// use coachmail_core::utils::text::capfirst;
///
/// assert_eq!(capfirst("hello"), "Hello");
/// assert_eq!(capfirst(""), "");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut result = first.to_uppercase().to_string();
        result.push_str(chars.as_str());
        result
    })
}

/// Turns an identifier like `fee_reminder` into `Fee reminder`.
pub fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    capfirst(spaced.trim())
}
