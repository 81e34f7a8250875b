//! HTML to text transforms.
//!
//! `strip_html_tags` is pattern based and does not validate markup. Nested or
//! malformed tags can leak through; use `html_to_plain_text` when structure
//! matters more than line breaks.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static P_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p\s*>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Render `html` as a fragment and return its text content with whitespace
/// runs collapsed to single spaces.
///
/// Text without `<` or `&` is a fixed point: feeding such output back in
/// returns it unchanged. Decoded entities are not re-escaped, so output
/// containing `&lt;`-style text or literal tags is parsed again on a second
/// pass.
pub fn html_to_plain_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();

    collapse_whitespace(&text)
}

/// Remove tags textually, turning `<br>` into a newline and `</p>` into a
/// paragraph break.
pub fn strip_html_tags(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let text = BR_TAG.replace_all(html, "\n");
    let text = P_CLOSE.replace_all(&text, "\n\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");

    text.trim().to_string()
}

/// Plain-text preview of at most `max_chars` characters, suffixed with `...`
/// when cut.
pub fn preview(html: &str, max_chars: usize) -> String {
    let text = html_to_plain_text(html);
    if text.chars().count() <= max_chars {
        return text;
    }

    let mut cut: String = text.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str("...");
    cut
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
