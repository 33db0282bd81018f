//! Text sanitization for extracted article content
//!
//! Article bodies arrive as text nodes joined with spaces. Cleaning removes
//! invisible characters, decodes leftover HTML entities and collapses all
//! whitespace runs (newlines included) to single spaces, leaving one flat
//! line of text for the keyword matcher and text analyzer.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Sanitize extracted text content
///
/// Steps:
/// 1. Remove zero-width and bidi formatting characters
/// 2. Remove control characters
/// 3. Decode HTML entities
/// 4. Collapse whitespace and trim
///
/// # Examples
///
/// ```
/// use trendscope::parser::sanitize::sanitize_text;
///
/// let dirty = "Gucci\u{200B}  gown &amp;\n\n coat";
/// assert_eq!(sanitize_text(dirty), "Gucci gown & coat");
/// ```
pub fn sanitize_text(text: &str) -> String {
    let result = remove_zero_width(text);
    let result = remove_control_chars(&result);
    let result = html_escape::decode_html_entities(&result);
    collapse_whitespace(&result)
}

/// Remove zero-width spaces and similar invisible characters
///
/// Removes U+200B..U+200F, U+2028..U+202F and the byte order mark.
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Remove control characters except whitespace controls
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Check if text contains anything besides whitespace
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}
