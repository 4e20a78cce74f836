//! Lightweight chat markup.
//!
//! Messages support exactly four substitutions, applied in a fixed order after the
//! raw text has been HTML-escaped:
//!
//! 1. `**bold**` → `<strong>bold</strong>`
//! 2. `*italic*` → `<em>italic</em>`
//! 3. `` `code` `` → `<code>code</code>`
//! 4. newline → `<br>`
//!
//! Matches are non-greedy and never span a line break.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern"));
static CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`(.*?)`").expect("code pattern"));

/// Formats a message body as HTML suitable for `dangerous_inner_html`.
pub fn format_message(text: &str) -> String {
    let escaped = html_escape::encode_text(text);
    let bold = BOLD.replace_all(&escaped, "<strong>${1}</strong>");
    let italic = ITALIC.replace_all(&bold, "<em>${1}</em>");
    let code = CODE.replace_all(&italic, "<code>${1}</code>");
    code.replace('\n', "<br>")
}

/// Strips the markup markers, leaving the text a terminal can print as-is.
pub fn plain_text(text: &str) -> String {
    let bold = BOLD.replace_all(text, "${1}");
    let italic = ITALIC.replace_all(&bold, "${1}");
    CODE.replace_all(&italic, "${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_rules_in_order() {
        assert_eq!(
            format_message("**Hi** there\n*ok*"),
            "<strong>Hi</strong> there<br><em>ok</em>"
        );
    }

    #[test]
    fn plain_text_is_unchanged() {
        let text = "Try the masala dosa today";
        assert_eq!(format_message(text), text);
        assert_eq!(format_message(&format_message(text)), text);
    }

    #[test]
    fn code_spans() {
        assert_eq!(
            format_message("order `Hot Wings` x2"),
            "order <code>Hot Wings</code> x2"
        );
    }

    #[test]
    fn bold_wins_over_italic() {
        assert_eq!(
            format_message("**very** *mildly* spicy"),
            "<strong>very</strong> <em>mildly</em> spicy"
        );
    }

    #[test]
    fn markers_do_not_cross_lines() {
        assert_eq!(format_message("*one\ntwo*"), "*one<br>two*");
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(
            format_message("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn plain_text_strips_markers() {
        assert_eq!(plain_text("**Hi** *there* `chef`"), "Hi there chef");
    }
}
