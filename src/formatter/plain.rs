//! Plain-text baseline formatter.
//!
//! Joins body fragments, turns markup into readable text and wraps long
//! lines in `format=flowed` style (RFC 3676): a soft break is a line that
//! ends with a space.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

use super::MailFormatter;
use crate::message::{Body, OutgoingMessage};

/// Content type written by [`PlainTextFormatter`].
pub const CONTENT_TYPE_PLAIN: &str = "text/plain; charset=UTF-8; format=flowed";

/// Default maximum line length.
const LINE_WIDTH: usize = 77;

/// Formats every message as plain text.
#[derive(Debug, Clone)]
pub struct PlainTextFormatter {
    line_width: usize,
}

impl PlainTextFormatter {
    /// Create a formatter wrapping at 77 columns.
    pub fn new() -> Self {
        Self {
            line_width: LINE_WIDTH,
        }
    }

    /// Set the wrap column. Zero disables wrapping.
    pub fn line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    /// Convert a body to wrapped plain text.
    pub fn to_text(&self, body: &Body) -> String {
        let joined = body.parts().collect::<Vec<_>>().join("\n\n");
        let text = markup_to_text(&joined);
        if self.line_width == 0 {
            return text;
        }

        let mut out = String::with_capacity(text.len());
        for (i, line) in text.lines().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            wrap_line(line, self.line_width, &mut out);
        }
        out
    }
}

impl Default for PlainTextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailFormatter for PlainTextFormatter {
    async fn format(&self, mut message: OutgoingMessage) -> OutgoingMessage {
        message.body = Body::Text(self.to_text(&message.body));
        message.set_content_type(CONTENT_TYPE_PLAIN);
        message
    }

    fn formatter_name(&self) -> &'static str {
        "plain"
    }
}

struct Patterns {
    hidden: Regex,
    line_break: Regex,
    block: Regex,
    list_item: Regex,
    tag: Regex,
    blank_lines: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        hidden: Regex::new(
            r"(?is)<style\b.*?</style>|<script\b.*?</script>|<head\b.*?</head>|<mj-head\b.*?</mj-head>",
        )
        .expect("valid hidden-block pattern"),
        line_break: Regex::new(r"(?i)<br\s*/?>").expect("valid line-break pattern"),
        block: Regex::new(
            r"(?i)</?(p|div|h[1-6]|table|tr|ul|ol|blockquote|mj-section|mj-column|mj-text|mj-button)\b[^>]*>",
        )
        .expect("valid block pattern"),
        list_item: Regex::new(r"(?i)<li\b[^>]*>").expect("valid list-item pattern"),
        tag: Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern"),
        blank_lines: Regex::new(r"\n{3,}").expect("valid blank-line pattern"),
    })
}

/// Strip markup, keeping paragraph structure.
fn markup_to_text(markup: &str) -> String {
    let p = patterns();
    let text = p.hidden.replace_all(markup, "");
    let text = p.line_break.replace_all(&text, "\n");
    let text = p.block.replace_all(&text, "\n");
    let text = p.list_item.replace_all(&text, "\n* ");
    let text = p.tag.replace_all(&text, "");
    let text = decode_entities(&text);

    let text = text
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    p.blank_lines
        .replace_all(&text, "\n\n")
        .trim_matches('\n')
        .to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Append `line` to `out`, soft-breaking at spaces past `width` columns.
fn wrap_line(line: &str, width: usize, out: &mut String) {
    let mut column = 0;
    for (i, word) in line.split(' ').enumerate() {
        let len = word.chars().count();
        if i > 0 {
            if column > 0 && column + 1 + len > width {
                out.push_str(" \n");
                column = 0;
            } else {
                out.push(' ');
                column += 1;
            }
        }
        out.push_str(word);
        column += len;
    }
}
