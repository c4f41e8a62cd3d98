//! Markdown-like formatting for chat messages.
//!
//! The formatter turns raw chat text into plain display text plus a list of
//! styled byte ranges, so the UI layer can render it however it likes.
//! Supported markers:
//!
//! - `**bold**`, `__underline__`, `~~strike~~`, `` `code` `` (applied in that order)
//! - `*italic*` (applied last, skipped when touching another `*`)
//! - emoticons such as `:)` or `<3`, replaced by emoji
//!
//! Deep links of the form `Course/<id>/Topics/<id>` (also `Quizzes` and
//! `Assignments`) are detected in the final text.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref UNDERLINE: Regex = Regex::new(r"__(.*?)__").unwrap();
    static ref STRIKE: Regex = Regex::new(r"~~(.*?)~~").unwrap();
    static ref CODE: Regex = Regex::new(r"`(.*?)`").unwrap();
    static ref DEEP_LINK: Regex =
        Regex::new(r"Course/(\d+)/(Topics|Quizzes|Assignments)/(\d+)").unwrap();
    static ref WORD_EMOTICON: Regex = Regex::new(r"\b(lol|LOL|omg|OMG|XD)\b").unwrap();
}

// Longer emoticons first so ">:(" is not eaten by ":(".
const EMOTICONS: &[(&str, &str)] = &[
    (":'(", "😭"),
    (">:(", "😠"),
    ("</3", "💔"),
    ("^_^", "😊"),
    ("-_-", "😑"),
    (":)", "😊"),
    (":D", "😃"),
    (":(", "😢"),
    (":P", "😛"),
    (";)", "😉"),
    (":o", "😮"),
    (":|", "😐"),
    ("<3", "❤️"),
    (":*", "😘"),
    (":@", "😡"),
];

/// Inline style applied to a range of the formatted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

/// A styled byte range `[start, end)` of [`FormattedMessage::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRange {
    pub style: Style,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    Topic,
    Quiz,
    Assignment,
}

/// A reference to course content embedded in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLink {
    pub kind: LinkKind,
    pub course_id: u32,
    pub item_id: u32,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedMessage {
    pub text: String,
    pub styles: Vec<StyledRange>,
    pub links: Vec<DeepLink>,
}

impl FormattedMessage {
    /// The substring covered by a styled range.
    pub fn slice(&self, range: &StyledRange) -> &str {
        &self.text[range.start..range.end]
    }
}

/// Full formatting: emoticons, inline styles and deep links.
pub fn format_message(message: &str) -> FormattedMessage {
    if message.trim().is_empty() {
        return FormattedMessage::default();
    }

    let mut styles = Vec::new();
    let mut text = replace_emoticons(message);

    for (re, marker, style) in [
        (&*BOLD, 2, Style::Bold),
        (&*UNDERLINE, 2, Style::Underline),
        (&*STRIKE, 2, Style::Strikethrough),
        (&*CODE, 1, Style::Code),
    ] {
        text = strip_markers(&text, re, marker, style, &mut styles, |_, _, _| true);
    }
    text = strip_markers(&text, &ITALIC, 1, Style::Italic, &mut styles, not_touching_star);

    styles.retain(|r| r.start < r.end);
    let links = find_deep_links(&text);

    FormattedMessage {
        text,
        styles,
        links,
    }
}

/// Remove formatting markers without touching emoticons.
pub fn plain_text(message: &str) -> String {
    if message.trim().is_empty() {
        return String::new();
    }
    let mut scratch = Vec::new();
    let mut text = strip_markers(message, &BOLD, 2, Style::Bold, &mut scratch, |_, _, _| true);
    text = strip_markers(&text, &ITALIC, 1, Style::Italic, &mut scratch, not_touching_star);
    for (re, marker, style) in [
        (&*UNDERLINE, 2, Style::Underline),
        (&*STRIKE, 2, Style::Strikethrough),
        (&*CODE, 1, Style::Code),
    ] {
        text = strip_markers(&text, re, marker, style, &mut scratch, |_, _, _| true);
    }
    text
}

pub fn has_formatting(message: &str) -> bool {
    if message.trim().is_empty() {
        return false;
    }
    [&*BOLD, &*ITALIC, &*UNDERLINE, &*STRIKE, &*CODE]
        .iter()
        .any(|re| re.is_match(message))
}

/// Backslash-escape every formatting character.
pub fn escape_formatting(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        if matches!(c, '*' | '_' | '~' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Single-line preview for notification and list rows, where styles cannot
/// be rendered: markers are swapped for typographic hints.
pub fn preview(message: &str) -> String {
    if message.trim().is_empty() {
        return String::new();
    }
    let text = replace_emoticons(message);
    let text = BOLD.replace_all(&text, "𝐁$1").into_owned();
    let text = replace_checked(&text, &ITALIC, |caps| format!("𝐼{}", &caps[1]));
    let text = UNDERLINE.replace_all(&text, "U̲$1").into_owned();
    let text = STRIKE.replace_all(&text, "S̶$1").into_owned();
    CODE.replace_all(&text, "「$1」").into_owned()
}

pub fn find_deep_links(text: &str) -> Vec<DeepLink> {
    DEEP_LINK
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = match &caps[2] {
                "Topics" => LinkKind::Topic,
                "Quizzes" => LinkKind::Quiz,
                _ => LinkKind::Assignment,
            };
            // ids that overflow are left as plain text
            let course_id = caps[1].parse().ok()?;
            let item_id = caps[3].parse().ok()?;
            Some(DeepLink {
                kind,
                course_id,
                item_id,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

pub fn replace_emoticons(text: &str) -> String {
    let mut out = text.to_string();
    for (code, emoji) in EMOTICONS {
        if out.contains(code) {
            out = out.replace(code, emoji);
        }
    }
    WORD_EMOTICON
        .replace_all(&out, |caps: &Captures<'_>| match &caps[1] {
            "lol" | "LOL" => "😂",
            "omg" | "OMG" => "😱",
            _ => "😆",
        })
        .into_owned()
}

fn not_touching_star(text: &str, start: usize, end: usize) -> bool {
    let bytes = text.as_bytes();
    !(start > 0 && bytes[start - 1] == b'*') && !(end < bytes.len() && bytes[end] == b'*')
}

fn replace_checked(text: &str, re: &Regex, render: impl Fn(&Captures<'_>) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if !not_touching_star(text, whole.start(), whole.end()) {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str(&render(&caps));
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Replace every accepted match of `re` by its first capture group, record a
/// styled range for it, and move previously recorded ranges to follow the
/// removed markers.
fn strip_markers(
    text: &str,
    re: &Regex,
    marker: usize,
    style: Style,
    ranges: &mut Vec<StyledRange>,
    accept: impl Fn(&str, usize, usize) -> bool,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut edits: Vec<(usize, usize)> = Vec::new();
    let mut added = Vec::new();
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !accept(text, whole.start(), whole.end()) {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        let start = out.len();
        out.push_str(inner.as_str());
        added.push(StyledRange {
            style,
            start,
            end: out.len(),
        });
        edits.push((whole.start(), whole.end()));
        last = whole.end();
    }

    if edits.is_empty() {
        return text.to_string();
    }
    out.push_str(&text[last..]);

    for range in ranges.iter_mut() {
        range.start = remap(range.start, &edits, marker);
        range.end = remap(range.end, &edits, marker);
    }
    ranges.extend(added);
    out
}

/// Map an offset in the text before marker removal to the text after it.
/// `edits` are the removed spans in ascending order, each losing `marker`
/// bytes on both sides.
fn remap(pos: usize, edits: &[(usize, usize)], marker: usize) -> usize {
    let mut shift = 0;
    for &(start, end) in edits {
        if pos >= end {
            shift += 2 * marker;
        } else if pos > start {
            let inside = if pos < start + marker {
                start
            } else if pos <= end - marker {
                pos - marker
            } else {
                end - 2 * marker
            };
            return inside - shift;
        } else {
            break;
        }
    }
    pos - shift
}
