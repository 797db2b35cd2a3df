//! Common utilities for DAML text rendering.
//!
//! Shared helpers for word wrapping and documentation comment formatting.

use super::render::RenderConfig;

/// Where a documentation comment sits relative to the item it documents.
///
/// DAML follows the Haddock convention: `-- |` precedes a declaration,
/// `-- ^` follows a constructor or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPosition {
    Before,
    After,
}

/// Greedily wrap `text` into lines of at most `width` characters.
///
/// Words longer than `width` get a line of their own rather than being
/// split. All runs of whitespace collapse to single spaces.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Render a documentation comment block, word-wrapped to the configured
/// column width.
///
/// The first line carries the position marker (`|` or `^`); continuation
/// lines align under it. Empty or whitespace-only text renders as nothing,
/// never a stray marker. A `line_spacing` greater than one interleaves bare
/// `--` lines between wrapped lines.
pub fn emit_comment(
    text: &str,
    position: CommentPosition,
    indent: &str,
    cfg: &RenderConfig,
) -> String {
    // "-- | " and the indent eat into the wrap width
    let body_width = cfg.width.saturating_sub(indent.len() + 5).max(1);
    let wrapped = wrap_words(text, body_width);
    if wrapped.is_empty() {
        return String::new();
    }

    let marker = match position {
        CommentPosition::Before => '|',
        CommentPosition::After => '^',
    };

    let mut out = String::new();
    for (i, line) in wrapped.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{indent}-- {marker} {line}\n"));
        } else {
            for _ in 1..cfg.line_spacing {
                out.push_str(&format!("{indent}--\n"));
            }
            out.push_str(&format!("{indent}--   {line}\n"));
        }
    }
    out
}

/// Parenthesize a rendered type unless it is already atomic.
///
/// Single tokens, bracketed lists and parenthesized tuples stand on their
/// own in constructor-argument or `Optional` position.
pub fn parenthesize(rendered: String) -> String {
    let atomic = !rendered.contains(' ')
        || (rendered.starts_with('(') && rendered.ends_with(')'))
        || (rendered.starts_with('[') && rendered.ends_with(']'));
    if atomic {
        rendered
    } else {
        format!("({rendered})")
    }
}
