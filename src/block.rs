//! Brace-balanced block scanning.
//!
//! This is the only nesting-aware scanner in the crate. Method bodies and the
//! `mounted` hook are both cut out of the behavior section with it. Font-face
//! rules use their own single-depth scan (see [`crate::font_face`]).

use crate::error::{SfcError, SfcResult};

/// A `{ ... }` span found by [`find_balanced_block`].
///
/// `start` and `end` are byte offsets into the scanned text; `text` includes
/// both outer braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Block<'a> {
    /// The text strictly between the outer braces.
    pub fn inner(&self) -> &'a str {
        &self.text[1..self.text.len() - 1]
    }
}

/// Find the first `{` at or after `start_offset` and return the span through
/// its matching `}`.
///
/// Every `{` and `}` in between counts towards the depth; nothing is skipped
/// (string literals and comments are not special). Fails with
/// [`SfcError::MalformedInput`] when no `{` follows `start_offset` or when the
/// text ends before the depth returns to zero.
pub fn find_balanced_block(text: &str, start_offset: usize) -> SfcResult<Block<'_>> {
    if start_offset > text.len() {
        return Err(SfcError::malformed(
            start_offset,
            format!("scan offset is past the end of the text ({} bytes)", text.len()),
        ));
    }

    // Braces are ASCII, so byte offsets found here are always char boundaries.
    let bytes = text.as_bytes();
    let open = bytes[start_offset..]
        .iter()
        .position(|&b| b == b'{')
        .map(|pos| start_offset + pos)
        .ok_or_else(|| SfcError::malformed(start_offset, "expected '{' but reached end of text"))?;

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let end = i + 1;
                    return Ok(Block {
                        text: &text[open..end],
                        start: open,
                        end,
                    });
                }
            }
            _ => {}
        }
    }

    Err(SfcError::malformed(
        open,
        format!("unterminated block: {} '{{' left open at end of text", depth),
    ))
}
