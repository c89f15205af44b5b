//! Emphasis tag normalizer – rewrites `<%…%>` spans into `<b>…</b>`.
//!
//! Resume data is written with a compact emphasis markup so that YAML values
//! stay readable:
//!
//! ```text
//! summary: "Led the <%payments%> migration"
//! ```
//!
//! After template rendering the whole HTML document is scanned once, left to
//! right, and every `<%` / `%>` pair is replaced with `<b>` / `</b>`. Tags may
//! not nest, so the parse "stack" is a single pending position.
//!
//! Positions reported in [`TagError`] are zero-based character offsets into
//! the scanned text (not byte offsets), so they line up with what an editor
//! shows for the rendered document.

use thiserror::Error;

/// Opening emphasis token.
pub const OPEN_TOKEN: &str = "<%";
/// Closing emphasis token.
pub const CLOSE_TOKEN: &str = "%>";
/// Markup emitted in place of [`OPEN_TOKEN`].
pub const OPEN_REPLACEMENT: &str = "<b>";
/// Markup emitted in place of [`CLOSE_TOKEN`].
pub const CLOSE_REPLACEMENT: &str = "</b>";

/// Malformed emphasis markup. The scan stops at the first violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TagError {
    /// `<%` seen while a previous `<%` is still open.
    #[error("nested or overlapping '<%' found at position {position}")]
    Nested { position: usize },
    /// `%>` seen with no open `<%`.
    #[error("unmatched '%>' found at position {position}")]
    UnmatchedClose { position: usize },
    /// End of input reached with a `<%` still open. `position` is where that
    /// `<%` started.
    #[error("unmatched '<%' found at position {position}")]
    UnmatchedOpen { position: usize },
}

impl TagError {
    /// Character offset of the offending token.
    pub fn position(&self) -> usize {
        match *self {
            TagError::Nested { position }
            | TagError::UnmatchedClose { position }
            | TagError::UnmatchedOpen { position } => position,
        }
    }
}

enum Token {
    Open,
    Close,
    Char(char),
}

/// Single pass over `input`, feeding recognised tokens to `sink`.
fn scan(input: &str, mut sink: impl FnMut(Token)) -> Result<(), TagError> {
    let mut chars = input.chars().peekable();
    let mut pending: Option<usize> = None;
    let mut pos = 0usize;

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        match (c, next) {
            ('<', Some('%')) => {
                if pending.is_some() {
                    return Err(TagError::Nested { position: pos });
                }
                chars.next();
                pending = Some(pos);
                sink(Token::Open);
                pos += 2;
            }
            ('%', Some('>')) => {
                if pending.take().is_none() {
                    return Err(TagError::UnmatchedClose { position: pos });
                }
                chars.next();
                sink(Token::Close);
                pos += 2;
            }
            (c, _) => {
                sink(Token::Char(c));
                pos += 1;
            }
        }
    }

    match pending {
        Some(position) => Err(TagError::UnmatchedOpen { position }),
        None => Ok(()),
    }
}

/// Rewrite every `<%…%>` span in `input` as `<b>…</b>`.
///
/// Text outside the tokens is copied verbatim, so a string with no tokens
/// comes back unchanged.
pub fn normalize_tags(input: &str) -> Result<String, TagError> {
    let mut out = String::with_capacity(input.len() + input.len() / 16);
    scan(input, |token| match token {
        Token::Open => out.push_str(OPEN_REPLACEMENT),
        Token::Close => out.push_str(CLOSE_REPLACEMENT),
        Token::Char(c) => out.push(c),
    })?;
    Ok(out)
}

/// Validate the markup in `input` and return the number of tag pairs,
/// without building the rewritten string.
pub fn count_tags(input: &str) -> Result<usize, TagError> {
    let mut pairs = 0usize;
    scan(input, |token| {
        if let Token::Close = token {
            pairs += 1;
        }
    })?;
    Ok(pairs)
}
