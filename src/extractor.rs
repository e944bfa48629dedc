//! Function body extraction
//!
//! Locates a marker in a JavaScript source and returns the brace-delimited
//! block that follows it. Braces are counted on the token stream, so a `{`
//! or `}` inside a string, template, regular expression or comment never
//! counts.

use crate::config::LexerConfig;
use crate::error::{LexError, ParsingError, Position};
use crate::stream::TokenStream;
use crate::token::TokenKind;
use std::ops::Range;
use tracing::debug;

/// Returns the block from the first `{` after `start_marker` through its
/// matching `}`
///
/// ```
/// use js_lexer::extract_function;
///
/// let body = extract_function("var f=function(a){return a+1;};", "function(a)")?;
/// assert_eq!(body, "{return a+1;}");
/// # Ok::<(), js_lexer::ParsingError>(())
/// ```
pub fn extract_function(source: &str, start_marker: &str) -> Result<String, ParsingError> {
    extract_function_with_config(source, start_marker, &LexerConfig::default())
}

/// [`extract_function`] with a custom lexer configuration
pub fn extract_function_with_config(
    source: &str,
    start_marker: &str,
    config: &LexerConfig,
) -> Result<String, ParsingError> {
    let (_, block) = locate_block(source, start_marker, config)?;
    Ok(source[block].to_string())
}

/// Returns everything between the end of `start_marker` and the `}` closing
/// the first block after it
///
/// Callers typically prepend the marker again to rebuild a complete
/// function definition:
///
/// ```
/// use js_lexer::match_to_closing_brace;
///
/// let source = "var Xy=function(a){a=a.split(\"\");return a.join(\"\")};";
/// let marker = "Xy=function";
/// let function = format!("{marker}{}", match_to_closing_brace(source, marker)?);
/// assert_eq!(function, "Xy=function(a){a=a.split(\"\");return a.join(\"\")}");
/// # Ok::<(), js_lexer::ParsingError>(())
/// ```
pub fn match_to_closing_brace(source: &str, start_marker: &str) -> Result<String, ParsingError> {
    match_to_closing_brace_with_config(source, start_marker, &LexerConfig::default())
}

/// [`match_to_closing_brace`] with a custom lexer configuration
pub fn match_to_closing_brace_with_config(
    source: &str,
    start_marker: &str,
    config: &LexerConfig,
) -> Result<String, ParsingError> {
    let (body_start, block) = locate_block(source, start_marker, config)?;
    Ok(source[body_start..block.end].to_string())
}

/// Finds the marker and the block after it. Returns the offset right after
/// the marker and the byte range of the block.
fn locate_block(
    source: &str,
    start_marker: &str,
    config: &LexerConfig,
) -> Result<(usize, Range<usize>), ParsingError> {
    let Some(marker_start) = source.find(start_marker) else {
        debug!(marker = start_marker, "start marker not found");
        return Err(ParsingError::StartNotFound {
            marker: start_marker.to_string(),
        });
    };
    let body_start = marker_start + start_marker.len();
    let origin = Position::at(
        1 + count_line_terminators(&source[..body_start]),
        body_start,
    );
    debug!(
        marker = start_marker,
        offset = body_start,
        line = origin.line,
        "extracting block after marker"
    );

    let block = match_braces(&source[body_start..], config)
        .map_err(|error| shift_error(error, origin))?;
    let block = block.start + body_start..block.end + body_start;
    debug!(start = block.start, end = block.end, "extracted block");
    Ok((body_start, block))
}

/// Scans `text` up to the `}` that closes its first `{`
fn match_braces(text: &str, config: &LexerConfig) -> Result<Range<usize>, ParsingError> {
    let mut stream = TokenStream::with_config(text, config);
    let mut depth = 0usize;
    let mut block_start = None;

    loop {
        let token = stream.next_token().map_err(|error| match error {
            // A `}` before any `{`
            LexError::UnmatchedClosingBrace { position } => {
                ParsingError::UnbalancedBraces { position }
            }
            other => ParsingError::Lex(other),
        })?;

        match token.kind {
            TokenKind::LeftBrace => {
                block_start.get_or_insert(token.start);
                depth += 1;
            }
            TokenKind::RightBrace => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = block_start {
                        return Ok(start..token.end);
                    }
                }
            }
            TokenKind::Eof => {
                return Err(ParsingError::UnbalancedBraces {
                    position: Position::at(stream.line(), token.end),
                });
            }
            _ => {}
        }
    }
}

fn shift_error(error: ParsingError, origin: Position) -> ParsingError {
    match error {
        ParsingError::Lex(error) => ParsingError::Lex(error.shifted(origin)),
        ParsingError::UnbalancedBraces { position } => ParsingError::UnbalancedBraces {
            position: position.shifted(origin),
        },
        other => other,
    }
}

/// Counts line terminators, a `\r\n` pair counting once
fn count_line_terminators(text: &str) -> usize {
    let mut count = 0;
    let mut after_cr = false;
    for ch in text.chars() {
        match ch {
            '\n' if after_cr => {}
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => count += 1,
            _ => {}
        }
        after_cr = ch == '\r';
    }
    count
}
