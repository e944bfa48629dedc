//! Error types and position tracking for JavaScript lexing
//!
//! Every failure is reported as a structured value carrying the byte offset
//! (and line) where the scanner gave up. Nothing here formats user-facing
//! diagnostics beyond the `Display` impls derived by `thiserror`.

use std::fmt;
use thiserror::Error;

/// Represents a position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Byte offset from start of input (0-based)
    pub offset: usize,
}

impl Position {
    /// Creates a new position at the start of input
    pub fn new() -> Self {
        Self { line: 1, offset: 0 }
    }

    /// Creates a position at the given line and byte offset
    pub fn at(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }

    /// Translates a position inside a sub-slice that starts at `origin` into
    /// a position in the enclosing source.
    pub fn shifted(self, origin: Position) -> Self {
        Self {
            line: origin.line + self.line - 1,
            offset: origin.offset + self.offset,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, offset {}", self.line, self.offset)
    }
}

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that cannot start any token
    #[error("Illegal character {character:?} at {position}")]
    IllegalCharacter { character: char, position: Position },

    /// Malformed `\uXXXX` sequence inside an identifier
    #[error("Invalid unicode escape in identifier at {position}")]
    InvalidUnicodeEscape { position: Position },

    /// String literal not terminated before a line end or end of input
    #[error("Unterminated string literal at {position}")]
    UnterminatedString { position: Position },

    /// Template literal not terminated before end of input
    #[error("Unterminated template literal at {position}")]
    UnterminatedTemplateLiteral { position: Position },

    /// Block comment without a closing `*/`
    #[error("Unterminated comment at {position}")]
    UnterminatedComment { position: Position },

    /// Regular expression literal without a closing `/` on the same line
    #[error("Unterminated regular expression literal at {position}")]
    UnterminatedRegex { position: Position },

    /// A letter after a regex literal that is not one of `gimysu`
    #[error("Invalid regular expression flag {flag:?} at {position}")]
    InvalidRegexFlag { flag: char, position: Position },

    /// Malformed numeric literal
    #[error("Invalid number format at {position}: {message}")]
    NumberFormat {
        message: &'static str,
        position: Position,
    },

    /// `)` without a matching `(`
    #[error("Unmatched closing paren at {position}")]
    UnmatchedClosingParen { position: Position },

    /// `}` without a matching `{`
    #[error("Unmatched closing brace at {position}")]
    UnmatchedClosingBrace { position: Position },

    /// Paren/brace nesting exceeded the configured depth
    #[error("Maximum nesting depth {limit} exceeded at {position}")]
    NestingTooDeep { limit: usize, position: Position },

    /// Token stream produced more tokens than the configured limit
    #[error("Token limit {limit} exceeded at {position}")]
    TokenLimitExceeded { limit: usize, position: Position },
}

impl LexError {
    /// Returns the position the error was reported at
    pub fn position(&self) -> Position {
        match self {
            LexError::IllegalCharacter { position, .. }
            | LexError::InvalidUnicodeEscape { position }
            | LexError::UnterminatedString { position }
            | LexError::UnterminatedTemplateLiteral { position }
            | LexError::UnterminatedComment { position }
            | LexError::UnterminatedRegex { position }
            | LexError::InvalidRegexFlag { position, .. }
            | LexError::NumberFormat { position, .. }
            | LexError::UnmatchedClosingParen { position }
            | LexError::UnmatchedClosingBrace { position }
            | LexError::NestingTooDeep { position, .. }
            | LexError::TokenLimitExceeded { position, .. } => *position,
        }
    }

    /// Returns a copy of this error relative to the enclosing source, see
    /// [`Position::shifted`]
    pub fn shifted(self, origin: Position) -> Self {
        let mut error = self;
        match &mut error {
            LexError::IllegalCharacter { position, .. }
            | LexError::InvalidUnicodeEscape { position }
            | LexError::UnterminatedString { position }
            | LexError::UnterminatedTemplateLiteral { position }
            | LexError::UnterminatedComment { position }
            | LexError::UnterminatedRegex { position }
            | LexError::InvalidRegexFlag { position, .. }
            | LexError::NumberFormat { position, .. }
            | LexError::UnmatchedClosingParen { position }
            | LexError::UnmatchedClosingBrace { position }
            | LexError::NestingTooDeep { position, .. }
            | LexError::TokenLimitExceeded { position, .. } => {
                *position = position.shifted(origin);
            }
        }
        error
    }

    /// Returns true for errors caused by paren/brace bookkeeping rather than
    /// by the characters of a single token
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            LexError::UnmatchedClosingParen { .. }
                | LexError::UnmatchedClosingBrace { .. }
                | LexError::NestingTooDeep { .. }
        )
    }
}

/// Main error type for lexing and function extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    /// Lexical analysis error
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    /// The start marker does not occur in the source
    #[error("Start marker {marker:?} not found")]
    StartNotFound { marker: String },

    /// Input ended before the function body's braces balanced
    #[error("Could not find matching braces, scanning stopped at {position}")]
    UnbalancedBraces { position: Position },
}

impl ParsingError {
    /// Returns the position the error was reported at, if it has one
    pub fn position(&self) -> Option<Position> {
        match self {
            ParsingError::Lex(error) => Some(error.position()),
            ParsingError::StartNotFound { .. } => None,
            ParsingError::UnbalancedBraces { position } => Some(*position),
        }
    }
}
