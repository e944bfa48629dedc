//! Token stream over JavaScript source
//!
//! [`TokenStream`] is the public face of the lexer. It pulls raw tokens from
//! the [`Scanner`], drops line ends and comments, resolves `/` into division
//! or a regular expression literal, and keeps the paren/brace bookkeeping.

use crate::config::{LanguageVersion, LexerConfig};
use crate::context::RegexContext;
use crate::error::{LexError, Position};
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Context-aware stream of significant JavaScript tokens
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    scanner: Scanner<'a>,
    context: RegexContext,
    max_tokens: usize,
    token_count: usize,
    /// Set once the iterator has yielded EOF or an error
    finished: bool,
}

impl<'a> TokenStream<'a> {
    /// Creates a new token stream with default configuration
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, &LexerConfig::default())
    }

    /// Creates a new token stream with custom configuration
    pub fn with_config(source: &'a str, config: &LexerConfig) -> Self {
        Self {
            scanner: Scanner::with_config(source, config),
            context: RegexContext::new(config.max_nesting_depth),
            max_tokens: config.max_tokens,
            token_count: 0,
            finished: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.scanner.source()
    }

    /// Returns the next significant token
    ///
    /// Line ends and comments are skipped. At end of input an `Eof` token is
    /// returned, and returned again on every further call.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let result = self.advance();
        if let Err(error) = &result {
            let position = error.position();
            debug!(
                error = %error,
                line = position.line,
                offset = position.offset,
                "lexical error"
            );
        }
        result
    }

    fn advance(&mut self) -> Result<Token, LexError> {
        let mut token = loop {
            let token = self.scanner.next_token()?;
            if !token.kind.is_trivia() {
                break token;
            }
        };

        if token.kind == TokenKind::Eof {
            return Ok(token);
        }

        if matches!(token.kind, TokenKind::Div | TokenKind::AssignDiv) {
            let regex = self.context.starts_regex();
            trace!(
                offset = token.start,
                previous = ?self.context.look_behind().one().map(|t| t.kind),
                regex,
                "slash disambiguated"
            );
            if regex {
                token = self.scanner.read_regexp(token.kind)?;
            }
        }

        self.token_count += 1;
        if self.token_count > self.max_tokens {
            return Err(LexError::TokenLimitExceeded {
                limit: self.max_tokens,
                position: Position::at(self.scanner.token_line(), token.start),
            });
        }

        self.context.keep_books(token, self.scanner.line())?;
        trace!(kind = %token.kind, start = token.start, end = token.end, "token");
        Ok(token)
    }

    /// True when every `(` and `{` seen so far has been closed
    pub fn is_balanced(&self) -> bool {
        self.context.is_balanced()
    }

    /// Decoded value of the last token, see [`Scanner::value`]
    pub fn token_value(&self) -> &str {
        self.scanner.value()
    }

    /// Flags of the last regular expression literal
    pub fn regex_flags(&self) -> &str {
        self.scanner.regex_flags()
    }

    /// Current line number (1-based)
    pub fn line(&self) -> usize {
        self.scanner.line()
    }

    /// Paren/brace bookkeeping state
    pub fn context(&self) -> &RegexContext {
        &self.context
    }

    /// Scans the rest of the input, EOF excluded
    pub fn tokenize_all(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }
}

impl Iterator for TokenStream<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl FusedIterator for TokenStream<'_> {}

/// Lazily scans `source` into significant tokens
pub fn scan(source: &str, language_version: LanguageVersion, strict_mode: bool) -> TokenStream<'_> {
    let config = LexerConfig::default()
        .with_language_version(language_version)
        .with_strict_mode(strict_mode);
    TokenStream::with_config(source, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        TokenStream::new(source)
            .map(|token| token.expect("lexing failed").kind)
            .collect()
    }

    #[test]
    fn test_division_between_names() {
        assert_eq!(
            kinds("a/b"),
            vec![TokenKind::Name, TokenKind::Div, TokenKind::Name]
        );
    }

    #[test]
    fn test_regex_after_return() {
        let source = "return /abc/;";
        let mut stream = TokenStream::new(source);
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::Return);
        let regex = stream.next_token().unwrap();
        assert_eq!(regex.kind, TokenKind::RegExp);
        assert_eq!(regex.text(source), "/abc/");
        assert_eq!(stream.token_value(), "abc");
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::Semi);
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_regex_at_start_of_input() {
        assert_eq!(
            kinds("/x/g.test(s)"),
            vec![
                TokenKind::RegExp,
                TokenKind::Dot,
                TokenKind::Name,
                TokenKind::LeftParen,
                TokenKind::Name,
                TokenKind::RightParen
            ]
        );
    }

    #[test]
    fn test_division_after_subscript() {
        assert_eq!(
            kinds("arr[0]/2"),
            vec![
                TokenKind::Name,
                TokenKind::LeftBracket,
                TokenKind::Number,
                TokenKind::RightBracket,
                TokenKind::Div,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_assign_div_versus_regex() {
        assert_eq!(
            kinds("a /= 2"),
            vec![TokenKind::Name, TokenKind::AssignDiv, TokenKind::Number]
        );
        let source = "x = /=y/";
        let tokens = TokenStream::new(source).tokenize_all().unwrap();
        assert_eq!(tokens[2].kind, TokenKind::RegExp);
        assert_eq!(tokens[2].text(source), "/=y/");
    }

    #[test]
    fn test_comments_are_transparent() {
        assert_eq!(
            kinds("return /* note */ /re/"),
            vec![TokenKind::Return, TokenKind::RegExp]
        );
        assert_eq!(
            kinds("a // note\n/ b"),
            vec![TokenKind::Name, TokenKind::Div, TokenKind::Name]
        );
    }

    #[test]
    fn test_balance() {
        let mut stream = TokenStream::new("if (x) { y(); }");
        stream.tokenize_all().unwrap();
        assert!(stream.is_balanced());

        let mut stream = TokenStream::new("f(a, {b: [1");
        stream.tokenize_all().unwrap();
        assert!(!stream.is_balanced());
    }

    #[test]
    fn test_unmatched_close_is_error() {
        let mut stream = TokenStream::new("a)");
        stream.next_token().unwrap();
        assert!(matches!(
            stream.next_token(),
            Err(LexError::UnmatchedClosingParen { .. })
        ));
    }

    #[test]
    fn test_iterator_fuses_after_error() {
        let mut stream = TokenStream::new("a # b");
        assert!(matches!(stream.next(), Some(Ok(_))));
        assert!(matches!(stream.next(), Some(Err(LexError::IllegalCharacter { .. }))));
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_eof_repeats() {
        let mut stream = TokenStream::new("");
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::Eof);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_token_limit() {
        let config = LexerConfig::default().with_max_tokens(2);
        let mut stream = TokenStream::with_config("a b c", &config);
        stream.next_token().unwrap();
        stream.next_token().unwrap();
        assert!(matches!(
            stream.next_token(),
            Err(LexError::TokenLimitExceeded { limit: 2, .. })
        ));
    }

    #[test]
    fn test_scan_function() {
        let tokens: Vec<_> = scan("let x = 1", LanguageVersion::Js15, false)
            .map(|t| t.unwrap().kind)
            .collect();
        assert_eq!(
            tokens,
            vec![
                TokenKind::Name,
                TokenKind::Name,
                TokenKind::Assign,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_line_tracking() {
        let mut stream = TokenStream::new("a\nb\n\nc");
        stream.tokenize_all().unwrap();
        assert_eq!(stream.line(), 4);
    }
}
