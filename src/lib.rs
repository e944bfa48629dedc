//! # JavaScript Rust Lexer
//!
//! A context-aware JavaScript lexer that tokenizes source text without
//! parsing it, and a function-body extractor built on top of it.
//!
//! ## Overview
//!
//! JavaScript cannot be tokenized by looking at characters alone: a `/` may
//! be a division operator or the start of a regular expression literal, and
//! only the surrounding syntax tells which. This crate resolves the ambiguity
//! with a small amount of bookkeeping (the last three significant tokens and
//! stacks of open parentheses and braces) instead of a full parser, which is
//! enough to reliably find the exact extent of a function body inside large,
//! minified scripts.
//!
//! ## Key Features
//!
//! - **Regex disambiguation**: `/` after `return`, `(`, an operator or a block
//!   starts a regular expression, after an operand it divides
//! - **Full literal support**: strings, template literals, `0x`/`0o`/`0b`
//!   numbers, numeric separators, bigint suffixes, legacy octal
//! - **Unicode aware**: identifiers, `\uXXXX` escapes, Unicode whitespace and
//!   line terminators
//! - **Language versions**: legacy JavaScript 1.5/1.8 and ES2015+ keyword
//!   tables, with an optional strict mode
//! - **Byte offsets**: every token is a half-open byte range into the source
//! - **Typed errors**: every failure carries its line and byte offset
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! js-rust-lexer = "0.1"
//! ```
//!
//! ## Basic Usage
//!
//! ```rust
//! use js_lexer::{TokenKind, TokenStream};
//!
//! let source = "if (x) return /ab+c/i.test(s); else y = a / b;";
//! let tokens = TokenStream::new(source).tokenize_all()?;
//!
//! let regex = tokens.iter().find(|t| t.kind == TokenKind::RegExp).unwrap();
//! assert_eq!(regex.text(source), "/ab+c/i");
//! assert!(tokens.iter().any(|t| t.kind == TokenKind::Div));
//! # Ok::<(), js_lexer::LexError>(())
//! ```
//!
//! ## Extracting Functions
//!
//! ```rust
//! use js_lexer::extract_function;
//!
//! let player = r#"var Xy=function(a){a=a.split("");Zz.reverse(a,"}");return a.join("")};"#;
//! let body = extract_function(player, "Xy=function(a)")?;
//! assert_eq!(body, r#"{a=a.split("");Zz.reverse(a,"}");return a.join("")}"#);
//! # Ok::<(), js_lexer::ParsingError>(())
//! ```
//!
//! ## Lazy Scanning
//!
//! ```rust
//! use js_lexer::{LanguageVersion, TokenKind, scan};
//!
//! let kinds: Vec<TokenKind> = scan("let x = 1;", LanguageVersion::Es6, false)
//!     .collect::<Result<Vec<_>, _>>()?
//!     .into_iter()
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::Let, TokenKind::Name, TokenKind::Assign, TokenKind::Number, TokenKind::Semi]
//! );
//! # Ok::<(), js_lexer::LexError>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use js_lexer::{LanguageVersion, LexerConfig, TokenKind, TokenStream};
//!
//! let config = LexerConfig::default()
//!     .with_language_version(LanguageVersion::Js15)
//!     .with_max_nesting_depth(64);
//!
//! let mut stream = TokenStream::with_config("yield", &config);
//! assert_eq!(stream.next_token()?.kind, TokenKind::Name);
//! # Ok::<(), js_lexer::LexError>(())
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use js_lexer::{LexError, TokenStream};
//!
//! let mut stream = TokenStream::new("var s = 'unterminated\n';");
//! let error = stream.tokenize_all().unwrap_err();
//! assert!(matches!(error, LexError::UnterminatedString { .. }));
//! assert_eq!(error.position().offset, 8);
//! assert_eq!(error.position().line, 1);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` for extraction progress and
//! lexical errors, `trace` for every token and every regex decision. No
//! subscriber is installed by the library.

pub mod chars;
pub mod config;
pub mod context;
pub mod cursor;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod stream;
pub mod token;

#[cfg(test)]
mod error_tests;

// Re-export main types for convenience
pub use config::{LanguageVersion, LexerConfig};
pub use error::{LexError, ParsingError, Position};
pub use extractor::{
    extract_function, extract_function_with_config, match_to_closing_brace,
    match_to_closing_brace_with_config,
};
pub use scanner::Scanner;
pub use stream::{TokenStream, scan};
pub use token::{Token, TokenKind, is_keyword, keyword_kind};

// Disambiguation context, for callers that inspect it
pub use context::{Brace, LookBehind, MetaToken, Nesting, Paren, RegexContext};
