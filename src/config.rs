//! Lexer configuration

use serde::{Deserialize, Serialize};

/// JavaScript language version the scanner targets
///
/// Ordered from oldest to newest so versions can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageVersion {
    /// Legacy JavaScript: `let` and `yield` are plain identifiers
    Js15,
    /// JavaScript 1.7/1.8: `let` and `yield` are keywords
    Js18,
    /// ECMAScript 2015 and later
    Es6,
}

impl LanguageVersion {
    /// ES6 keyword table, `0o`/`0b` literals, bigint suffix and `**`
    pub fn is_es6(self) -> bool {
        self >= LanguageVersion::Es6
    }

    /// Whether `let` and `yield` scan as keywords
    pub fn has_let_and_yield(self) -> bool {
        self >= LanguageVersion::Js18
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        LanguageVersion::Es6
    }
}

/// Configuration options for the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    /// Language version selecting the keyword table and literal syntax
    pub language_version: LanguageVersion,
    /// Treat ES6 strict-mode future reserved words as reserved
    pub strict_mode: bool,
    /// Report pre-ES6 future reserved words (`class`, `enum`, ...) as names
    pub reserved_as_identifier: bool,
    /// Maximum combined paren/brace nesting depth
    pub max_nesting_depth: usize,
    /// Maximum number of significant tokens per stream
    pub max_tokens: usize,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            language_version: LanguageVersion::default(),
            strict_mode: false,
            reserved_as_identifier: true,
            max_nesting_depth: 1024,
            max_tokens: 10_000_000,
        }
    }
}

impl LexerConfig {
    /// Configuration for legacy (pre-ES6) scripts
    pub fn es5() -> Self {
        Self {
            language_version: LanguageVersion::Js18,
            ..Self::default()
        }
    }

    /// Configuration for ES2015+ scripts
    pub fn es6() -> Self {
        Self::default()
    }

    pub fn with_language_version(mut self, version: LanguageVersion) -> Self {
        self.language_version = version;
        self
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn with_reserved_as_identifier(mut self, allow: bool) -> Self {
        self.reserved_as_identifier = allow;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
