//! JavaScript lexical analyzer
//!
//! The [`Scanner`] turns source text into raw tokens, including the `Eol` and
//! `Comment` pseudo tokens. It knows nothing about context: whether a `/`
//! starts a regular expression is decided by the caller, which then asks the
//! scanner to re-read the literal with [`Scanner::read_regexp`].

use crate::chars::{
    BYTE_ORDER_MARK, CHARACTER_TABLE, accumulate_hex_digit, is_digit_in_base, is_identifier_part,
    is_identifier_start, is_js_space,
};
use crate::config::{LanguageVersion, LexerConfig};
use crate::cursor::CharCursor;
use crate::error::{LexError, Position};
use crate::token::{Token, TokenKind, is_keyword, keyword_kind};
use smallvec::SmallVec;

/// Flags accepted after a regular expression literal
pub const REGEX_FLAGS: &str = "gimysu";

const NUMERIC_SEPARATOR: char = '_';

/// Raw JavaScript scanner
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    cursor: CharCursor<'a>,
    language_version: LanguageVersion,
    strict_mode: bool,
    reserved_as_identifier: bool,
    /// Start of the last scanned token
    token_beg: usize,
    /// Line the last scanned token starts on
    token_line: usize,
    /// End (exclusive) of the last scanned token
    token_end: usize,
    /// Whether anything other than whitespace and `-` was seen on this line
    dirty_line: bool,
    /// Decoded text of the last name, number, string or regex
    value: String,
    /// Flags of the last regular expression literal
    regex_flags: String,
    /// High surrogate from a `\uXXXX` escape waiting for its low half
    pending_surrogate: Option<u32>,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner with default configuration
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, &LexerConfig::default())
    }

    /// Creates a new scanner with custom configuration
    pub fn with_config(source: &'a str, config: &LexerConfig) -> Self {
        Self {
            cursor: CharCursor::new(source),
            language_version: config.language_version,
            strict_mode: config.strict_mode,
            reserved_as_identifier: config.reserved_as_identifier,
            token_beg: 0,
            token_line: 1,
            token_end: 0,
            dirty_line: false,
            value: String::new(),
            regex_flags: String::new(),
            pending_surrogate: None,
        }
    }

    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// Current line number (1-based)
    pub fn line(&self) -> usize {
        self.cursor.line()
    }

    /// Byte offset of the next unread character
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Decoded value of the last token
    ///
    /// Names have their `\uXXXX` escapes applied, strings and template
    /// literals their escape sequences, and regular expressions hold the
    /// body between the slashes. Empty for every other kind.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Flags of the last regular expression literal
    pub fn regex_flags(&self) -> &str {
        &self.regex_flags
    }

    /// Line the last scanned token starts on
    pub fn token_line(&self) -> usize {
        self.token_line
    }

    fn current_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.token_beg, self.token_end)
    }

    /// Position of the character just read
    fn position_at(&self, offset: usize) -> Position {
        Position::at(self.cursor.line(), offset)
    }

    /// Position where the last token starts
    fn token_position(&self) -> Position {
        Position::at(self.token_line, self.token_beg)
    }

    fn number_error(&self, message: &'static str) -> LexError {
        LexError::NumberFormat {
            message,
            position: self.token_position(),
        }
    }

    /// Scans the next raw token, `Eol` and `Comment` included
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let kind = self.scan()?;
        Ok(self.current_token(kind))
    }

    fn scan(&mut self) -> Result<TokenKind, LexError> {
        self.value.clear();
        self.regex_flags.clear();

        let first = loop {
            match self.cursor.next_char() {
                None => {
                    self.token_beg = self.cursor.position();
                    self.token_line = self.cursor.line();
                    self.token_end = self.token_beg;
                    return Ok(TokenKind::Eof);
                }
                Some('\n') => {
                    self.dirty_line = false;
                    self.token_beg = self.cursor.last_char_start();
                    self.token_line = self.cursor.line();
                    self.token_end = self.cursor.position();
                    return Ok(TokenKind::Eol);
                }
                Some(ch) if is_js_space(ch) => {}
                Some(ch) => {
                    if ch != '-' {
                        self.dirty_line = true;
                    }
                    break ch;
                }
            }
        };

        // Assume a one character token, fixed up below
        self.token_beg = self.cursor.last_char_start();
        self.token_line = self.cursor.line();
        self.token_end = self.cursor.position();

        if first == '\\' {
            let next = self.cursor.next_char();
            if next == Some('u') {
                return self.scan_identifier(true);
            }
            self.cursor.push_back(next);
        } else if is_identifier_start(first) {
            self.value.push(first);
            return self.scan_identifier(false);
        }

        if CHARACTER_TABLE.is_digit(first)
            || (first == '.' && self.cursor.peek().is_some_and(|c| CHARACTER_TABLE.is_digit(c)))
        {
            return self.scan_number(first);
        }

        if matches!(first, '"' | '\'' | '`') {
            return self.scan_string(first);
        }

        self.scan_punctuator(first)
    }

    fn scan_identifier(&mut self, starts_with_escape: bool) -> Result<TokenKind, LexError> {
        let mut escape_pending = starts_with_escape;
        let mut contains_escape = starts_with_escape;

        let last = loop {
            if escape_pending {
                let mut code = Some(0);
                for _ in 0..4 {
                    let digit = self.cursor.next_char();
                    code = code.and_then(|acc| accumulate_hex_digit(digit, acc));
                    if code.is_none() {
                        break;
                    }
                }
                let Some(code) = code else {
                    return Err(LexError::InvalidUnicodeEscape {
                        position: self.token_position(),
                    });
                };
                // Four hex digits always decode; a surrogate half has no char
                let decoded = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                self.value.push(decoded);
                escape_pending = false;
                continue;
            }

            let c = self.cursor.next_char();
            match c {
                Some('\\') => {
                    let next = self.cursor.next_char();
                    if next != Some('u') {
                        return Err(LexError::IllegalCharacter {
                            character: next.unwrap_or('\\'),
                            position: self.position_at(self.cursor.last_char_start()),
                        });
                    }
                    escape_pending = true;
                    contains_escape = true;
                }
                Some(ch) if ch != BYTE_ORDER_MARK && is_identifier_part(ch) => self.value.push(ch),
                _ => break c,
            }
        };
        self.cursor.push_back(last);
        self.token_end = self.cursor.position();

        if !contains_escape {
            if let Some(kind) = keyword_kind(&self.value, self.language_version, self.strict_mode) {
                if matches!(kind, TokenKind::Let | TokenKind::Yield)
                    && !self.language_version.has_let_and_yield()
                {
                    return Ok(TokenKind::Name);
                }
                if kind != TokenKind::Reserved
                    || self.language_version.is_es6()
                    || !self.reserved_as_identifier
                {
                    return Ok(kind);
                }
            }
        } else if is_keyword(&self.value, self.language_version, self.strict_mode) {
            // An escaped keyword is a plain name; re-escape its last character so
            // the decoded value can never be mistaken for the keyword itself
            if let Some(last) = self.value.pop() {
                self.value.push_str(&format!("\\u{:04x}", last as u32));
            }
        }
        Ok(TokenKind::Name)
    }

    fn scan_number(&mut self, first: char) -> Result<TokenKind, LexError> {
        let es6 = self.language_version.is_es6();
        let mut base = 10;
        let mut is_old_octal = false;
        let mut c = Some(first);

        if first == '0' {
            c = self.cursor.next_char();
            match c {
                Some('x' | 'X') => {
                    base = 16;
                    c = self.cursor.next_char();
                }
                Some('o' | 'O') if es6 => {
                    base = 8;
                    c = self.cursor.next_char();
                }
                Some('b' | 'B') if es6 => {
                    base = 2;
                    c = self.cursor.next_char();
                }
                Some(d) if CHARACTER_TABLE.is_digit(d) => {
                    base = 8;
                    is_old_octal = true;
                }
                _ => self.value.push('0'),
            }
        }

        let empty_detector = self.value.len();
        if !is_old_octal {
            c = self.read_digits(base, c)?;
        } else {
            while let Some(d) = c.filter(|d| CHARACTER_TABLE.is_digit(*d)) {
                if d >= '8' {
                    // 08 and 09 are read as decimal, a superset of the ECMA grammar
                    base = 10;
                    c = self.read_digits(base, c)?;
                    break;
                }
                self.value.push(d);
                c = self.cursor.next_char();
            }
            if c == Some(NUMERIC_SEPARATOR) {
                return Err(self.number_error("numeric separator in legacy octal literal"));
            }
        }
        if self.value.len() == empty_detector && base != 10 {
            return Err(self.number_error("missing digits after radix prefix"));
        }

        if es6 && c == Some('n') {
            c = self.cursor.next_char();
        } else if base == 10 && matches!(c, Some('.' | 'e' | 'E')) {
            if c == Some('.') {
                self.value.push('.');
                c = self.cursor.next_char();
                c = self.read_digits(base, c)?;
            }
            if let Some(e @ ('e' | 'E')) = c {
                self.value.push(e);
                c = self.cursor.next_char();
                if let Some(sign @ ('+' | '-')) = c {
                    self.value.push(sign);
                    c = self.cursor.next_char();
                }
                if !c.is_some_and(|d| CHARACTER_TABLE.is_digit(d)) {
                    return Err(self.number_error("missing exponent"));
                }
                c = self.read_digits(base, c)?;
            }
        }

        self.cursor.push_back(c);
        self.token_end = self.cursor.position();
        Ok(TokenKind::Number)
    }

    /// Reads a run of digits in `base` starting with `first`, accepting single
    /// `_` separators between digits. Returns the first character after the run.
    fn read_digits(&mut self, base: u32, first: Option<char>) -> Result<Option<char>, LexError> {
        if first == Some(NUMERIC_SEPARATOR) {
            return Err(self.number_error("numeric separator at start of digits"));
        }
        let Some(digit) = first.filter(|d| is_digit_in_base(base, *d)) else {
            return Ok(first);
        };
        self.value.push(digit);

        let mut c = self.cursor.next_char();
        loop {
            match c {
                Some(NUMERIC_SEPARATOR) => {
                    c = self.cursor.next_char();
                    match c {
                        Some(d) if is_digit_in_base(base, d) => self.value.push(NUMERIC_SEPARATOR),
                        None | Some('\n') => {
                            return Err(self.number_error("numeric separator at end of digits"));
                        }
                        Some(_) => {
                            return Err(self.number_error("numeric separator not followed by digit"));
                        }
                    }
                }
                Some(d) if is_digit_in_base(base, d) => {
                    self.value.push(d);
                    c = self.cursor.next_char();
                }
                _ => return Ok(c),
            }
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<TokenKind, LexError> {
        let is_template = quote == '`';
        let unterminated = |scanner: &Self| {
            let position = scanner.token_position();
            if is_template {
                LexError::UnterminatedTemplateLiteral { position }
            } else {
                LexError::UnterminatedString { position }
            }
        };

        let mut c = self.cursor.next_char_ignore_line_end_keep_format();
        'literal: loop {
            let Some(mut ch) = c else {
                return Err(unterminated(self));
            };
            if ch == quote {
                break;
            }

            if ch == '\n' {
                match self.cursor.line_end_char() {
                    Some(sep @ ('\u{2028}' | '\u{2029}')) => ch = sep,
                    _ if !is_template => return Err(unterminated(self)),
                    _ => {}
                }
            }

            if ch == '\\' {
                let escaped = self.cursor.next_char();
                ch = match escaped {
                    None => return Err(unterminated(self)),
                    Some('b') => '\u{8}',
                    Some('f') => '\u{C}',
                    Some('n') => '\n',
                    Some('r') => '\r',
                    Some('t') => '\t',
                    Some('v') => '\u{B}',
                    Some('u') => {
                        // Four hex digits; otherwise keep `u` and the digits
                        // read so far as literal text
                        let mut digits: SmallVec<[char; 4]> = SmallVec::new();
                        let mut code = Some(0);
                        for _ in 0..4 {
                            let digit = self.cursor.next_char();
                            code = code.and_then(|acc| accumulate_hex_digit(digit, acc));
                            match (code, digit) {
                                (Some(_), Some(d)) => digits.push(d),
                                _ => {
                                    self.push_value_char('u');
                                    for d in digits {
                                        self.push_value_char(d);
                                    }
                                    c = digit;
                                    continue 'literal;
                                }
                            }
                        }
                        if let Some(unit) = code {
                            self.push_code_unit(unit);
                        }
                        c = self.cursor.next_char_keep_format();
                        continue 'literal;
                    }
                    Some('x') => {
                        // Two hex digits, with the same fallback as above
                        let first = self.cursor.next_char();
                        let Some(high) = accumulate_hex_digit(first, 0) else {
                            self.push_value_char('x');
                            c = first;
                            continue 'literal;
                        };
                        let second = self.cursor.next_char();
                        let Some(code) = accumulate_hex_digit(second, high) else {
                            self.push_value_char('x');
                            if let Some(first) = first {
                                self.push_value_char(first);
                            }
                            c = second;
                            continue 'literal;
                        };
                        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                    }
                    Some('\n') => {
                        // Line continuation
                        c = self.cursor.next_char();
                        continue 'literal;
                    }
                    Some(d @ '0'..='7') => {
                        let mut code = d as u32 - '0' as u32;
                        let mut next = self.cursor.next_char();
                        if let Some(d2 @ '0'..='7') = next {
                            code = 8 * code + (d2 as u32 - '0' as u32);
                            next = self.cursor.next_char();
                            if let Some(d3 @ '0'..='7') = next {
                                // Third digit only while the value stays within 0o377
                                if code <= 0o37 {
                                    code = 8 * code + (d3 as u32 - '0' as u32);
                                    next = self.cursor.next_char();
                                }
                            }
                        }
                        self.cursor.push_back(next);
                        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                    }
                    Some(other) => other,
                };
            }

            self.push_value_char(ch);
            c = self.cursor.next_char_keep_format();
        }
        self.flush_surrogate();

        self.token_end = self.cursor.position();
        Ok(if is_template {
            TokenKind::TemplateLiteral
        } else {
            TokenKind::String
        })
    }

    fn push_value_char(&mut self, ch: char) {
        self.flush_surrogate();
        self.value.push(ch);
    }

    /// Appends one UTF-16 code unit from a `\uXXXX` escape, pairing surrogates
    fn push_code_unit(&mut self, unit: u32) {
        match unit {
            0xD800..=0xDBFF => {
                self.flush_surrogate();
                self.pending_surrogate = Some(unit);
            }
            0xDC00..=0xDFFF => {
                let decoded = self
                    .pending_surrogate
                    .take()
                    .and_then(|high| char::from_u32(0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00)))
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.value.push(decoded);
            }
            _ => {
                self.flush_surrogate();
                self.value
                    .push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    fn flush_surrogate(&mut self) {
        if self.pending_surrogate.take().is_some() {
            self.value.push(char::REPLACEMENT_CHARACTER);
        }
    }

    fn match_char(&mut self, test: char) -> bool {
        let c = self.cursor.next_char_ignore_line_end();
        if c == Some(test) {
            self.token_end = self.cursor.position();
            true
        } else {
            self.cursor.push_back_ignore_line_end(c);
            false
        }
    }

    fn skip_line(&mut self) {
        let c = loop {
            match self.cursor.next_char() {
                None => break None,
                Some('\n') => break Some('\n'),
                Some(_) => {}
            }
        };
        self.cursor.push_back(c);
        self.token_end = self.cursor.position();
    }

    fn scan_punctuator(&mut self, c: char) -> Result<TokenKind, LexError> {
        use TokenKind::*;
        let kind = match c {
            ';' => Semi,
            '[' => LeftBracket,
            ']' => RightBracket,
            '{' => LeftBrace,
            '}' => RightBrace,
            '(' => LeftParen,
            ')' => RightParen,
            ',' => Comma,
            '?' => Hook,
            ':' => Colon,
            '.' => Dot,
            '~' => BitNot,

            '|' => {
                if self.match_char('|') {
                    Or
                } else if self.match_char('=') {
                    AssignBitOr
                } else {
                    BitOr
                }
            }

            '^' => {
                if self.match_char('=') {
                    AssignBitXor
                } else {
                    BitXor
                }
            }

            '&' => {
                if self.match_char('&') {
                    And
                } else if self.match_char('=') {
                    AssignBitAnd
                } else {
                    BitAnd
                }
            }

            '=' => {
                if self.match_char('=') {
                    if self.match_char('=') { ShEq } else { Eq }
                } else if self.match_char('>') {
                    Arrow
                } else {
                    Assign
                }
            }

            '!' => {
                if self.match_char('=') {
                    if self.match_char('=') { ShNe } else { Ne }
                } else {
                    Not
                }
            }

            '<' => {
                // HTML begin-comment `<!--` comments out the rest of the line
                if self.match_char('!') {
                    if self.match_char('-') {
                        if self.match_char('-') {
                            self.skip_line();
                            return Ok(Comment);
                        }
                        self.cursor.push_back_ignore_line_end(Some('-'));
                    }
                    self.cursor.push_back_ignore_line_end(Some('!'));
                    self.token_end = self.cursor.position();
                }
                if self.match_char('<') {
                    if self.match_char('=') { AssignLsh } else { Lsh }
                } else if self.match_char('=') {
                    Le
                } else {
                    Lt
                }
            }

            '>' => {
                if self.match_char('>') {
                    if self.match_char('>') {
                        if self.match_char('=') { AssignUrsh } else { Ursh }
                    } else if self.match_char('=') {
                        AssignRsh
                    } else {
                        Rsh
                    }
                } else if self.match_char('=') {
                    Ge
                } else {
                    Gt
                }
            }

            '*' => {
                if self.language_version.is_es6() && self.match_char('*') {
                    if self.match_char('=') { AssignExp } else { Exp }
                } else if self.match_char('=') {
                    AssignMul
                } else {
                    Mul
                }
            }

            '/' => {
                if self.match_char('/') {
                    self.skip_line();
                    return Ok(Comment);
                }
                if self.match_char('*') {
                    return self.skip_block_comment();
                }
                if self.match_char('=') { AssignDiv } else { Div }
            }

            '%' => {
                if self.match_char('=') {
                    AssignMod
                } else {
                    Mod
                }
            }

            '+' => {
                if self.match_char('=') {
                    AssignAdd
                } else if self.match_char('+') {
                    Inc
                } else {
                    Add
                }
            }

            '-' => {
                let kind = if self.match_char('=') {
                    AssignSub
                } else if self.match_char('-') {
                    // HTML end-comment `-->` at the start of a line
                    if !self.dirty_line && self.match_char('>') {
                        self.skip_line();
                        return Ok(Comment);
                    }
                    Dec
                } else {
                    Sub
                };
                self.dirty_line = true;
                kind
            }

            other => {
                return Err(LexError::IllegalCharacter {
                    character: other,
                    position: self.token_position(),
                });
            }
        };
        Ok(kind)
    }

    /// Skips a `/* ... */` comment whose opening `/*` was just consumed
    fn skip_block_comment(&mut self) -> Result<TokenKind, LexError> {
        let mut look_for_slash = self.match_char('*');
        loop {
            match self.cursor.next_char() {
                None => {
                    return Err(LexError::UnterminatedComment {
                        position: self.token_position(),
                    });
                }
                Some('*') => look_for_slash = true,
                Some('/') => {
                    if look_for_slash {
                        self.token_end = self.cursor.position();
                        return Ok(TokenKind::Comment);
                    }
                }
                Some(_) => {
                    look_for_slash = false;
                    self.token_end = self.cursor.position();
                }
            }
        }
    }

    /// Re-reads the `/` or `/=` just returned as the start of a regular
    /// expression literal, and returns the literal as a `RegExp` token
    pub fn read_regexp(&mut self, start: TokenKind) -> Result<Token, LexError> {
        debug_assert!(matches!(start, TokenKind::Div | TokenKind::AssignDiv));
        let unterminated = |scanner: &Self| LexError::UnterminatedRegex {
            position: scanner.token_position(),
        };

        self.value.clear();
        self.regex_flags.clear();
        if start == TokenKind::AssignDiv {
            // The `=` of a mis-scanned `/=` belongs to the body
            self.value.push('=');
        } else if self.cursor.peek() == Some('*') {
            return Err(unterminated(self));
        }

        let mut in_class = false;
        loop {
            match self.cursor.next_char() {
                Some('/') if !in_class => break,
                None | Some('\n') => return Err(unterminated(self)),
                Some('\\') => {
                    self.value.push('\\');
                    match self.cursor.next_char() {
                        None | Some('\n') => return Err(unterminated(self)),
                        Some(escaped) => self.value.push(escaped),
                    }
                }
                Some(ch) => {
                    match ch {
                        '[' => in_class = true,
                        ']' => in_class = false,
                        _ => {}
                    }
                    self.value.push(ch);
                }
            }
        }

        loop {
            let c = self.cursor.next_char_ignore_line_end();
            match c {
                Some(flag) if REGEX_FLAGS.contains(flag) => self.regex_flags.push(flag),
                Some(flag) if flag.is_ascii_alphabetic() => {
                    return Err(LexError::InvalidRegexFlag {
                        flag,
                        position: self.position_at(self.cursor.last_char_start()),
                    });
                }
                _ => {
                    self.cursor.push_back_ignore_line_end(c);
                    break;
                }
            }
        }

        self.token_end = self.cursor.position();
        Ok(self.current_token(TokenKind::RegExp))
    }
}
