//! Character cursor over JavaScript source text
//!
//! The cursor hands out one character at a time, normalizing every line
//! terminator (`\n`, `\r`, `\r\n`, U+2028, U+2029) to a single `'\n'` while
//! keeping byte offsets into the untouched source. Up to three characters can
//! be pushed back.

use crate::chars::{BYTE_ORDER_MARK, is_format_char, is_unicode_line_terminator};
use smallvec::SmallVec;

/// Maximum number of characters that can be pushed back at once
pub const MAX_PUSHBACK: usize = 3;

/// Record of one fetch, enough to undo and redo it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fetched {
    /// Character handed out, `None` at end of input
    ch: Option<char>,
    /// Cursor before the fetch
    from: usize,
    /// Byte offset where the returned character starts
    char_start: usize,
    /// Cursor after the fetch
    to: usize,
}

/// Low-level reader with pushback and line terminator normalization
#[derive(Debug, Clone)]
pub struct CharCursor<'a> {
    source: &'a str,
    /// Byte offset of the next raw character in `source`
    source_cursor: usize,
    /// Byte offset of the next character to be handed out, pushback included
    cursor: usize,
    /// Most recent fetches, newest last
    history: SmallVec<[Fetched; MAX_PUSHBACK + 1]>,
    /// Pushed back fetches, next to be returned last
    pushback: SmallVec<[Fetched; MAX_PUSHBACK]>,
    /// Raw terminator of the line just ended, until the next raw fetch
    line_end_char: Option<char>,
    /// Start offset of the last character handed out
    last_char_start: usize,
    line: usize,
}

impl<'a> CharCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            source_cursor: 0,
            cursor: 0,
            history: SmallVec::new(),
            pushback: SmallVec::new(),
            line_end_char: None,
            last_char_start: 0,
            line: 1,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Byte offset of the next character to be read
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Byte offset where the last fetched character starts
    #[inline(always)]
    pub fn last_char_start(&self) -> usize {
        self.last_char_start
    }

    /// Current line number (1-based)
    ///
    /// A line terminator only advances the counter once the character after
    /// it has been read from the source, so pushing the terminator back never
    /// double counts.
    #[inline(always)]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Raw character that ended the current line, if the last raw fetch was a
    /// line terminator
    pub fn line_end_char(&self) -> Option<char> {
        self.line_end_char
    }

    /// Fetches the next character, skipping Unicode format characters
    #[inline]
    pub fn next_char(&mut self) -> Option<char> {
        self.fetch(true, false)
    }

    /// Fetches the next character, keeping Unicode format characters
    #[inline]
    pub fn next_char_keep_format(&mut self) -> Option<char> {
        self.fetch(false, false)
    }

    /// Fetches the next character without line bookkeeping
    #[inline]
    pub fn next_char_ignore_line_end(&mut self) -> Option<char> {
        self.fetch(true, true)
    }

    /// Same as [`next_char_ignore_line_end`](Self::next_char_ignore_line_end)
    /// but keeps Unicode format characters
    #[inline]
    pub fn next_char_ignore_line_end_keep_format(&mut self) -> Option<char> {
        self.fetch(false, true)
    }

    fn fetch(&mut self, skip_format_chars: bool, ignore_line_end: bool) -> Option<char> {
        if let Some(fetched) = self.pushback.pop() {
            self.cursor = fetched.to;
            self.last_char_start = fetched.char_start;
            self.remember(fetched);
            return fetched.ch;
        }

        let source = self.source;
        let from = self.cursor;
        loop {
            let Some(raw) = source[self.source_cursor..].chars().next() else {
                self.last_char_start = self.source_cursor;
                self.remember(Fetched {
                    ch: None,
                    from,
                    char_start: self.source_cursor,
                    to: self.source_cursor,
                });
                return None;
            };
            let char_start = self.source_cursor;
            self.source_cursor += raw.len_utf8();
            self.cursor = self.source_cursor;

            if !ignore_line_end {
                if let Some(line_end) = self.line_end_char {
                    if line_end == '\r' && raw == '\n' {
                        self.line_end_char = Some('\n');
                        continue;
                    }
                    self.line_end_char = None;
                    self.line += 1;
                }
            }

            let ch = if raw == '\n' || raw == '\r' {
                self.line_end_char = Some(raw);
                '\n'
            } else if raw.is_ascii() || raw == BYTE_ORDER_MARK {
                raw
            } else if skip_format_chars && is_format_char(raw) {
                continue;
            } else if is_unicode_line_terminator(raw) {
                self.line_end_char = Some(raw);
                '\n'
            } else {
                raw
            };

            self.last_char_start = char_start;
            self.remember(Fetched {
                ch: Some(ch),
                from,
                char_start,
                to: self.source_cursor,
            });
            return Some(ch);
        }
    }

    fn remember(&mut self, fetched: Fetched) {
        if self.history.len() == MAX_PUSHBACK + 1 {
            self.history.remove(0);
        }
        self.history.push(fetched);
    }

    /// Pushes back the most recently fetched character
    ///
    /// # Panics
    ///
    /// Panics when the pushback buffer is full, when `ch` is not the last
    /// fetched character, or when pushing back on top of a pushed back line
    /// terminator. All three are scanner bugs, not input errors.
    pub fn push_back(&mut self, ch: Option<char>) {
        assert!(
            !matches!(self.pushback.last(), Some(f) if f.ch == Some('\n')),
            "cannot push back across a line boundary"
        );
        self.push_back_ignore_line_end(ch);
    }

    /// Pushes back the most recently fetched character without the line
    /// boundary check
    pub fn push_back_ignore_line_end(&mut self, ch: Option<char>) {
        assert!(
            self.pushback.len() < MAX_PUSHBACK,
            "pushback buffer holds at most {MAX_PUSHBACK} characters"
        );
        let fetched = self
            .history
            .pop()
            .unwrap_or_else(|| panic!("push_back({ch:?}) without a matching fetch"));
        assert_eq!(fetched.ch, ch, "push_back must undo the last fetch");
        self.cursor = fetched.from;
        self.pushback.push(fetched);
    }

    /// Returns the next character without consuming it
    pub fn peek(&mut self) -> Option<char> {
        let ch = self.next_char();
        self.push_back(ch);
        ch
    }
}
