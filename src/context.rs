//! Regular expression disambiguation
//!
//! Whether a `/` starts a regular expression or is a division operator
//! cannot be decided from the character stream alone. [`RegexContext`]
//! tracks just enough syntactic context to decide it without a parser: a
//! window over the last three significant tokens plus stacks of open
//! parentheses and braces.

use crate::error::{LexError, Position};
use crate::token::{Token, TokenKind};
use smallvec::SmallVec;
use std::fmt;

/// Number of significant tokens kept in the look-behind window
pub const LOOK_BEHIND_SIZE: usize = 3;

/// Context recorded for an open `(`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paren {
    /// The `(` follows a `function` used as an expression
    pub is_function_expression_call: bool,
    /// The `(` opens the header of an `if`, `for`, `while` or `with`
    pub is_conditional_header: bool,
}

/// Context recorded for an open `{`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brace {
    /// A statement block rather than an object literal
    pub is_block: bool,
    /// The paren closed by a `)` right before the `{`
    pub enclosing_paren: Option<Paren>,
}

/// Nesting information attached to a significant token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Plain,
    /// A `(`, or the `)` that closed it
    Paren(Paren),
    /// A `{`, or the `}` that closed it
    Brace(Brace),
}

/// A significant token as remembered by the look-behind window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaToken {
    pub kind: TokenKind,
    /// Line the token was scanned on
    pub line: usize,
    pub nesting: Nesting,
}

impl MetaToken {
    pub fn plain(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            line,
            nesting: Nesting::Plain,
        }
    }

    pub fn paren(&self) -> Option<Paren> {
        match self.nesting {
            Nesting::Paren(paren) => Some(paren),
            _ => None,
        }
    }

    pub fn brace(&self) -> Option<Brace> {
        match self.nesting {
            Nesting::Brace(brace) => Some(brace),
            _ => None,
        }
    }
}

impl fmt::Display for MetaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.line)
    }
}

/// Ring buffer over the last three significant tokens
#[derive(Debug, Clone, Default)]
pub struct LookBehind {
    slots: [Option<MetaToken>; LOOK_BEHIND_SIZE],
    /// Slot the next token is written to
    head: usize,
}

impl LookBehind {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent token
    pub fn one(&self) -> Option<&MetaToken> {
        self.slots[(self.head + LOOK_BEHIND_SIZE - 1) % LOOK_BEHIND_SIZE].as_ref()
    }

    /// Token before [`one`](Self::one)
    pub fn two(&self) -> Option<&MetaToken> {
        self.slots[(self.head + LOOK_BEHIND_SIZE - 2) % LOOK_BEHIND_SIZE].as_ref()
    }

    /// Token before [`two`](Self::two)
    pub fn three(&self) -> Option<&MetaToken> {
        self.slots[self.head].as_ref()
    }

    /// Records a token, evicting the oldest one
    pub fn push(&mut self, token: MetaToken) {
        self.slots[self.head] = Some(token);
        self.head = (self.head + 1) % LOOK_BEHIND_SIZE;
    }
}

/// Paren/brace bookkeeping driving the regex-vs-division decision
#[derive(Debug, Clone)]
pub struct RegexContext {
    look_behind: LookBehind,
    parens: SmallVec<[Paren; 16]>,
    braces: SmallVec<[Brace; 16]>,
    max_nesting_depth: usize,
}

impl Default for RegexContext {
    fn default() -> Self {
        Self::new(crate::config::LexerConfig::default().max_nesting_depth)
    }
}

impl RegexContext {
    pub fn new(max_nesting_depth: usize) -> Self {
        Self {
            look_behind: LookBehind::new(),
            parens: SmallVec::new(),
            braces: SmallVec::new(),
            max_nesting_depth,
        }
    }

    pub fn look_behind(&self) -> &LookBehind {
        &self.look_behind
    }

    /// True when no paren or brace is open
    pub fn is_balanced(&self) -> bool {
        self.parens.is_empty() && self.braces.is_empty()
    }

    pub fn paren_depth(&self) -> usize {
        self.parens.len()
    }

    pub fn brace_depth(&self) -> usize {
        self.braces.len()
    }

    /// Innermost open brace
    pub fn current_brace(&self) -> Option<&Brace> {
        self.braces.last()
    }

    /// Decides whether a `/` or `/=` scanned now starts a regular expression
    pub fn starts_regex(&self) -> bool {
        let Some(one) = self.look_behind.one() else {
            // A script may start with a regex literal expression statement
            return true;
        };
        let kind = one.kind;
        if kind.is_keyword() {
            return kind != TokenKind::This;
        }
        match kind {
            TokenKind::RightParen => one.paren().is_some_and(|p| p.is_conditional_header),
            TokenKind::RightBrace => one.brace().is_some_and(|brace| {
                brace.is_block
                    && !brace
                        .enclosing_paren
                        .is_some_and(|p| p.is_function_expression_call)
            }),
            TokenKind::RightBracket => false,
            _ => kind.is_punctuator() || kind.is_operator(),
        }
    }

    /// Updates the stacks and the look-behind window with a significant token
    /// scanned on `line`
    pub fn keep_books(&mut self, token: Token, line: usize) -> Result<(), LexError> {
        let position = Position::at(line, token.start);
        let nesting = match token.kind {
            TokenKind::LeftParen => {
                self.check_depth(position)?;
                let paren = self.open_paren();
                self.parens.push(paren);
                Nesting::Paren(paren)
            }
            TokenKind::LeftBrace => {
                self.check_depth(position)?;
                let brace = self.open_brace(line);
                self.braces.push(brace);
                Nesting::Brace(brace)
            }
            TokenKind::RightParen => match self.parens.pop() {
                Some(paren) => Nesting::Paren(paren),
                None => return Err(LexError::UnmatchedClosingParen { position }),
            },
            TokenKind::RightBrace => match self.braces.pop() {
                Some(brace) => Nesting::Brace(brace),
                None => return Err(LexError::UnmatchedClosingBrace { position }),
            },
            _ => Nesting::Plain,
        };

        self.look_behind.push(MetaToken {
            kind: token.kind,
            line,
            nesting,
        });
        Ok(())
    }

    fn check_depth(&self, position: Position) -> Result<(), LexError> {
        if self.parens.len() + self.braces.len() >= self.max_nesting_depth {
            return Err(LexError::NestingTooDeep {
                limit: self.max_nesting_depth,
                position,
            });
        }
        Ok(())
    }

    fn open_paren(&self) -> Paren {
        let behind = &self.look_behind;
        let is_expression = |token: Option<&MetaToken>| {
            token.is_some_and(|t| {
                t.kind.is_operator() || matches!(t.kind, TokenKind::Return | TokenKind::Case)
            })
        };
        let is_function = |token: Option<&MetaToken>| token.is_some_and(|t| t.kind == TokenKind::Function);

        // `function (` or `function name (`
        let is_function_expression_call = if is_function(behind.one()) {
            is_expression(behind.two())
        } else if is_function(behind.two()) {
            is_expression(behind.three())
        } else {
            false
        };

        Paren {
            is_function_expression_call,
            is_conditional_header: behind.one().is_some_and(|t| t.kind.is_conditional()),
        }
    }

    fn open_brace(&self, line: usize) -> Brace {
        let one = self.look_behind.one();
        let is_block = match one {
            None => true,
            Some(prev) => match prev.kind {
                TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::Case => false,
                TokenKind::Colon => self.braces.last().is_some_and(|b| b.is_block),
                // Block only when the token before `return` sits on another line
                TokenKind::Return | TokenKind::Yield => {
                    self.look_behind.two().is_some_and(|before| before.line != line)
                }
                kind => !kind.is_operator(),
            },
        };
        let enclosing_paren = one
            .filter(|prev| prev.kind == TokenKind::RightParen)
            .and_then(MetaToken::paren);
        Brace {
            is_block,
            enclosing_paren,
        }
    }
}
