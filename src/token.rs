//! Token kinds, tokens and keyword tables
//!
//! Every [`TokenKind`] carries three fixed attributes (operator, punctuator,
//! keyword) that the regex disambiguation and brace bookkeeping read instead
//! of re-deriving token semantics.

use crate::config::LanguageVersion;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Lexical token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Pseudo tokens
    Eof,
    Eol,
    Comment,

    // Literals and names
    Name,
    Number,
    String,
    TemplateLiteral,
    RegExp,

    // Keywords
    Break,
    Case,
    Catch,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Export,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    Let,
    New,
    Null,
    Return,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
    Yield,
    /// Future reserved word (`class`, `enum`, `super`, ...)
    Reserved,

    // Structural punctuators
    Semi,         // ;
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    LeftParen,    // (
    RightParen,   // )
    Comma,        // ,
    Hook,         // ?
    Colon,        // :
    Dot,          // .
    Arrow,        // =>

    // Assignment operators
    Assign,       // =
    AssignBitOr,  // |=
    AssignBitXor, // ^=
    AssignBitAnd, // &=
    AssignLsh,    // <<=
    AssignRsh,    // >>=
    AssignUrsh,   // >>>=
    AssignAdd,    // +=
    AssignSub,    // -=
    AssignMul,    // *=
    AssignDiv,    // /=
    AssignMod,    // %=
    AssignExp,    // **=

    // Binary and unary operators
    Or,     // ||
    And,    // &&
    BitOr,  // |
    BitXor, // ^
    BitAnd, // &
    Eq,     // ==
    Ne,     // !=
    ShEq,   // ===
    ShNe,   // !==
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
    Lsh,    // <<
    Rsh,    // >>
    Ursh,   // >>>
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    Exp,    // **
    Not,    // !
    BitNot, // ~
    Inc,    // ++
    Dec,    // --
}

const OPERATOR: u8 = 1 << 0;
const PUNCTUATOR: u8 = 1 << 1;
const KEYWORD: u8 = 1 << 2;

impl TokenKind {
    const fn attributes(self) -> u8 {
        use TokenKind::*;
        match self {
            Eof | Eol | Comment | Name | Number | String | TemplateLiteral | RegExp => 0,

            // Keywords that also act as operators
            In | Instanceof | Delete | Typeof | Void | Throw | New => KEYWORD | OPERATOR,

            Break | Case | Catch | Const | Continue | Debugger | Default | Do | Else | Export
            | False | Finally | For | Function | If | Import | Let | Null | Return | Switch
            | This | True | Try | Var | While | With | Yield | Reserved => KEYWORD,

            Semi | LeftBracket | RightBracket | LeftBrace | RightBrace | LeftParen
            | RightParen | Dot | Arrow => PUNCTUATOR,

            Comma | Hook | Colon => OPERATOR | PUNCTUATOR,

            Assign | AssignBitOr | AssignBitXor | AssignBitAnd | AssignLsh | AssignRsh
            | AssignUrsh | AssignAdd | AssignSub | AssignMul | AssignDiv | AssignMod
            | AssignExp => OPERATOR | PUNCTUATOR,

            Or | And | BitOr | BitXor | BitAnd | Eq | Ne | ShEq | ShNe | Lt | Le | Gt | Ge
            | Lsh | Rsh | Ursh | Add | Sub | Mul | Div | Mod | Exp | Not | BitNot => {
                OPERATOR | PUNCTUATOR
            }

            // Operators only; they never open a block
            Inc | Dec => OPERATOR,
        }
    }

    /// Operators, in the sense used for regex and block detection
    pub const fn is_operator(self) -> bool {
        self.attributes() & OPERATOR != 0
    }

    /// Punctuators: `++` and `--` are operators but not punctuators
    pub const fn is_punctuator(self) -> bool {
        self.attributes() & PUNCTUATOR != 0
    }

    /// Keywords and reserved words
    pub const fn is_keyword(self) -> bool {
        self.attributes() & KEYWORD != 0
    }

    /// Keywords heading a parenthesized condition: `if`, `for`, `while`, `with`
    pub const fn is_conditional(self) -> bool {
        matches!(
            self,
            TokenKind::If | TokenKind::For | TokenKind::While | TokenKind::With
        )
    }

    /// Pseudo tokens skipped by the token stream
    pub const fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Eol | TokenKind::Comment)
    }

    /// Returns a short name for the token kind, used in logs and test output
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Eof => "end of file",
            Eol => "end of line",
            Comment => "comment",
            Name => "name",
            Number => "number",
            String => "string",
            TemplateLiteral => "template literal",
            RegExp => "regular expression",
            Break => "break",
            Case => "case",
            Catch => "catch",
            Const => "const",
            Continue => "continue",
            Debugger => "debugger",
            Default => "default",
            Delete => "delete",
            Do => "do",
            Else => "else",
            Export => "export",
            False => "false",
            Finally => "finally",
            For => "for",
            Function => "function",
            If => "if",
            Import => "import",
            In => "in",
            Instanceof => "instanceof",
            Let => "let",
            New => "new",
            Null => "null",
            Return => "return",
            Switch => "switch",
            This => "this",
            Throw => "throw",
            True => "true",
            Try => "try",
            Typeof => "typeof",
            Var => "var",
            Void => "void",
            While => "while",
            With => "with",
            Yield => "yield",
            Reserved => "reserved word",
            Semi => "';'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            LeftParen => "'('",
            RightParen => "')'",
            Comma => "','",
            Hook => "'?'",
            Colon => "':'",
            Dot => "'.'",
            Arrow => "'=>'",
            Assign => "'='",
            AssignBitOr => "'|='",
            AssignBitXor => "'^='",
            AssignBitAnd => "'&='",
            AssignLsh => "'<<='",
            AssignRsh => "'>>='",
            AssignUrsh => "'>>>='",
            AssignAdd => "'+='",
            AssignSub => "'-='",
            AssignMul => "'*='",
            AssignDiv => "'/='",
            AssignMod => "'%='",
            AssignExp => "'**='",
            Or => "'||'",
            And => "'&&'",
            BitOr => "'|'",
            BitXor => "'^'",
            BitAnd => "'&'",
            Eq => "'=='",
            Ne => "'!='",
            ShEq => "'==='",
            ShNe => "'!=='",
            Lt => "'<'",
            Le => "'<='",
            Gt => "'>'",
            Ge => "'>='",
            Lsh => "'<<'",
            Rsh => "'>>'",
            Ursh => "'>>>'",
            Add => "'+'",
            Sub => "'-'",
            Mul => "'*'",
            Div => "'/'",
            Mod => "'%'",
            Exp => "'**'",
            Not => "'!'",
            BitNot => "'~'",
            Inc => "'++'",
            Dec => "'--'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified lexeme: its kind and half-open byte range in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "token range must not be inverted");
        Self { kind, start, end }
    }

    /// Length of the lexeme in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Byte range of the lexeme
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Raw source text of the lexeme
    ///
    /// `source` must be the string the token was scanned from.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// JavaScript 1.8 and earlier
static JS_KEYWORDS: LazyLock<IndexMap<&'static str, TokenKind>> = LazyLock::new(|| {
    use TokenKind::*;
    let mut table: IndexMap<&'static str, TokenKind> = [
        ("break", Break),
        ("case", Case),
        ("continue", Continue),
        ("default", Default),
        ("delete", Delete),
        ("do", Do),
        ("else", Else),
        ("export", Export),
        ("false", False),
        ("for", For),
        ("function", Function),
        ("if", If),
        ("in", In),
        ("let", Let),
        ("new", New),
        ("null", Null),
        ("return", Return),
        ("switch", Switch),
        ("this", This),
        ("true", True),
        ("typeof", Typeof),
        ("var", Var),
        ("void", Void),
        ("while", While),
        ("with", With),
        ("yield", Yield),
        ("throw", Throw),
        ("catch", Catch),
        ("const", Const),
        ("debugger", Debugger),
        ("finally", Finally),
        ("instanceof", Instanceof),
        ("try", Try),
    ]
    .into_iter()
    .collect();

    for reserved in [
        "abstract",
        "boolean",
        "byte",
        "char",
        "class",
        "double",
        "enum",
        "extends",
        "final",
        "float",
        "goto",
        "implements",
        "import",
        "int",
        "interface",
        "long",
        "native",
        "package",
        "private",
        "protected",
        "public",
        "short",
        "static",
        "super",
        "synchronized",
        "throws",
        "transient",
        "volatile",
    ] {
        table.insert(reserved, Reserved);
    }
    table
});

/// ECMAScript 2015 and later
static ES6_KEYWORDS: LazyLock<IndexMap<&'static str, TokenKind>> = LazyLock::new(|| {
    use TokenKind::*;
    [
        ("break", Break),
        ("case", Case),
        ("catch", Catch),
        ("const", Const),
        ("continue", Continue),
        ("debugger", Debugger),
        ("default", Default),
        ("delete", Delete),
        ("do", Do),
        ("else", Else),
        ("export", Export),
        ("finally", Finally),
        ("for", For),
        ("function", Function),
        ("if", If),
        ("import", Import),
        ("in", In),
        ("instanceof", Instanceof),
        ("new", New),
        ("return", Return),
        ("switch", Switch),
        ("this", This),
        ("throw", Throw),
        ("try", Try),
        ("typeof", Typeof),
        ("var", Var),
        ("void", Void),
        ("while", While),
        ("with", With),
        ("yield", Yield),
        ("false", False),
        ("null", Null),
        ("true", True),
        ("let", Let),
        ("class", Reserved),
        ("extends", Reserved),
        ("super", Reserved),
        ("await", Reserved),
        ("enum", Reserved),
    ]
    .into_iter()
    .collect()
});

/// Words reserved only in ES6 strict mode code
const ES6_STRICT_RESERVED: [&str; 7] = [
    "implements",
    "interface",
    "package",
    "private",
    "protected",
    "public",
    "static",
];

/// Looks up `name` in the keyword table for `version`
///
/// Returns `None` for plain identifiers. The `let`/`yield` downgrade for
/// pre-1.7 versions is applied by the scanner, not here.
pub fn keyword_kind(name: &str, version: LanguageVersion, strict: bool) -> Option<TokenKind> {
    if !version.is_es6() {
        return JS_KEYWORDS.get(name).copied();
    }
    if let Some(kind) = ES6_KEYWORDS.get(name) {
        return Some(*kind);
    }
    if strict && ES6_STRICT_RESERVED.contains(&name) {
        return Some(TokenKind::Reserved);
    }
    None
}

/// Checks if `name` is a keyword or reserved word for `version`
pub fn is_keyword(name: &str, version: LanguageVersion, strict: bool) -> bool {
    keyword_kind(name, version, strict).is_some()
}

/// Iterates over the keyword table for `version`, in declaration order
pub fn keywords(version: LanguageVersion) -> impl Iterator<Item = (&'static str, TokenKind)> {
    let table: &'static IndexMap<&'static str, TokenKind> = if version.is_es6() {
        &ES6_KEYWORDS
    } else {
        &JS_KEYWORDS
    };
    table.iter().map(|(name, kind)| (*name, *kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_attributes() {
        assert!(TokenKind::Assign.is_operator());
        assert!(TokenKind::Assign.is_punctuator());
        assert!(!TokenKind::Assign.is_keyword());

        assert!(TokenKind::Typeof.is_keyword());
        assert!(TokenKind::Typeof.is_operator());
        assert!(!TokenKind::Typeof.is_punctuator());

        assert!(TokenKind::RightBracket.is_punctuator());
        assert!(!TokenKind::RightBracket.is_operator());

        assert!(TokenKind::Inc.is_operator());
        assert!(!TokenKind::Inc.is_punctuator());

        assert!(!TokenKind::Name.is_operator());
        assert!(!TokenKind::Number.is_punctuator());
        assert!(!TokenKind::RegExp.is_keyword());
    }

    #[test]
    fn test_conditional_kinds() {
        for kind in [TokenKind::If, TokenKind::For, TokenKind::While, TokenKind::With] {
            assert!(kind.is_conditional());
        }
        assert!(!TokenKind::Switch.is_conditional());
        assert!(!TokenKind::Catch.is_conditional());
    }

    #[test]
    fn test_token_type_names() {
        assert_eq!(TokenKind::LeftBrace.name(), "'{'");
        assert_eq!(TokenKind::AssignUrsh.to_string(), "'>>>='");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
        assert_eq!(TokenKind::Instanceof.name(), "instanceof");
    }

    #[test]
    fn test_token_text() {
        let source = "var abc = 1;";
        let token = Token::new(TokenKind::Name, 4, 7);
        assert_eq!(token.text(source), "abc");
        assert_eq!(token.len(), 3);
        assert!(!token.is_empty());
        assert_eq!(token.span(), 4..7);
    }

    #[test]
    fn test_legacy_keyword_table() {
        let v = LanguageVersion::Js15;
        assert_eq!(keyword_kind("function", v, false), Some(TokenKind::Function));
        assert_eq!(keyword_kind("class", v, false), Some(TokenKind::Reserved));
        assert_eq!(keyword_kind("goto", v, false), Some(TokenKind::Reserved));
        assert_eq!(keyword_kind("import", v, false), Some(TokenKind::Reserved));
        assert_eq!(keyword_kind("await", v, false), None);
        assert_eq!(keyword_kind("foo", v, false), None);
    }

    #[test]
    fn test_es6_keyword_table() {
        let v = LanguageVersion::Es6;
        assert_eq!(keyword_kind("import", v, false), Some(TokenKind::Import));
        assert_eq!(keyword_kind("await", v, false), Some(TokenKind::Reserved));
        assert_eq!(keyword_kind("goto", v, false), None);
        assert_eq!(keyword_kind("static", v, false), None);
        assert_eq!(keyword_kind("static", v, true), Some(TokenKind::Reserved));
        assert_eq!(keyword_kind("implements", v, true), Some(TokenKind::Reserved));
        assert!(is_keyword("let", v, false));
        assert!(!is_keyword("of", v, true));
    }

    #[test]
    fn test_keyword_iteration_order() {
        let first: Vec<_> = keywords(LanguageVersion::Es6).take(3).collect();
        assert_eq!(
            first,
            vec![
                ("break", TokenKind::Break),
                ("case", TokenKind::Case),
                ("catch", TokenKind::Catch)
            ]
        );
        assert!(keywords(LanguageVersion::Js18).all(|(_, kind)| kind.is_keyword()));
    }

    #[test]
    fn test_token_serialization() {
        let token = Token::new(TokenKind::RegExp, 7, 12);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r#"{"kind":"RegExp","start":7,"end":12}"#);
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
