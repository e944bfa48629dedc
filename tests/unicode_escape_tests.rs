use js_lexer::{LexError, TokenKind, TokenStream};

/// Lexes a single token and returns its kind and decoded value
fn lex_one(source: &str) -> (TokenKind, String) {
    let mut stream = TokenStream::new(source);
    let token = stream.next_token().expect("lexing failed");
    (token.kind, stream.token_value().to_string())
}

#[cfg(test)]
mod unicode_escape_tests {
    use super::*;

    #[test]
    fn test_string_unicode_escapes() {
        assert_eq!(lex_one(r#""\u0041\u00e9""#), (TokenKind::String, "Aé".to_string()));
        assert_eq!(lex_one(r#"'\u03b1\u03B2'"#), (TokenKind::String, "αβ".to_string()));
        assert_eq!(lex_one(r#""\u4e00""#), (TokenKind::String, "一".to_string()));
    }

    #[test]
    fn test_surrogate_pairs_combine() {
        assert_eq!(lex_one(r#""\uD83D\uDE00""#).1, "\u{1F600}");
        assert_eq!(lex_one(r#""\uDE00""#).1, "\u{FFFD}");
        assert_eq!(lex_one(r#""\uD83D\uD83D\uDE00""#).1, "\u{FFFD}\u{1F600}");
    }

    #[test]
    fn test_hex_escapes() {
        assert_eq!(lex_one(r#""\x41\x62\x7A""#).1, "AbZ");
        assert_eq!(lex_one(r#""\xe9""#).1, "é");
    }

    #[test]
    fn test_malformed_escapes_are_kept_literally() {
        assert_eq!(lex_one(r#""\u004""#).1, "u004");
        assert_eq!(lex_one(r#""\uXYZW""#).1, "uXYZW");
        assert_eq!(lex_one(r#""\x4""#).1, "x4");
        assert_eq!(lex_one(r#""\xG0""#).1, "xG0");
    }

    #[test]
    fn test_raw_unicode_in_strings() {
        let source = "'日本語 🎉 ñ'";
        let (kind, value) = lex_one(source);
        assert_eq!(kind, TokenKind::String);
        assert_eq!(value, "日本語 🎉 ñ");
    }

    #[test]
    fn test_format_characters_are_kept_in_strings() {
        let (_, value) = lex_one("\"a\u{200B}b\"");
        assert_eq!(value, "a\u{200B}b");
    }

    #[test]
    fn test_identifier_escapes() {
        assert_eq!(lex_one(r"\u0078"), (TokenKind::Name, "x".to_string()));
        assert_eq!(lex_one(r"x\u0030"), (TokenKind::Name, "x0".to_string()));
        assert_eq!(lex_one(r"caf\u00e9"), (TokenKind::Name, "café".to_string()));
    }

    #[test]
    fn test_surrogate_identifier_escapes_decode_to_replacement() {
        assert_eq!(lex_one(r"\uD83D"), (TokenKind::Name, "\u{FFFD}".to_string()));
        assert_eq!(lex_one(r"a\uDE00b"), (TokenKind::Name, "a\u{FFFD}b".to_string()));
    }

    #[test]
    fn test_escaped_keywords_stay_names() {
        let (kind, value) = lex_one(r"v\u0061r");
        assert_eq!(kind, TokenKind::Name);
        assert_eq!(value, r"va\u0072");

        let (kind, value) = lex_one(r"\u0072eturn");
        assert_eq!(kind, TokenKind::Name);
        assert_eq!(value, r"retur\u006e");
    }

    #[test]
    fn test_escaped_keyword_does_not_start_regex() {
        // An escaped `return` is a name, so the slash divides
        let tokens = TokenStream::new(r"\u0072eturn / 2").tokenize_all().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Div);
    }

    #[test]
    fn test_unicode_identifiers() {
        for name in ["φ", "ユニコード", "œ一", "ǻ둘", "ɤ〩", "_$ü", "ⅷ"] {
            let (kind, value) = lex_one(name);
            assert_eq!(kind, TokenKind::Name, "{name}");
            assert_eq!(value, name);
        }
    }

    #[test]
    fn test_trailing_format_characters_are_skipped() {
        let source = "x\u{200C}\u{200D} = 1";
        let tokens = TokenStream::new(source).tokenize_all().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert_eq!(tokens[0].text(source), "x");
        assert_eq!(tokens[1].kind, TokenKind::Assign);
    }

    #[test]
    fn test_unicode_whitespace_and_line_terminators() {
        let source = "a\u{00A0}b\u{FEFF}c\u{3000}d\u{2028}e\u{2029}f";
        let mut stream = TokenStream::new(source);
        let tokens = stream.tokenize_all().unwrap();
        assert_eq!(tokens.len(), 6);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Name));
        assert_eq!(stream.line(), 3);
    }

    #[test]
    fn test_invalid_identifier_escape() {
        let error = TokenStream::new(r"a = \u00G1").tokenize_all().unwrap_err();
        assert!(matches!(error, LexError::InvalidUnicodeEscape { .. }));
        assert_eq!(error.position().offset, 4);
    }

    #[test]
    fn test_backslash_without_u_is_illegal() {
        let error = TokenStream::new(r"a\b").tokenize_all().unwrap_err();
        assert!(matches!(
            error,
            LexError::IllegalCharacter { character: 'b', .. }
        ));
    }
}
