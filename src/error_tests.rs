//! Tests for error handling and diagnostics
//!
//! Every lexical failure must surface as a typed error with an accurate
//! line and byte offset, and the `Display` output must name the location.

#[cfg(test)]
mod tests {
    use crate::config::LexerConfig;
    use crate::error::{LexError, ParsingError, Position};
    use crate::extractor::extract_function;
    use crate::stream::TokenStream;

    fn lex_error(source: &str) -> LexError {
        TokenStream::new(source)
            .tokenize_all()
            .expect_err("expected a lexical error")
    }

    #[test]
    fn test_position_helpers() {
        let pos = Position::new();
        assert_eq!(pos, Position::at(1, 0));
        assert_eq!(Position::default(), pos);

        // Line 1 of a sub-slice is the origin's line
        let inner = Position::at(1, 4);
        assert_eq!(inner.shifted(Position::at(3, 100)), Position::at(3, 104));
        let inner = Position::at(2, 10);
        assert_eq!(inner.shifted(Position::at(3, 100)), Position::at(4, 110));

        assert_eq!(Position::at(2, 7).to_string(), "line 2, offset 7");
    }

    #[test]
    fn test_illegal_character_position() {
        let error = lex_error("var a = 1;\nvar b = @;");
        assert_eq!(
            error,
            LexError::IllegalCharacter {
                character: '@',
                position: Position::at(2, 19),
            }
        );
        assert!(error.to_string().contains("line 2, offset 19"));
    }

    #[test]
    fn test_unterminated_literal_positions() {
        let error = lex_error("x = \"abc");
        assert_eq!(
            error,
            LexError::UnterminatedString {
                position: Position::at(1, 4)
            }
        );

        let error = lex_error("a;\n`never closed\n");
        assert!(matches!(error, LexError::UnterminatedTemplateLiteral { .. }));
        assert_eq!(error.position().offset, 3);

        let error = lex_error("a /* b");
        assert_eq!(error.position(), Position::at(1, 2));

        let error = lex_error("x = /abc");
        assert!(matches!(error, LexError::UnterminatedRegex { .. }));
        assert_eq!(error.position().offset, 4);
    }

    #[test]
    fn test_multiline_errors_report_the_start_line() {
        let error = lex_error("`a\nb\nc");
        assert_eq!(
            error,
            LexError::UnterminatedTemplateLiteral {
                position: Position::at(1, 0)
            }
        );

        let error = lex_error("a;\n`never closed\n");
        assert_eq!(error.position(), Position::at(2, 3));

        let error = lex_error("x /* a\nb\nc");
        assert_eq!(
            error,
            LexError::UnterminatedComment {
                position: Position::at(1, 2)
            }
        );

        let error = lex_error("a;\n/* x\ny\nz");
        assert_eq!(error.position(), Position::at(2, 3));

        let error = extract_function("f=function(){\n`x\ny", "f=function").unwrap_err();
        assert_eq!(
            error,
            ParsingError::Lex(LexError::UnterminatedTemplateLiteral {
                position: Position::at(2, 14)
            })
        );
    }

    #[test]
    fn test_invalid_regex_flag() {
        let error = lex_error("s.match(/a/gz)");
        assert_eq!(
            error,
            LexError::InvalidRegexFlag {
                flag: 'z',
                position: Position::at(1, 12),
            }
        );
    }

    #[test]
    fn test_number_format_messages() {
        let error = lex_error("x = 0x;");
        match &error {
            LexError::NumberFormat { message, position } => {
                assert_eq!(*message, "missing digits after radix prefix");
                assert_eq!(position.offset, 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(error.to_string().contains("missing digits"));

        assert!(matches!(
            lex_error("1e+;"),
            LexError::NumberFormat {
                message: "missing exponent",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_identifier_escape() {
        let error = lex_error("var \\u12");
        assert_eq!(
            error,
            LexError::InvalidUnicodeEscape {
                position: Position::at(1, 4)
            }
        );
    }

    #[test]
    fn test_unmatched_closers_are_structural() {
        let error = lex_error("f(a));");
        assert_eq!(
            error,
            LexError::UnmatchedClosingParen {
                position: Position::at(1, 4)
            }
        );
        assert!(error.is_structural());

        let error = lex_error("{}\n}");
        assert_eq!(
            error,
            LexError::UnmatchedClosingBrace {
                position: Position::at(2, 3)
            }
        );
        assert!(error.is_structural());

        assert!(!lex_error("'a").is_structural());
    }

    #[test]
    fn test_nesting_depth_limit() {
        let config = LexerConfig::default().with_max_nesting_depth(3);
        let result = TokenStream::with_config("(((a)))", &config).tokenize_all();
        assert!(result.is_ok());

        let result = TokenStream::with_config("(({(a)}))", &config).tokenize_all();
        assert_eq!(
            result.unwrap_err(),
            LexError::NestingTooDeep {
                limit: 3,
                position: Position::at(1, 3),
            }
        );
    }

    #[test]
    fn test_token_limit() {
        let config = LexerConfig::default().with_max_tokens(3);
        let error = TokenStream::with_config("a + b + c", &config)
            .tokenize_all()
            .unwrap_err();
        assert_eq!(
            error,
            LexError::TokenLimitExceeded {
                limit: 3,
                position: Position::at(1, 6),
            }
        );
        assert!(!error.is_structural());
    }

    #[test]
    fn test_lex_error_shifted() {
        let error = LexError::UnterminatedComment {
            position: Position::at(1, 5),
        };
        assert_eq!(
            error.shifted(Position::at(10, 200)).position(),
            Position::at(10, 205)
        );
    }

    #[test]
    fn test_parsing_error_wraps_lex_error() {
        let error = extract_function("f=function(){ x = 'oops\n }", "f=function").unwrap_err();
        assert!(matches!(
            error,
            ParsingError::Lex(LexError::UnterminatedString { .. })
        ));
        assert_eq!(error.position(), Some(Position::at(1, 18)));
        assert!(error.to_string().starts_with("Lexical error:"));

        let converted: ParsingError = LexError::UnterminatedRegex {
            position: Position::new(),
        }
        .into();
        assert!(matches!(converted, ParsingError::Lex(_)));
    }

    #[test]
    fn test_parsing_error_display() {
        let error = ParsingError::StartNotFound {
            marker: "abc=function".to_string(),
        };
        assert_eq!(error.to_string(), "Start marker \"abc=function\" not found");

        let error = ParsingError::UnbalancedBraces {
            position: Position::at(3, 42),
        };
        assert!(error.to_string().contains("line 3, offset 42"));
        assert_eq!(error.position(), Some(Position::at(3, 42)));
    }
}
