// tests/lexer_tests.rs

use dataview_lang::lexer::{Lexer, tokenize};
use dataview_lang::{SyntaxError, TokenKind};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// ============================================================================
// Keywords and identifiers
// ============================================================================

#[test]
fn test_keywords_ignore_case() {
    assert_eq!(
        kinds("from Where sort asc DESC limit Flatten group BY as"),
        vec![
            TokenKind::From,
            TokenKind::Where,
            TokenKind::Sort,
            TokenKind::Asc,
            TokenKind::Desc,
            TokenKind::Limit,
            TokenKind::Flatten,
            TokenKind::Group,
            TokenKind::By,
            TokenKind::As,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_literal_keywords() {
    assert_eq!(
        kinds("TRUE false Null"),
        vec![
            TokenKind::Boolean(true),
            TokenKind::Boolean(false),
            TokenKind::Null,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_identifiers_keep_case() {
    assert_eq!(
        kinds("Status file.name due-date project_2"),
        vec![
            TokenKind::Identifier("Status".into()),
            TokenKind::Identifier("file.name".into()),
            TokenKind::Identifier("due-date".into()),
            TokenKind::Identifier("project_2".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(
        kinds("listing tables"),
        vec![
            TokenKind::Identifier("listing".into()),
            TokenKind::Identifier("tables".into()),
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("42 3.5 0"),
        vec![
            TokenKind::Integer(42),
            TokenKind::Float(3.5),
            TokenKind::Integer(0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_trailing_dot_is_not_a_float() {
    let err = tokenize("7.").unwrap_err();
    assert_eq!(err.message, "Unexpected character '.'");
    assert_eq!(err.column, 2);
}

#[test]
fn test_strings_with_both_quotes() {
    assert_eq!(
        kinds(r#""Active" 'it\'s' "a\"b\\c\n""#),
        vec![
            TokenKind::String("Active".into()),
            TokenKind::String("it's".into()),
            TokenKind::String("a\"b\\c\n".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_string_content_keeps_case_and_keywords() {
    assert_eq!(
        kinds(r#""WHERE from""#),
        vec![TokenKind::String("WHERE from".into()), TokenKind::Eof]
    );
}

// ============================================================================
// Operators and punctuation
// ============================================================================

#[test]
fn test_operators() {
    assert_eq!(
        kinds("= != < > <= >= , ( ) [ ]"),
        vec![
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::Comma,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_operators_without_spaces() {
    assert_eq!(
        kinds("a>=1"),
        vec![
            TokenKind::Identifier("a".into()),
            TokenKind::GtEq,
            TokenKind::Integer(1),
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Positions and errors
// ============================================================================

#[test]
fn test_token_text_and_positions() {
    let tokens = tokenize("TABLE title\nWHERE  status = \"x\"").unwrap();
    let positions: Vec<(&str, usize, usize)> = tokens
        .iter()
        .map(|t| (t.text.as_str(), t.line, t.column))
        .collect();
    assert_eq!(
        positions,
        vec![
            ("TABLE", 1, 1),
            ("title", 1, 7),
            ("WHERE", 2, 1),
            ("status", 2, 8),
            ("=", 2, 15),
            ("\"x\"", 2, 17),
            ("", 2, 20),
        ]
    );
}

#[test]
fn test_unterminated_string_reports_opening_quote() {
    let err = tokenize("LIST WHERE a = \"open").unwrap_err();
    assert_eq!(err, SyntaxError::new("Unterminated string literal", 1, 16));
}

#[test]
fn test_unexpected_character() {
    let err = tokenize("LIST WHERE a = @b").unwrap_err();
    assert_eq!(err.message, "Unexpected character '@'");
    assert_eq!((err.line, err.column), (1, 16));
}

#[test]
fn test_lone_bang_is_an_error() {
    let err = tokenize("a ! b").unwrap_err();
    assert_eq!(err.column, 3);
}

#[test]
fn test_invalid_escape() {
    let err = tokenize(r#""a\qb""#).unwrap_err();
    assert_eq!(err.message, "Invalid escape sequence '\\q'");
    assert_eq!(err.column, 3);
}

#[test]
fn test_integer_overflow() {
    let err = tokenize("LIMIT 99999999999999999999").unwrap_err();
    assert!(err.message.contains("out of range"));
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("  ");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}
