// tests/parser_tests.rs

use dataview_lang::ast::{Direction, SortClause, Source, TableField};
use dataview_lang::{BinOp, Expr, ParseError, Query, QueryType, Value, parse, parse_expression};

fn query(text: &str) -> Query {
    parse(text).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", text, e))
}

fn parse_error(text: &str) -> ParseError {
    match parse(text) {
        Err(dataview_lang::DataviewError::Parse(e)) => e,
        other => panic!("expected a parse error for {:?}, got {:?}", text, other),
    }
}

// ============================================================================
// Query shapes
// ============================================================================

#[test]
fn test_bare_query_types() {
    assert_eq!(query("LIST"), Query::new(QueryType::List));
    assert_eq!(query("task"), Query::new(QueryType::Task));
    assert_eq!(query("Calendar"), Query::new(QueryType::Calendar));
}

#[test]
fn test_table_fields_and_aliases() {
    let q = query(r#"TABLE title, status AS "State", length(tags) AS n"#);
    assert_eq!(
        q.fields,
        vec![
            TableField {
                expression: Expr::field("title"),
                alias: None,
            },
            TableField {
                expression: Expr::field("status"),
                alias: Some("State".into()),
            },
            TableField {
                expression: Expr::call("length", vec![Expr::field("tags")]),
                alias: Some("n".into()),
            },
        ]
    );
    let headers: Vec<String> = q.fields.iter().map(TableField::header).collect();
    assert_eq!(headers, vec!["title", "State", "n"]);
}

#[test]
fn test_table_without_fields() {
    let q = query("TABLE WHERE done = true");
    assert!(q.fields.is_empty());
    assert!(q.where_clause.is_some());
}

#[test]
fn test_every_clause_in_order() {
    let q = query(
        r#"TABLE title FROM "projects" WHERE status = "active" GROUP BY owner FLATTEN SORT due DESC, title LIMIT 5"#,
    );
    assert_eq!(q.query_type, QueryType::Table);
    assert_eq!(q.from_source, Some(Source::Folder("projects".into())));
    assert_eq!(
        q.where_clause,
        Some(Expr::binary(
            BinOp::Equal,
            Expr::field("status"),
            Expr::literal("active")
        ))
    );
    assert_eq!(q.group_by.as_deref(), Some("owner"));
    assert!(q.flatten);
    assert_eq!(
        q.sort,
        vec![
            SortClause {
                field: "due".into(),
                direction: Direction::Desc,
            },
            SortClause {
                field: "title".into(),
                direction: Direction::Asc,
            },
        ]
    );
    assert_eq!(q.limit, Some(5));
}

#[test]
fn test_limit_zero() {
    assert_eq!(query("LIST LIMIT 0").limit, Some(0));
}

// ============================================================================
// FROM sources
// ============================================================================

#[test]
fn test_from_tag_and_folder() {
    assert_eq!(query("LIST FROM \"#project\"").from_source, Some(Source::Tag("project".into())));
    assert_eq!(
        query(r#"LIST FROM "/notes/daily/""#).from_source,
        Some(Source::Folder("notes/daily".into()))
    );
}

#[test]
fn test_from_combinators() {
    let q = query(r##"LIST FROM "#a" OR "#b" AND "work""##);
    assert_eq!(
        q.from_source,
        Some(Source::Or(
            Box::new(Source::Tag("a".into())),
            Box::new(Source::And(
                Box::new(Source::Tag("b".into())),
                Box::new(Source::Folder("work".into()))
            ))
        ))
    );

    let grouped = query(r##"LIST FROM ("#a" OR "#b") AND "work""##);
    assert!(matches!(grouped.from_source, Some(Source::And(..))));
    assert_eq!(
        grouped.from_source.unwrap().to_string(),
        r##"("#a" OR "#b") AND "work""##
    );
}

#[test]
fn test_from_requires_string() {
    let err = parse_error("LIST FROM projects");
    assert!(err.to_string().contains("Expected folder or tag string after FROM"));
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = parse_expression("a = 1 OR b = 2 AND c = 3").unwrap();
    match expr {
        Expr::BinaryOp {
            op: BinOp::Or,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Equal, .. }));
            assert!(matches!(*right, Expr::BinaryOp { op: BinOp::And, .. }));
        }
        other => panic!("Expected OR at the root, got {:?}", other),
    }
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = parse_expression("(a OR b) AND c").unwrap();
    match expr {
        Expr::BinaryOp {
            op: BinOp::And,
            left,
            ..
        } => assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Or, .. })),
        other => panic!("Expected AND at the root, got {:?}", other),
    }
}

#[test]
fn test_boolean_chains_are_left_associative() {
    let expr = parse_expression("a AND b AND c").unwrap();
    assert_eq!(
        expr,
        Expr::binary(
            BinOp::And,
            Expr::binary(BinOp::And, Expr::field("a"), Expr::field("b")),
            Expr::field("c")
        )
    );
}

#[test]
fn test_literals_and_arrays() {
    let expr = parse_expression(r#"contains([1, 2.5, "x", true, null], value)"#).unwrap();
    assert_eq!(
        expr,
        Expr::call(
            "contains",
            vec![
                Expr::Array(vec![
                    Expr::literal(1i64),
                    Expr::literal(2.5),
                    Expr::literal("x"),
                    Expr::literal(true),
                    Expr::Literal(Value::Null),
                ]),
                Expr::field("value"),
            ]
        )
    );
}

#[test]
fn test_comparisons_do_not_chain() {
    let err = parse_expression("a < b < c").unwrap_err();
    assert!(err.to_string().contains("Unexpected '<'"));
}

#[test]
fn test_display_reparses() {
    for text in [
        "a = 1 OR b = 2 AND c = 3",
        "(a OR b) AND c",
        "a AND (b OR c)",
        r#"lower(title) != "x""#,
        "contains([1, 2], n)",
        "n > 0.00001",
        "n < 123456789012345678901.5",
    ] {
        let expr = parse_expression(text).unwrap();
        assert_eq!(parse_expression(&expr.to_string()).unwrap(), expr, "{}", text);
    }
}

#[test]
fn test_small_float_header() {
    let q = query("TABLE 0.00001");
    assert_eq!(q.fields[0].header(), "0.00001");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_duplicate_table_columns() {
    let err = parse_error("TABLE status, title AS \"status\"");
    assert_eq!(err.position(), Some((1, 15)));
    assert!(err.to_string().contains("Duplicate column 'status'"));

    assert!(parse("TABLE status, title AS \"state\"").is_ok());
}

#[test]
fn test_missing_query_type() {
    let err = parse_error("WHERE a = 1");
    assert_eq!(err.position(), Some((1, 1)));
    assert!(err.to_string().contains("Expected query type"));
}

#[test]
fn test_fields_only_for_table() {
    let err = parse_error("LIST title");
    assert!(err.to_string().contains("LIST queries do not take a field list"));
}

#[test]
fn test_dangling_comma() {
    let err = parse_error("TABLE title, FROM \"x\"");
    assert_eq!(err.position(), Some((1, 14)));
    assert!(err.to_string().contains("Dangling comma"));
}

#[test]
fn test_unbalanced_call() {
    let err = parse_error("LIST WHERE contains(tags, \"a\"");
    assert!(err.to_string().contains("Unbalanced parenthesis in call to contains()"));
}

#[test]
fn test_unbalanced_group() {
    let err = parse_error("LIST WHERE (a = 1");
    assert!(err.to_string().contains("Unbalanced parenthesis"));
}

#[test]
fn test_sort_without_field() {
    let err = parse_error("LIST SORT DESC");
    assert!(err.to_string().contains("Expected field name in SORT clause"));
    assert_eq!(err.position(), Some((1, 11)));
}

#[test]
fn test_limit_must_be_non_negative_integer() {
    for text in ["LIST LIMIT 2.5", "LIST LIMIT \"3\"", "LIST LIMIT"] {
        let err = parse_error(text);
        assert!(err.to_string().contains("LIMIT expects a non-negative integer"), "{}", text);
    }
}

#[test]
fn test_clause_order_is_enforced() {
    let err = parse_error("LIST SORT a WHERE b = 1");
    assert!(err.to_string().contains("clauses must appear in the order"));
}

#[test]
fn test_trailing_tokens() {
    let err = parse_error("LIST WHERE a = 1 b");
    assert!(err.to_string().contains("Unexpected identifier 'b'"));
}

#[test]
fn test_syntax_errors_surface_from_lexer() {
    assert!(matches!(
        parse("LIST WHERE a = \"x"),
        Err(dataview_lang::DataviewError::Syntax(_))
    ));
}
