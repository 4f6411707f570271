use std::mem;

use crate::{
    ast::{BinOp, Direction, Expr, Query, QueryType, SortClause, Source, TableField, Token, TokenKind},
    error::{ParseError, SyntaxError},
    value::Value,
};

/// Recursive-descent parser over a token stream.
///
/// ```text
/// query        := queryType [fieldList] [FROM source] [WHERE orExpr]
///                 [GROUP BY field] [FLATTEN] [SORT sortKey (',' sortKey)*] [LIMIT int]
/// fieldList    := orExpr [AS alias] (',' orExpr [AS alias])*      ; TABLE only
/// source       := sourceAnd ('OR' sourceAnd)*
/// sourceAnd    := sourceAtom ('AND' sourceAtom)*
/// sourceAtom   := string | '(' source ')'
/// orExpr       := andExpr ('OR' andExpr)*
/// andExpr      := compareExpr ('AND' compareExpr)*
/// compareExpr  := primary [compareOp primary]
/// primary      := literal | field | call | array | '(' orExpr ')'
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.text.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Parser {
            tokens,
            position: 0,
        }
    }

    fn current(&self) -> &Token {
        // `new` guarantees a trailing Eof and `advance` never moves past it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current().kind) == mem::discriminant(kind)
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        let token = self.current();
        SyntaxError::new(message, token.line, token.column)
    }

    fn expect(&mut self, expected: TokenKind, message: &str) -> Result<Token, SyntaxError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("{}, found {}", message, self.current().kind)))
        }
    }

    /// Parse a complete query and require the input to end afterwards.
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        let query_type = match self.current().kind {
            TokenKind::Table => QueryType::Table,
            TokenKind::List => QueryType::List,
            TokenKind::Task => QueryType::Task,
            TokenKind::Calendar => QueryType::Calendar,
            ref other => {
                return Err(self
                    .error_here(format!(
                        "Expected query type (TABLE, LIST, TASK or CALENDAR), found {}",
                        other
                    ))
                    .into());
            }
        };
        self.advance();

        let mut query = Query::new(query_type);

        if starts_expression(&self.current().kind) {
            if query_type != QueryType::Table {
                return Err(self
                    .error_here(format!("{} queries do not take a field list", query_type))
                    .into());
            }
            query.fields = self.parse_field_list()?;
        }

        if self.check(&TokenKind::From) {
            self.advance();
            query.from_source = Some(self.parse_source()?);
        }

        if self.check(&TokenKind::Where) {
            self.advance();
            query.where_clause = Some(self.parse_expression()?);
        }

        if self.check(&TokenKind::Group) {
            self.advance();
            self.expect(TokenKind::By, "Expected BY after GROUP")?;
            query.group_by = Some(self.parse_field_name("Expected field name after GROUP BY")?);
        }

        if self.check(&TokenKind::Flatten) {
            self.advance();
            query.flatten = true;
        }

        if self.check(&TokenKind::Sort) {
            self.advance();
            query.sort = self.parse_sort_clauses()?;
        }

        if self.check(&TokenKind::Limit) {
            self.advance();
            query.limit = Some(self.parse_limit()?);
        }

        self.expect_end()?;
        Ok(query)
    }

    fn expect_end(&self) -> Result<(), SyntaxError> {
        let kind = &self.current().kind;
        match kind {
            TokenKind::Eof => Ok(()),
            TokenKind::From
            | TokenKind::Where
            | TokenKind::Group
            | TokenKind::Flatten
            | TokenKind::Sort
            | TokenKind::Limit => Err(self.error_here(format!(
                "Unexpected {}; clauses must appear in the order FROM, WHERE, GROUP BY, FLATTEN, SORT, LIMIT",
                kind
            ))),
            other => Err(self.error_here(format!("Unexpected {}", other))),
        }
    }

    fn parse_field_list(&mut self) -> Result<Vec<TableField>, ParseError> {
        let mut fields = vec![self.parse_table_field()?];

        while self.check(&TokenKind::Comma) {
            self.advance();
            if !starts_expression(&self.current().kind) {
                return Err(self
                    .error_here("Dangling comma in TABLE field list")
                    .into());
            }
            let (line, column) = (self.current().line, self.current().column);
            let field = self.parse_table_field()?;
            let header = field.header();
            if fields.iter().any(|f| f.header() == header) {
                return Err(SyntaxError::new(duplicate_column(&header), line, column).into());
            }
            fields.push(field);
        }
        Ok(fields)
    }

    fn parse_table_field(&mut self) -> Result<TableField, ParseError> {
        let expression = self.parse_expression()?;
        let alias = if self.check(&TokenKind::As) {
            self.advance();
            match &self.current().kind {
                TokenKind::String(alias) | TokenKind::Identifier(alias) => {
                    let alias = alias.clone();
                    self.advance();
                    Some(alias)
                }
                other => {
                    return Err(self
                        .error_here(format!("Expected alias after AS, found {}", other))
                        .into());
                }
            }
        } else {
            None
        };
        Ok(TableField { expression, alias })
    }

    fn parse_source(&mut self) -> Result<Source, ParseError> {
        let mut left = self.parse_source_and()?;
        while self.check(&TokenKind::Or) {
            self.advance();
            let right = self.parse_source_and()?;
            left = Source::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_source_and(&mut self) -> Result<Source, ParseError> {
        let mut left = self.parse_source_atom()?;
        while self.check(&TokenKind::And) {
            self.advance();
            let right = self.parse_source_atom()?;
            left = Source::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_source_atom(&mut self) -> Result<Source, ParseError> {
        match &self.current().kind {
            TokenKind::String(text) => {
                let source = Source::from_literal(text);
                self.advance();
                Ok(source)
            }
            TokenKind::LParen => {
                self.advance();
                let source = self.parse_source()?;
                self.expect(TokenKind::RParen, "Unbalanced parenthesis in FROM clause")?;
                Ok(source)
            }
            other => Err(self
                .error_here(format!(
                    "Expected folder or tag string after FROM, found {}",
                    other
                ))
                .into()),
        }
    }

    fn parse_field_name(&mut self, message: &str) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.error_here(format!("{}, found {}", message, other)).into()),
        }
    }

    fn parse_sort_clauses(&mut self) -> Result<Vec<SortClause>, ParseError> {
        let mut clauses = Vec::new();
        loop {
            let field = self.parse_field_name("Expected field name in SORT clause")?;
            let direction = match self.current().kind {
                TokenKind::Asc => {
                    self.advance();
                    Direction::Asc
                }
                TokenKind::Desc => {
                    self.advance();
                    Direction::Desc
                }
                _ => Direction::Asc,
            };
            clauses.push(SortClause { field, direction });

            if !self.check(&TokenKind::Comma) {
                return Ok(clauses);
            }
            self.advance();
        }
    }

    fn parse_limit(&mut self) -> Result<usize, ParseError> {
        match self.current().kind {
            TokenKind::Integer(n) if n >= 0 => {
                let limit = usize::try_from(n)
                    .map_err(|_| self.error_here("LIMIT value is too large"))?;
                self.advance();
                Ok(limit)
            }
            ref other => Err(self
                .error_here(format!(
                    "LIMIT expects a non-negative integer, found {}",
                    other
                ))
                .into()),
        }
    }

    /// Parse a boolean/comparison expression (lowest precedence: OR).
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse a standalone expression and require the input to end afterwards.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.check(&TokenKind::Eof) {
            return Err(self
                .error_here(format!("Unexpected {}", self.current().kind))
                .into());
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        while self.check(&TokenKind::And) {
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_primary()?;

        let op = match self.current().kind {
            TokenKind::Eq => BinOp::Equal,
            TokenKind::NotEq => BinOp::NotEqual,
            TokenKind::Lt => BinOp::LessThan,
            TokenKind::Gt => BinOp::GreaterThan,
            TokenKind::LtEq => BinOp::LessEqual,
            TokenKind::GtEq => BinOp::GreaterEqual,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_primary()?;
        Ok(Expr::binary(op, left, right))
    }

    /// Parse primary expressions (atoms): literals, fields, calls, arrays, groups
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::String(s) => Ok(Expr::Literal(Value::String(s))),
            TokenKind::Integer(n) => Ok(Expr::Literal(Value::Integer(n))),
            TokenKind::Float(n) => Ok(Expr::Literal(Value::Float(n))),
            TokenKind::Boolean(b) => Ok(Expr::Literal(Value::Boolean(b))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::Identifier(name) => {
                if self.check(&TokenKind::LParen) {
                    self.advance();
                    let args = self.parse_arguments(TokenKind::RParen)?;
                    self.expect(
                        TokenKind::RParen,
                        &format!("Unbalanced parenthesis in call to {}()", name),
                    )?;
                    Ok(Expr::FunctionCall { name, args })
                } else {
                    Ok(Expr::Field(name))
                }
            }
            TokenKind::LParen => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "Unbalanced parenthesis, expected ')'")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                let items = self.parse_arguments(TokenKind::RBracket)?;
                self.expect(TokenKind::RBracket, "Expected ']' to close array")?;
                Ok(Expr::Array(items))
            }
            other => Err(SyntaxError::new(
                format!("Expected expression, found {}", other),
                token.line,
                token.column,
            )
            .into()),
        }
    }

    /// Comma-separated expressions up to (not including) `close`.
    fn parse_arguments(&mut self, close: TokenKind) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![];
        if self.check(&close) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.check(&TokenKind::Comma) {
                return Ok(args);
            }
            self.advance();
        }
    }
}

fn starts_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier(_)
            | TokenKind::String(_)
            | TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::Boolean(_)
            | TokenKind::Null
            | TokenKind::LParen
            | TokenKind::LBracket
    )
}

fn duplicate_column(header: &str) -> String {
    format!("Duplicate column '{}' in TABLE field list; use AS to rename it", header)
}

/// Structural checks for queries that did not come from the parser.
pub fn validate(query: &Query) -> Result<(), ParseError> {
    if query.query_type != QueryType::Table && !query.fields.is_empty() {
        return Err(ParseError::Grammar(format!(
            "{} queries do not take a field list",
            query.query_type
        )));
    }
    let headers: Vec<String> = query.fields.iter().map(TableField::header).collect();
    if let Some(header) = headers
        .iter()
        .enumerate()
        .find_map(|(i, header)| headers[..i].contains(header).then_some(header))
    {
        return Err(ParseError::Grammar(duplicate_column(header)));
    }
    Ok(())
}

/// Parse a token stream into a query.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Query, ParseError> {
    Parser::new(tokens).parse_query()
}
