use std::fmt;

use crate::{ast::BinOp, value::Value};

/// Abstract Syntax Tree node representing a parsed expression.
///
/// A closed set of variants: every consumer matches exhaustively, so adding a
/// node kind is checked at compile time everywhere it is handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String, number, boolean or null literal
    ///
    /// # Examples
    /// ```text
    /// "active"
    /// 42
    /// 3.5
    /// true
    /// null
    /// ```
    Literal(Value),

    /// Field reference, plain or dotted
    ///
    /// # Examples
    /// ```text
    /// status
    /// file.name
    /// ```
    Field(String),

    /// Binary operation (comparison or logical)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Call into the built-in function library
    ///
    /// # Examples
    /// ```text
    /// contains(tags, "urgent")
    /// lower(title)
    /// ```
    FunctionCall { name: String, args: Vec<Expr> },

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// ["active", "blocked"]
    /// ```
    Array(Vec<Expr>),
}

impl Expr {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn field(name: impl Into<String>) -> Self {
        Expr::Field(name.into())
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::FunctionCall {
            name: name.into(),
            args,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::BinaryOp { op, .. } => op.precedence(),
            _ => 4,
        }
    }
}

/// Renders the expression back to query syntax; the output reparses to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write_literal(f, value),
            Expr::Field(name) => f.write_str(name),
            Expr::BinaryOp { op, left, right } => {
                let prec = op.precedence();
                // Comparisons do not chain, so a nested comparison always needs parentheses
                let left_parens = left.precedence() < prec || (prec == 3 && left.precedence() == 3);
                let right_parens = right.precedence() <= prec;
                write_operand(f, left, left_parens)?;
                write!(f, " {} ", op)?;
                write_operand(f, right, right_parens)
            }
            Expr::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Integer(n) => write!(f, "{}", n),
        Value::Float(n) => write_float(f, *n),
        Value::String(s) => write_quoted(f, s),
        other => write_quoted(f, &other.as_string()),
    }
}

// Plain decimal notation; the lexer has no exponent syntax
fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let text = n.to_string();
    if !n.is_finite() || text.contains('.') {
        f.write_str(&text)
    } else {
        write!(f, "{}.0", text)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_precedence() {
        let expr = Expr::binary(
            BinOp::And,
            Expr::binary(
                BinOp::Or,
                Expr::binary(BinOp::Equal, Expr::field("a"), Expr::literal(1i64)),
                Expr::binary(BinOp::Equal, Expr::field("b"), Expr::literal(2i64)),
            ),
            Expr::call("contains", vec![Expr::field("tags"), Expr::literal("x")]),
        );
        assert_eq!(expr.to_string(), "(a = 1 OR b = 2) AND contains(tags, \"x\")");
    }

    #[test]
    fn display_writes_floats_without_exponent() {
        assert_eq!(Expr::literal(0.00001).to_string(), "0.00001");
        assert_eq!(Expr::literal(2.0).to_string(), "2.0");
        assert_eq!(Expr::literal(1e21).to_string(), "1000000000000000000000.0");
    }

    #[test]
    fn display_escapes_strings() {
        assert_eq!(Expr::literal("say \"hi\"").to_string(), r#""say \"hi\"""#);
    }
}
