use crate::{
    ast::{BinOp, Expr},
    error::ExecutionError,
    fields::FieldResolver,
    note::Note,
    value::Value,
};

/// Built-in functions and their arity.
pub const FUNCTIONS: [(&str, usize); 4] = [("contains", 2), ("length", 1), ("lower", 1), ("upper", 1)];

/// Evaluates expressions against a single note.
///
/// # Comparison rules
///
/// - `=` / `!=` use exact equality; integers and floats compare numerically,
///   any other cross-type pair is unequal
/// - `<` `>` `<=` `>=` yield `false` when either side is null or the two
///   sides are incomparable, never an error
/// - `AND` / `OR` coerce both operands with [`Value::is_truthy`]
///
/// # Examples
///
/// ```
/// use dataview_lang::{Evaluator, FieldResolver, Note, Value, parse_expression};
///
/// let resolver = FieldResolver::default();
/// let evaluator = Evaluator::new(&resolver);
/// let note = Note::new("A").with_frontmatter("status", "active");
///
/// let expr = parse_expression(r#"status = "active" AND missing > 5"#).unwrap();
/// assert_eq!(evaluator.evaluate(&expr, &note).unwrap(), Value::Boolean(false));
/// ```
pub struct Evaluator<'a> {
    resolver: &'a FieldResolver,
}

impl<'a> Evaluator<'a> {
    pub fn new(resolver: &'a FieldResolver) -> Self {
        Evaluator { resolver }
    }

    pub fn evaluate(&self, expr: &Expr, note: &Note) -> Result<Value, ExecutionError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Field(name) => {
                if name.is_empty() {
                    return Err(ExecutionError::EmptyFieldName);
                }
                Ok(self.resolver.resolve(note, name))
            }
            Expr::BinaryOp { op, left, right } => {
                let left_val = self.evaluate(left, note)?;
                let right_val = self.evaluate(right, note)?;
                Ok(apply_binop(*op, &left_val, &right_val))
            }
            Expr::FunctionCall { name, args } => {
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg, note))
                    .collect::<Result<Vec<_>, _>>()?;
                call_function(name, values)
            }
            Expr::Array(items) => items
                .iter()
                .map(|item| self.evaluate(item, note))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }

    /// Evaluate a condition and coerce it to a boolean.
    pub fn matches(&self, expr: &Expr, note: &Note) -> Result<bool, ExecutionError> {
        Ok(self.evaluate(expr, note)?.is_truthy())
    }
}

fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Value {
    use std::cmp::Ordering::*;

    let result = match op {
        BinOp::Equal => left.loose_eq(right),
        BinOp::NotEqual => !left.loose_eq(right),
        BinOp::LessThan => left.compare(right) == Some(Less),
        BinOp::GreaterThan => left.compare(right) == Some(Greater),
        BinOp::LessEqual => matches!(left.compare(right), Some(Less | Equal)),
        BinOp::GreaterEqual => matches!(left.compare(right), Some(Greater | Equal)),
        BinOp::And => left.is_truthy() && right.is_truthy(),
        BinOp::Or => left.is_truthy() || right.is_truthy(),
    };
    Value::Boolean(result)
}

fn call_function(name: &str, mut args: Vec<Value>) -> Result<Value, ExecutionError> {
    let lowered = name.to_ascii_lowercase();
    let (canonical, arity) = FUNCTIONS
        .iter()
        .find(|(f, _)| *f == lowered)
        .copied()
        .ok_or_else(|| ExecutionError::UnknownFunction(name.to_string()))?;

    if args.len() != arity {
        return Err(ExecutionError::ArgumentCount {
            name: canonical.to_string(),
            expected: arity,
            actual: args.len(),
        });
    }

    let value = match canonical {
        "contains" => {
            let needle = args.pop().unwrap_or(Value::Null);
            let haystack = args.pop().unwrap_or(Value::Null);
            function_contains(&haystack, &needle)
        }
        "length" => function_length(&args[0]),
        "lower" => function_case(args.swap_remove(0), str::to_lowercase),
        "upper" => function_case(args.swap_remove(0), str::to_uppercase),
        other => return Err(ExecutionError::UnknownFunction(other.to_string())),
    };
    Ok(value)
}

/// contains(collection, value) - membership for arrays, substring for text, false otherwise
fn function_contains(haystack: &Value, needle: &Value) -> Value {
    let found = match (haystack, needle) {
        (Value::Array(items), needle) => items.iter().any(|item| item.loose_eq(needle)),
        (Value::String(text), Value::String(part)) => text.contains(part.as_str()),
        _ => false,
    };
    Value::Boolean(found)
}

/// length(x) - element count for arrays, character count for text, 0 otherwise
fn function_length(value: &Value) -> Value {
    let len = match value {
        Value::Array(items) => items.len(),
        Value::String(text) => text.chars().count(),
        _ => 0,
    };
    Value::Integer(i64::try_from(len).unwrap_or(i64::MAX))
}

/// lower(x) / upper(x) - non-text input is returned unchanged
fn function_case(value: Value, transform: fn(&str) -> String) -> Value {
    match value {
        Value::String(text) => Value::String(transform(&text)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &Expr, note: &Note) -> Result<Value, ExecutionError> {
        let resolver = FieldResolver::default();
        Evaluator::new(&resolver).evaluate(expr, note)
    }

    #[test]
    fn empty_field_name_is_an_error() {
        assert_eq!(
            eval(&Expr::field(""), &Note::new("n")),
            Err(ExecutionError::EmptyFieldName)
        );
    }

    #[test]
    fn function_names_ignore_case() {
        let expr = Expr::call("UPPER", vec![Expr::literal("abc")]);
        assert_eq!(eval(&expr, &Note::new("n")), Ok(Value::from("ABC")));
    }

    #[test]
    fn arity_is_checked() {
        let expr = Expr::call("length", vec![]);
        assert_eq!(
            eval(&expr, &Note::new("n")),
            Err(ExecutionError::ArgumentCount {
                name: "length".into(),
                expected: 1,
                actual: 0
            })
        );
    }
}
