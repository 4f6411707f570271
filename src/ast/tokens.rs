use std::fmt;

/// A lexical token with its source text and 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token (string literals include their quotes)
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Query types
    /// `TABLE`
    Table,
    /// `LIST`
    List,
    /// `TASK`
    Task,
    /// `CALENDAR`
    Calendar,

    // Clause keywords
    From,
    Where,
    Sort,
    Asc,
    Desc,
    Limit,
    Flatten,
    Group,
    By,
    /// `AS` in a TABLE field alias
    As,

    // Logical
    /// Logical AND (word, any case)
    ///
    /// # Examples
    /// ```text
    /// status = "active" AND priority > 2
    /// ```
    And,

    /// Logical OR (word, any case)
    Or,

    // Literals
    /// Field name, optionally dotted
    ///
    /// # Examples
    /// ```text
    /// status
    /// file.name
    /// project.owner
    /// ```
    Identifier(String),

    /// String literal enclosed in double or single quotes
    ///
    /// # Examples
    /// ```text
    /// "projects/2024"
    /// '#urgent'
    /// ```
    String(String),

    /// Integer
    Integer(i64),

    /// Floating point number
    Float(f64),

    /// `true` / `false`
    Boolean(bool),

    /// `null`
    Null,

    // Comparison
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,

    // Delimiters
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Keyword for a word, matched case-insensitively.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_uppercase().as_str() {
            "TABLE" => TokenKind::Table,
            "LIST" => TokenKind::List,
            "TASK" => TokenKind::Task,
            "CALENDAR" => TokenKind::Calendar,
            "FROM" => TokenKind::From,
            "WHERE" => TokenKind::Where,
            "SORT" => TokenKind::Sort,
            "ASC" => TokenKind::Asc,
            "DESC" => TokenKind::Desc,
            "LIMIT" => TokenKind::Limit,
            "FLATTEN" => TokenKind::Flatten,
            "GROUP" => TokenKind::Group,
            "BY" => TokenKind::By,
            "AS" => TokenKind::As,
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "TRUE" => TokenKind::Boolean(true),
            "FALSE" => TokenKind::Boolean(false),
            "NULL" => TokenKind::Null,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Table => write!(f, "TABLE"),
            TokenKind::List => write!(f, "LIST"),
            TokenKind::Task => write!(f, "TASK"),
            TokenKind::Calendar => write!(f, "CALENDAR"),
            TokenKind::From => write!(f, "FROM"),
            TokenKind::Where => write!(f, "WHERE"),
            TokenKind::Sort => write!(f, "SORT"),
            TokenKind::Asc => write!(f, "ASC"),
            TokenKind::Desc => write!(f, "DESC"),
            TokenKind::Limit => write!(f, "LIMIT"),
            TokenKind::Flatten => write!(f, "FLATTEN"),
            TokenKind::Group => write!(f, "GROUP"),
            TokenKind::By => write!(f, "BY"),
            TokenKind::As => write!(f, "AS"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::String(s) => write!(f, "string \"{}\"", s),
            TokenKind::Integer(n) => write!(f, "number {}", n),
            TokenKind::Float(n) => write!(f, "number {}", n),
            TokenKind::Boolean(b) => write!(f, "{}", b),
            TokenKind::Null => write!(f, "null"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
