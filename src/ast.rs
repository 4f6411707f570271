//! # Dataview Query Language - Abstract Syntax Tree
//!
//! Pure data produced by the [`crate::parser`] and consumed by the
//! [`crate::evaluator`] and [`crate::executor`]. Nothing in this module has
//! behaviour beyond construction and display.
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, fields, operations, calls)
//! - **[operators]** - Binary operators (comparison and logical)
//! - **[query]** - Complete query structure and its clauses
//!
//! ## Quick Start
//!
//! ```text
//! TABLE title, status AS "State"
//! FROM "projects" AND "#active"
//! WHERE status != "done" AND contains(tags, "urgent")
//! SORT due ASC, title DESC
//! LIMIT 10
//! ```
//!
//! ## Query Shapes
//!
//! - **TABLE** - one column per field expression, optional `AS "alias"`
//! - **LIST** - one item per note, showing the configured display field
//! - **TASK** - every checkbox task of every matching note
//! - **CALENDAR** - notes bucketed by day
//!
//! Clauses always appear in the order FROM, WHERE, GROUP BY, FLATTEN, SORT, LIMIT.
pub mod expressions;
pub mod operators;
pub mod query;
pub mod tokens;

pub use expressions::Expr;
pub use operators::BinOp;
pub use query::{Direction, Query, QueryType, SortClause, Source, TableField};
pub use tokens::{Token, TokenKind};
