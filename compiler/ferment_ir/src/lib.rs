//! Ferment IR: names, spans and the syntax tree the evaluator consumes.
//!
//! - [`Name`] and [`StringInterner`]: interned identifiers and string literals
//! - [`Span`]: byte-offset source locations
//! - [`ExprArena`] / [`ExprId`]: flat expression storage
//! - [`ast`]: expression, statement and item nodes
//! - [`AstBuilder`]: programmatic construction for front ends and tests

mod arena;
pub mod ast;
mod builder;
mod expr_id;
mod interner;
mod name;
mod span;

pub use arena::ExprArena;
pub use ast::{
    AssignTarget, BinaryOp, Block, CatchClause, Expr, ExprKind, FieldDef, Function, Module, Param,
    ParsedType, Stmt, StmtKind, StructDef, UnaryOp,
};
pub use builder::AstBuilder;
pub use expr_id::{ExprId, ExprRange};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
