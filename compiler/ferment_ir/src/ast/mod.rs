//! AST node types.
//!
//! Expressions are flat (stored in an [`ExprArena`](crate::ExprArena) and
//! referenced by [`ExprId`](crate::ExprId)); statements and items are
//! owned trees.

mod expr;
mod items;
mod operators;
mod parsed_type;
mod stmt;

pub use expr::{Expr, ExprKind};
pub use items::{FieldDef, Function, Module, Param, StructDef};
pub use operators::{BinaryOp, UnaryOp};
pub use parsed_type::ParsedType;
pub use stmt::{AssignTarget, Block, CatchClause, Stmt, StmtKind};
