//! Expression nodes.
//!
//! Children are referenced by [`ExprId`] into the owning [`ExprArena`](crate::ExprArena),
//! so `ExprKind` is `Copy`.

use super::{BinaryOp, UnaryOp};
use crate::{ExprId, ExprRange, Name, Span};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Bool(bool),
    /// String literal (interned).
    Str(Name),
    /// `nil`
    Nil,
    /// Variable reference.
    Ident(Name),
    /// Field access: `receiver.field`
    Field { receiver: ExprId, field: Name },
    Unary { op: UnaryOp, operand: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// Call of a named function (user-defined or built-in).
    Call { func: Name, args: ExprRange },
    /// `new T`
    New { type_name: Name },
}

impl ExprKind {
    /// Whether this is a literal whose value needs no environment.
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            ExprKind::Int(_) | ExprKind::Bool(_) | ExprKind::Str(_) | ExprKind::Nil
        )
    }
}
