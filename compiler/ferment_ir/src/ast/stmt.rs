//! Statement nodes.
//!
//! Statements are owned trees; the expressions they contain live in the
//! module's [`ExprArena`](crate::ExprArena).

use super::ParsedType;
use crate::{ExprId, ExprRange, Name, Span};

/// A sequence of statements executed in one block scope.
pub type Block = Vec<Stmt>;

/// Statement node.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    /// Whether this statement may appear as a `for` loop's init or update.
    pub fn is_assignment(&self) -> bool {
        matches!(self.kind, StmtKind::Assign { .. })
    }
}

/// Left-hand side of an assignment: `root` or `root.f1.f2...`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AssignTarget {
    pub root: Name,
    /// Field path after the root; empty for a plain variable.
    pub fields: Vec<Name>,
}

impl AssignTarget {
    pub fn variable(root: Name) -> Self {
        AssignTarget {
            root,
            fields: Vec::new(),
        }
    }

    pub fn is_variable(&self) -> bool {
        self.fields.is_empty()
    }
}

/// `catch "tag" { ... }`
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CatchClause {
    pub tag: Name,
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum StmtKind {
    /// `var x;` or `var x: T;`
    VarDef { name: Name, ty: Option<ParsedType> },
    /// `target = value;`
    Assign { target: AssignTarget, value: ExprId },
    /// A call evaluated for its side effects.
    Call { func: Name, args: ExprRange },
    If {
        cond: ExprId,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    /// `for (init; cond; update) { body }`
    For {
        init: Box<Stmt>,
        cond: ExprId,
        update: Box<Stmt>,
        body: Block,
    },
    Try {
        body: Block,
        catches: Vec<CatchClause>,
    },
    /// `raise expr;`
    Raise(ExprId),
    /// `return;` or `return expr;`
    Return(Option<ExprId>),
}
