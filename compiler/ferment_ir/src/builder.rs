//! Programmatic AST construction.
//!
//! `AstBuilder` lets front ends and tests assemble a [`Module`] without
//! going through source text. Expression methods take `&self` so calls can
//! nest: `b.binary(BinaryOp::Add, b.var("x"), b.int(1))`.

use std::cell::RefCell;

use crate::ast::{
    AssignTarget, BinaryOp, Block, CatchClause, Expr, ExprKind, FieldDef, Function, Module, Param,
    ParsedType, Stmt, StmtKind, StructDef, UnaryOp,
};
use crate::{ExprArena, ExprId, Name, Span, StringInterner};

/// Builder for modules and their expression arena.
pub struct AstBuilder<'a> {
    interner: &'a StringInterner,
    arena: RefCell<ExprArena>,
    module: RefCell<Module>,
    span: Span,
}

impl<'a> AstBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        AstBuilder {
            interner,
            arena: RefCell::new(ExprArena::new()),
            module: RefCell::new(Module::new()),
            span: Span::DUMMY,
        }
    }

    /// Set the span attached to nodes built from now on.
    pub fn at(&mut self, span: Span) -> &mut Self {
        self.span = span;
        self
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Parse a type keyword; anything that is not a primitive names a struct.
    pub fn ty(&self, s: &str) -> ParsedType {
        match s {
            "int" => ParsedType::Int,
            "bool" => ParsedType::Bool,
            "string" => ParsedType::Str,
            "void" => ParsedType::Void,
            other => ParsedType::Named(self.name(other)),
        }
    }

    fn expr(&self, kind: ExprKind) -> ExprId {
        self.arena.borrow_mut().alloc_expr(Expr::new(kind, self.span))
    }

    // Expressions

    pub fn int(&self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value))
    }

    pub fn bool(&self, value: bool) -> ExprId {
        self.expr(ExprKind::Bool(value))
    }

    pub fn str(&self, value: &str) -> ExprId {
        self.expr(ExprKind::Str(self.name(value)))
    }

    pub fn nil(&self) -> ExprId {
        self.expr(ExprKind::Nil)
    }

    pub fn var(&self, name: &str) -> ExprId {
        self.expr(ExprKind::Ident(self.name(name)))
    }

    pub fn field(&self, receiver: ExprId, field: &str) -> ExprId {
        self.expr(ExprKind::Field {
            receiver,
            field: self.name(field),
        })
    }

    /// `a.b.c` as a chain of field accesses.
    pub fn path(&self, dotted: &str) -> ExprId {
        let mut parts = dotted.split('.');
        let root = parts.next().unwrap_or_default();
        parts.fold(self.var(root), |receiver, field| self.field(receiver, field))
    }

    pub fn unary(&self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    pub fn neg(&self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::Neg, operand)
    }

    pub fn not(&self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::Not, operand)
    }

    pub fn binary(&self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn call(&self, func: &str, args: &[ExprId]) -> ExprId {
        let args = self.arena.borrow_mut().alloc_expr_list(args);
        self.expr(ExprKind::Call {
            func: self.name(func),
            args,
        })
    }

    pub fn new_struct(&self, type_name: &str) -> ExprId {
        self.expr(ExprKind::New {
            type_name: self.name(type_name),
        })
    }

    // Statements

    fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt::new(kind, self.span)
    }

    pub fn var_def(&self, name: &str, ty: Option<&str>) -> Stmt {
        self.stmt(StmtKind::VarDef {
            name: self.name(name),
            ty: ty.map(|t| self.ty(t)),
        })
    }

    /// Assignment to a variable or, with dots, to a field path.
    pub fn assign(&self, target: &str, value: ExprId) -> Stmt {
        let mut parts = target.split('.');
        let root = self.name(parts.next().unwrap_or_default());
        let fields = parts.map(|f| self.name(f)).collect();
        self.stmt(StmtKind::Assign {
            target: AssignTarget { root, fields },
            value,
        })
    }

    pub fn call_stmt(&self, func: &str, args: &[ExprId]) -> Stmt {
        let args = self.arena.borrow_mut().alloc_expr_list(args);
        self.stmt(StmtKind::Call {
            func: self.name(func),
            args,
        })
    }

    pub fn print(&self, args: &[ExprId]) -> Stmt {
        self.call_stmt("print", args)
    }

    pub fn if_stmt(&self, cond: ExprId, then_branch: Block, else_branch: Option<Block>) -> Stmt {
        self.stmt(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn for_stmt(&self, init: Stmt, cond: ExprId, update: Stmt, body: Block) -> Stmt {
        self.stmt(StmtKind::For {
            init: Box::new(init),
            cond,
            update: Box::new(update),
            body,
        })
    }

    pub fn catch(&self, tag: &str, body: Block) -> CatchClause {
        CatchClause {
            tag: self.name(tag),
            body,
            span: self.span,
        }
    }

    pub fn try_stmt(&self, body: Block, catches: Vec<CatchClause>) -> Stmt {
        self.stmt(StmtKind::Try { body, catches })
    }

    pub fn raise(&self, tag: ExprId) -> Stmt {
        self.stmt(StmtKind::Raise(tag))
    }

    pub fn ret(&self, value: ExprId) -> Stmt {
        self.stmt(StmtKind::Return(Some(value)))
    }

    pub fn ret_void(&self) -> Stmt {
        self.stmt(StmtKind::Return(None))
    }

    // Items

    /// Add a function; `params` pairs a name with an optional type keyword.
    pub fn function(
        &self,
        name: &str,
        params: &[(&str, Option<&str>)],
        return_type: Option<&str>,
        body: Block,
    ) {
        let params = params
            .iter()
            .map(|(param, ty)| Param {
                name: self.name(param),
                ty: ty.map(|t| self.ty(t)),
                span: self.span,
            })
            .collect();
        let function = Function {
            name: self.name(name),
            params,
            return_type: return_type.map(|t| self.ty(t)),
            body,
            span: self.span,
        };
        self.module.borrow_mut().functions.push(function);
    }

    /// Add `func main() { body }`.
    pub fn main(&self, body: Block) {
        self.function("main", &[], None, body);
    }

    pub fn struct_def(&self, name: &str, fields: &[(&str, &str)]) {
        let fields = fields
            .iter()
            .map(|(field, ty)| FieldDef {
                name: self.name(field),
                ty: self.ty(ty),
                span: self.span,
            })
            .collect();
        let def = StructDef {
            name: self.name(name),
            fields,
            span: self.span,
        };
        self.module.borrow_mut().structs.push(def);
    }

    /// Consume the builder, yielding the module and its arena.
    pub fn finish(self) -> (Module, ExprArena) {
        (self.module.into_inner(), self.arena.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_expressions() {
        let interner = StringInterner::new();
        let b = AstBuilder::new(&interner);
        let sum = b.binary(BinaryOp::Add, b.var("x"), b.int(1));
        b.main(vec![b.print(&[sum])]);
        let (module, arena) = b.finish();

        assert_eq!(module.functions.len(), 1);
        match arena.kind(sum) {
            ExprKind::Binary { op, left, right } => {
                assert_eq!(op, BinaryOp::Add);
                assert_eq!(arena.kind(left), ExprKind::Ident(interner.intern("x")));
                assert_eq!(arena.kind(right), ExprKind::Int(1));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_dotted_assign_target() {
        let interner = StringInterner::new();
        let b = AstBuilder::new(&interner);
        let stmt = b.assign("a.b.c", b.int(3));
        match stmt.kind {
            StmtKind::Assign { target, .. } => {
                assert_eq!(interner.lookup(target.root), "a");
                let fields: Vec<_> = target.fields.iter().map(|f| interner.lookup(*f)).collect();
                assert_eq!(fields, vec!["b", "c"]);
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_type_keywords() {
        let interner = StringInterner::new();
        let b = AstBuilder::new(&interner);
        assert_eq!(b.ty("int"), ParsedType::Int);
        assert_eq!(b.ty("void"), ParsedType::Void);
        assert_eq!(b.ty("node"), ParsedType::Named(interner.intern("node")));
    }

    #[test]
    fn test_spans_follow_at() {
        let interner = StringInterner::new();
        let mut b = AstBuilder::new(&interner);
        b.at(Span::new(10, 14));
        let lit = b.int(7);
        let (_, arena) = b.finish();
        assert_eq!(arena.span(lit), Span::new(10, 14));
    }
}
