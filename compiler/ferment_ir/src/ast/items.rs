//! Top-level items: functions, structs and the module that owns them.

use super::{Block, ParsedType};
use crate::{Name, Span};

/// Function parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: Option<ParsedType>,
    pub span: Span,
}

/// Function definition.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Function {
    pub name: Name,
    pub params: Vec<Param>,
    /// `None` when no return type was written.
    pub return_type: Option<ParsedType>,
    pub body: Block,
    pub span: Span,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Struct field declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDef {
    pub name: Name,
    pub ty: ParsedType,
    pub span: Span,
}

/// `struct name { fields }`
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct StructDef {
    pub name: Name,
    pub fields: Vec<FieldDef>,
    pub span: Span,
}

/// A parsed program.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Module {
    pub structs: Vec<StructDef>,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }
}
