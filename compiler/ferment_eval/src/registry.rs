//! Function and struct registries.
//!
//! Built once per run from the parsed [`Module`] before `main` executes.
//! Building also validates what can be checked without running anything:
//! duplicate definitions, annotation types and `for` loop clauses.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use ferment_ir::{Block, Function, Module, Name, ParsedType, Stmt, StmtKind, StringInterner};

use crate::errors::{
    duplicate_field, duplicate_function, duplicate_struct, invalid_for_clause, invalid_type,
    EvalError,
};
use crate::types::Type;
use crate::value::StructRef;

/// Field layout of one struct type.
#[derive(Clone, Debug)]
pub struct StructLayout {
    name: Name,
    fields: Vec<(Name, Type)>,
    index: FxHashMap<Name, usize>,
}

impl StructLayout {
    /// Index and declared type of `field`.
    pub fn field(&self, field: Name) -> Option<(usize, Type)> {
        let index = *self.index.get(&field)?;
        self.fields.get(index).map(|(_, ty)| (index, *ty))
    }

    /// A fresh instance with every field at its type's default.
    pub fn instantiate(&self) -> StructRef {
        let fields = self.fields.iter().map(|(_, ty)| ty.default_value()).collect();
        StructRef::instantiate(self.name, fields)
    }
}

/// Struct name to layout.
#[derive(Debug, Default)]
pub struct StructRegistry {
    layouts: FxHashMap<Name, StructLayout>,
}

impl StructRegistry {
    /// Register every struct, then resolve field types.
    ///
    /// Names are collected first so fields may refer to their own struct
    /// or to structs defined later.
    pub fn build(module: &Module, interner: &StringInterner) -> Result<Self, EvalError> {
        let mut registry = StructRegistry::default();
        for def in &module.structs {
            if registry.layouts.contains_key(&def.name) {
                return Err(duplicate_struct(interner.lookup(def.name)).with_span(def.span));
            }
            registry.layouts.insert(
                def.name,
                StructLayout {
                    name: def.name,
                    fields: Vec::new(),
                    index: FxHashMap::default(),
                },
            );
        }

        for def in &module.structs {
            let mut fields = Vec::with_capacity(def.fields.len());
            let mut index = FxHashMap::default();
            for field in &def.fields {
                let ty = registry
                    .resolve_value_type(field.ty, interner)
                    .map_err(|e| e.with_span(field.span))?;
                if index.insert(field.name, fields.len()).is_some() {
                    return Err(duplicate_field(
                        interner.lookup(def.name),
                        interner.lookup(field.name),
                    )
                    .with_span(field.span));
                }
                fields.push((field.name, ty));
            }
            if let Some(layout) = registry.layouts.get_mut(&def.name) {
                layout.fields = fields;
                layout.index = index;
            }
        }

        tracing::debug!(count = registry.layouts.len(), "struct registry built");
        Ok(registry)
    }

    pub fn get(&self, name: Name) -> Option<&StructLayout> {
        self.layouts.get(&name)
    }

    /// Resolve an annotation, allowing `void` (return types).
    pub fn resolve(&self, ty: ParsedType, interner: &StringInterner) -> Result<Type, EvalError> {
        match ty {
            ParsedType::Int => Ok(Type::Int),
            ParsedType::Bool => Ok(Type::Bool),
            ParsedType::Str => Ok(Type::Str),
            ParsedType::Void => Ok(Type::Void),
            ParsedType::Named(name) if self.layouts.contains_key(&name) => Ok(Type::Struct(name)),
            ParsedType::Named(name) => Err(invalid_type(interner.lookup(name))),
        }
    }

    /// Resolve an annotation on something that holds a value (variable,
    /// parameter, field), where `void` is meaningless.
    pub fn resolve_value_type(
        &self,
        ty: ParsedType,
        interner: &StringInterner,
    ) -> Result<Type, EvalError> {
        match self.resolve(ty, interner)? {
            Type::Void => Err(invalid_type("void")),
            resolved => Ok(resolved),
        }
    }
}

/// A registered function with its annotations resolved.
#[derive(Debug)]
pub struct FunctionDef<'a> {
    pub decl: &'a Function,
    pub params: Vec<(Name, Option<Type>)>,
    pub return_type: Option<Type>,
}

impl FunctionDef<'_> {
    pub fn name(&self) -> Name {
        self.decl.name
    }

    pub fn body(&self) -> &Block {
        &self.decl.body
    }
}

/// `(name, arity)` to function.
#[derive(Debug, Default)]
pub struct FunctionRegistry<'a> {
    functions: FxHashMap<(Name, usize), Rc<FunctionDef<'a>>>,
}

impl<'a> FunctionRegistry<'a> {
    pub fn build(
        module: &'a Module,
        structs: &StructRegistry,
        interner: &StringInterner,
    ) -> Result<Self, EvalError> {
        let mut registry = FunctionRegistry::default();
        for decl in &module.functions {
            let key = (decl.name, decl.arity());
            if registry.functions.contains_key(&key) {
                return Err(duplicate_function(interner.lookup(decl.name), decl.arity())
                    .with_span(decl.span));
            }

            let mut params = Vec::with_capacity(decl.params.len());
            for param in &decl.params {
                let ty = param
                    .ty
                    .map(|ty| structs.resolve_value_type(ty, interner))
                    .transpose()
                    .map_err(|e| e.with_span(param.span))?;
                params.push((param.name, ty));
            }
            let return_type = decl
                .return_type
                .map(|ty| structs.resolve(ty, interner))
                .transpose()
                .map_err(|e| e.with_span(decl.span))?;

            validate_block(&decl.body)?;

            registry.functions.insert(
                key,
                Rc::new(FunctionDef {
                    decl,
                    params,
                    return_type,
                }),
            );
        }

        tracing::debug!(count = registry.functions.len(), "function registry built");
        Ok(registry)
    }

    pub fn lookup(&self, name: Name, arity: usize) -> Option<Rc<FunctionDef<'a>>> {
        self.functions.get(&(name, arity)).cloned()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Check that every `for` loop's init and update are assignments.
fn validate_block(block: &Block) -> Result<(), EvalError> {
    block.iter().try_for_each(validate_stmt)
}

fn validate_stmt(stmt: &Stmt) -> Result<(), EvalError> {
    match &stmt.kind {
        StmtKind::For {
            init, update, body, ..
        } => {
            if !init.is_assignment() {
                return Err(invalid_for_clause("initializer").with_span(init.span));
            }
            if !update.is_assignment() {
                return Err(invalid_for_clause("update").with_span(update.span));
            }
            validate_block(body)
        }
        StmtKind::If {
            then_branch,
            else_branch,
            ..
        } => {
            validate_block(then_branch)?;
            else_branch.as_ref().map_or(Ok(()), validate_block)
        }
        StmtKind::Try { body, catches } => {
            validate_block(body)?;
            catches.iter().try_for_each(|c| validate_block(&c.body))
        }
        StmtKind::VarDef { .. }
        | StmtKind::Assign { .. }
        | StmtKind::Call { .. }
        | StmtKind::Raise(_)
        | StmtKind::Return(_) => Ok(()),
    }
}
