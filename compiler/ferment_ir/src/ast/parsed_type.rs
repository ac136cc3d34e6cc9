//! Type annotations as written in source.

use crate::Name;

/// A type annotation on a variable, parameter, field or return type.
///
/// `Named` is resolved against the struct registry at run time; an unknown
/// name is reported where the annotation is used.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParsedType {
    Int,
    Bool,
    Str,
    Void,
    Named(Name),
}

impl ParsedType {
    pub const fn is_void(self) -> bool {
        matches!(self, ParsedType::Void)
    }
}
