//! Struct instances and references to them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ferment_ir::Name;

use super::Value;

/// Field storage of one struct instance.
///
/// Fields are stored in declaration order; the registry's layout maps
/// field names to indices. Stored values are always forced.
#[derive(Debug)]
pub struct StructInstance {
    fields: Vec<Value>,
}

/// Shared handle to a struct instance.
///
/// Cloning the handle aliases the instance; writes through one clone are
/// visible through all of them.
#[derive(Clone)]
pub struct StructHandle(Rc<RefCell<StructInstance>>);

impl StructHandle {
    fn new(fields: Vec<Value>) -> Self {
        StructHandle(Rc::new(RefCell::new(StructInstance { fields })))
    }

    /// Read the field at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().fields.get(index).cloned()
    }

    /// Overwrite the field at `index`. Returns `false` if out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.borrow_mut().fields.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn ptr_eq(&self, other: &StructHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A value of struct type: either nil or a handle to an instance.
#[derive(Clone)]
pub struct StructRef {
    type_name: Name,
    handle: Option<StructHandle>,
}

impl StructRef {
    /// An uninitialized reference of the given struct type.
    pub fn nil(type_name: Name) -> Self {
        StructRef {
            type_name,
            handle: None,
        }
    }

    /// A reference to a fresh instance with the given initial fields.
    pub fn instantiate(type_name: Name, fields: Vec<Value>) -> Self {
        StructRef {
            type_name,
            handle: Some(StructHandle::new(fields)),
        }
    }

    #[inline]
    pub fn type_name(&self) -> Name {
        self.type_name
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.handle.is_none()
    }

    pub fn handle(&self) -> Option<&StructHandle> {
        self.handle.as_ref()
    }

    /// Identity comparison. Two nil references are the same reference.
    pub fn same_ref(&self, other: &StructRef) -> bool {
        match (&self.handle, &other.handle) {
            (None, None) => true,
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// Instances may be self-referential, so Debug never descends into fields.
impl fmt::Debug for StructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.handle {
            None => write!(f, "StructRef({:?}, nil)", self.type_name),
            Some(handle) => write!(
                f,
                "StructRef({:?}, {:p})",
                self.type_name,
                Rc::as_ptr(&handle.0)
            ),
        }
    }
}
