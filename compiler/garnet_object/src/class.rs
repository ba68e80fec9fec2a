//! Classes, modules and eigenclasses.
//!
//! All three share one representation: a name, a kind, an optional
//! superclass fixed at construction and a mutable method table. Because the
//! superclass link can only point at a class that already exists, chains are
//! acyclic by construction.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::method::{Method, Visibility};

/// Method name to method, one table per class.
pub type MethodTable = FxHashMap<String, Method>;

/// What a [`Class`] stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Module,
    /// Singleton class of exactly one object.
    Eigenclass,
}

/// A method table plus a link to the next class in the resolution chain.
pub struct Class {
    name: String,
    kind: ClassKind,
    superclass: Option<ClassRef>,
    methods: RefCell<MethodTable>,
    /// Eigenclass of the class object itself (`def self.name`).
    singleton: RefCell<Option<ClassRef>>,
}

impl Class {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Next class in the chain. `None` terminates resolution.
    pub fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }

    /// Borrow the own method table. Do not hold across a method call.
    pub fn methods(&self) -> Ref<'_, MethodTable> {
        self.methods.borrow()
    }

    /// Method defined directly on this class, ignoring the chain.
    pub fn lookup_own(&self, name: &str) -> Option<Method> {
        self.methods.borrow().get(name).cloned()
    }

    /// Insert or replace `name`. Visible immediately to every holder.
    pub fn define_method(&self, name: impl Into<String>, method: Method) {
        let name = name.into();
        tracing::trace!(class = %self.name, method = %name, "define method");
        self.methods.borrow_mut().insert(name, method);
    }

    /// Own public method names, sorted.
    pub fn public_method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .methods
            .borrow()
            .iter()
            .filter(|(_, m)| m.visibility() == Visibility::Public)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn is_module(&self) -> bool {
        self.kind == ClassKind::Module
    }

    pub fn is_eigenclass(&self) -> bool {
        self.kind == ClassKind::Eigenclass
    }

    pub fn singleton(&self) -> Option<ClassRef> {
        self.singleton.borrow().clone()
    }

    pub(crate) fn attach_singleton(&self, eigenclass: ClassRef) {
        *self.singleton.borrow_mut() = Some(eigenclass);
    }
}

/// Shared handle to a [`Class`]. Equality is identity.
#[derive(Clone)]
pub struct ClassRef(Rc<Class>);

impl ClassRef {
    fn from_parts(name: String, kind: ClassKind, superclass: Option<ClassRef>) -> Self {
        ClassRef(Rc::new(Class {
            name,
            kind,
            superclass,
            methods: RefCell::new(MethodTable::default()),
            singleton: RefCell::new(None),
        }))
    }

    /// A class whose chain continues at `superclass`.
    pub fn new_class(name: impl Into<String>, superclass: Option<ClassRef>) -> Self {
        Self::from_parts(name.into(), ClassKind::Class, superclass)
    }

    /// A module. Modules never have a superclass link.
    pub fn new_module(name: impl Into<String>) -> Self {
        Self::from_parts(name.into(), ClassKind::Module, None)
    }

    /// Eigenclass for an object whose current class is `original`.
    pub(crate) fn new_eigenclass(attached: &str, original: ClassRef) -> Self {
        Self::from_parts(
            format!("#<Class:{attached}>"),
            ClassKind::Eigenclass,
            Some(original),
        )
    }

    /// The class this one stands in for when asked from user code: an
    /// eigenclass reports the class it was created over. Exactly one level
    /// is unwrapped.
    pub fn nominal(&self) -> ClassRef {
        match (self.kind, &self.superclass) {
            (ClassKind::Eigenclass, Some(original)) => original.clone(),
            _ => self.clone(),
        }
    }

    /// This class followed by each superclass, most specific first.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: Some(self.clone()),
        }
    }

    pub fn ptr_eq(&self, other: &ClassRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ClassRef {
    type Target = Class;

    fn deref(&self) -> &Class {
        &self.0
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ClassRef {}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.0.kind, self.0.name)
    }
}

/// Iterator over a resolution chain. See [`ClassRef::ancestors`].
pub struct Ancestors {
    next: Option<ClassRef>,
}

impl Iterator for Ancestors {
    type Item = ClassRef;

    fn next(&mut self) -> Option<ClassRef> {
        let current = self.next.take()?;
        self.next = current.superclass().cloned();
        Some(current)
    }
}
