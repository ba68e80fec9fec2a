//! Lexically nested variable scopes.
//!
//! An `Environment` is a handle to one scope; scopes link to their enclosing
//! scope, so a function's captured environment stays alive as long as any
//! closure over it does. Handles are cheap to clone and share the scope.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// A single-threaded shared cell for scope data.
///
/// All scope allocations go through `LocalScope::new()`. Not `Send`: the
/// runtime executes on one thread.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

/// Bindings of one scope plus the enclosing scope.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
    parent: Option<Environment>,
}

impl Scope {
    fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Overwrite `name` in the first scope that binds it.
    /// Hands the value back if no scope in the chain does.
    fn assign_existing(&mut self, name: &str, value: Value) -> Result<(), Value> {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.scope.borrow_mut().assign_existing(name, value),
            None => Err(value),
        }
    }
}

/// Handle to a scope chain.
#[derive(Clone, Default)]
pub struct Environment {
    scope: LocalScope<Scope>,
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl Environment {
    /// A root environment with no enclosing scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh scope whose lookups fall through to `outer`.
    pub fn enclosed(outer: &Environment) -> Self {
        Environment {
            scope: LocalScope::new(Scope {
                bindings: FxHashMap::default(),
                parent: Some(outer.clone()),
            }),
        }
    }

    /// Innermost binding of `name`, searching outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.scope.borrow().lookup(name)
    }

    /// Assign `name`: updates the innermost scope that already binds it,
    /// otherwise creates the binding in this scope.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let unbound = self.scope.borrow_mut().assign_existing(&name, value);
        if let Err(value) = unbound {
            self.define(name, value);
        }
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.scope.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Whether `name` is bound anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn outer(&self) -> Option<Environment> {
        self.scope.borrow().parent.clone()
    }

    /// Whether both handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope.0, &other.scope.0)
    }
}

// Bindings can refer back to this environment through closures; print names only.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<&str> = scope.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("enclosed", &scope.parent.is_some())
            .finish()
    }
}
