//! Composite value payloads: functions, objects, exceptions, singleton wrappers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::{Heap, Value};
use crate::class::ClassRef;
use crate::environment::Environment;
use crate::errors::EvalResult;
use crate::method::{CallContext, Visibility};

/// Opaque handle to an interpreted body.
///
/// Minted by the evaluator, which owns the AST. The object core only stores
/// it and hands it back through `CallContext::eval`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(u32);

impl BodyId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        BodyId(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// A user-defined function: parameters, body and its definition environment.
#[derive(Clone)]
pub struct FunctionValue {
    params: Rc<[String]>,
    body: BodyId,
    env: Environment,
    visibility: Visibility,
}

impl FunctionValue {
    /// Public function closing over `env`.
    pub fn new(params: Vec<String>, body: BodyId, env: Environment) -> Self {
        FunctionValue {
            params: params.into(),
            body,
            env,
            visibility: Visibility::Public,
        }
    }

    /// Same function with a different visibility (e.g. defined under `private`).
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Environment captured at definition time.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Fresh environment enclosing the captured one, with each parameter
    /// bound positionally to `args`.
    ///
    /// Callers check arity first; extra arguments are ignored and missing
    /// ones are left unbound.
    pub fn bind_arguments(&self, args: &[Value]) -> Environment {
        let env = Environment::enclosed(&self.env);
        for (param, arg) in self.params.iter().zip(args) {
            env.define(param.clone(), arg.clone());
        }
        env
    }

    pub fn ptr_eq(&self, other: &FunctionValue) -> bool {
        Rc::ptr_eq(&self.params, &other.params) && self.body == other.body
    }

    pub(super) fn inspect(&self) -> String {
        format!("fn({})", self.params.join(", "))
    }
}

// The captured environment can hold this very function, so Debug stays shallow.
impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// Signature of a free builtin function.
///
/// Not bound to a receiver; the context's receiver is the top-level `self`.
pub type BuiltinFn = fn(&mut dyn CallContext, &[Value]) -> EvalResult;

/// A natively implemented free function.
#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    name: &'static str,
    func: BuiltinFn,
}

impl BuiltinFunction {
    pub fn new(name: &'static str, func: BuiltinFn) -> Self {
        BuiltinFunction { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
        (self.func)(ctx, args)
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFunction({})", self.name)
    }
}

/// An instance of a class, with identity and instance variables.
#[derive(Clone)]
pub struct ObjectValue(Rc<ObjectData>);

struct ObjectData {
    class: ClassRef,
    /// Eigenclass, once the object has been extended through any handle.
    singleton: RefCell<Option<ClassRef>>,
    ivars: RefCell<FxHashMap<String, Value>>,
}

impl ObjectValue {
    pub(super) fn new(class: ClassRef) -> Self {
        ObjectValue(Rc::new(ObjectData {
            class,
            singleton: RefCell::new(None),
            ivars: RefCell::new(FxHashMap::default()),
        }))
    }

    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    pub fn singleton(&self) -> Option<ClassRef> {
        self.0.singleton.borrow().clone()
    }

    pub(crate) fn attach_singleton(&self, eigenclass: ClassRef) {
        *self.0.singleton.borrow_mut() = Some(eigenclass);
    }

    /// Read an instance variable (`@name` without the sigil).
    pub fn ivar(&self, name: &str) -> Option<Value> {
        self.0.ivars.borrow().get(name).cloned()
    }

    /// Set an instance variable; visible through every handle to this object.
    pub fn set_ivar(&self, name: impl Into<String>, value: Value) {
        self.0.ivars.borrow_mut().insert(name.into(), value);
    }

    pub fn ptr_eq(&self, other: &ObjectValue) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}>", self.0.class.name())
    }
}

/// An exception object: its class and message.
#[derive(Clone, Debug)]
pub struct ExceptionValue {
    class: ClassRef,
    message: String,
}

impl ExceptionValue {
    pub(super) fn new(class: ClassRef, message: String) -> Self {
        ExceptionValue { class, message }
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// An object paired with its eigenclass.
///
/// Owns the eigenclass; the wrapped value is shared, not copied. Cloning the
/// wrapper shares the eigenclass, so methods added later are visible through
/// every clone.
#[derive(Clone, Debug)]
pub struct ExtendedObject {
    inner: Heap<Value>,
    eigenclass: ClassRef,
}

impl ExtendedObject {
    pub(super) fn new(inner: Value, eigenclass: ClassRef) -> Self {
        ExtendedObject {
            inner: Heap::new(inner),
            eigenclass,
        }
    }

    /// The object as it was before singularization.
    pub fn inner(&self) -> &Value {
        &self.inner
    }

    pub fn eigenclass(&self) -> &ClassRef {
        &self.eigenclass
    }
}
