//! Runtime values.
//!
//! `Value` is a closed tagged variant covering every value the runtime can
//! hand to user code, plus three internal pseudo-values (`Builtin`,
//! `ReturnValue`, `RequireStatement`) that the evaluator consumes before they
//! become visible.
//!
//! Heap-backed payloads go through [`Heap`], whose constructor is private to
//! this module: build values with the factory methods (`Value::string`,
//! `Value::object`, ...).

mod composite;
mod heap;

use std::fmt;

pub use composite::{
    BodyId, BuiltinFn, BuiltinFunction, ExceptionValue, ExtendedObject, FunctionValue,
    ObjectValue,
};
pub use heap::Heap;

use crate::class::{ClassKind, ClassRef};
use crate::class_table::CoreClasses;
use crate::environment::Environment;

/// Discriminant of a [`Value`], for diagnostics and builtin type errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Nil,
    Boolean,
    Integer,
    String,
    Symbol,
    Array,
    Exception,
    Function,
    Builtin,
    Class,
    Module,
    Object,
    Eigenclass,
    SelfRef,
    ReturnValue,
    RequireStatement,
}

impl TypeTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeTag::Nil => "NIL",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Integer => "INTEGER",
            TypeTag::String => "STRING",
            TypeTag::Symbol => "SYMBOL",
            TypeTag::Array => "ARRAY",
            TypeTag::Exception => "EXCEPTION",
            TypeTag::Function => "FUNCTION",
            TypeTag::Builtin => "BUILTIN",
            TypeTag::Class => "CLASS",
            TypeTag::Module => "MODULE",
            TypeTag::Object => "OBJECT",
            TypeTag::Eigenclass => "EIGENCLASS",
            TypeTag::SelfRef => "SELF",
            TypeTag::ReturnValue => "RETURN_VALUE",
            TypeTag::RequireStatement => "REQUIRE_STATEMENT",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Str(Heap<String>),
    Symbol(Heap<String>),
    Array(Heap<Vec<Value>>),
    Exception(Heap<ExceptionValue>),
    /// User-defined function, not yet installed as a method.
    Function(FunctionValue),
    /// Free native function. Internal: has no class.
    Builtin(BuiltinFunction),
    /// A class object (the value `Foo` evaluates to).
    Class(ClassRef),
    /// A module object.
    Module(ClassRef),
    /// Instance created by `Class#new`.
    Object(ObjectValue),
    /// An object with its own eigenclass.
    Extended(ExtendedObject),
    /// Marks the wrapped value as `self` in the current frame.
    SelfRef(Heap<Value>),
    /// Explicit `return` wrapper. Internal: unwrapped by method invocation.
    ReturnValue(Heap<Value>),
    /// Result of `require`, carrying the module name. Internal: consumed by the loader.
    RequireStatement(Heap<String>),
}

// Factory methods
impl Value {
    #[inline]
    pub const fn integer(n: i64) -> Self {
        Value::Integer(n)
    }

    #[inline]
    pub const fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(Heap::new(name.into()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    pub fn exception(class: ClassRef, message: impl Into<String>) -> Self {
        Value::Exception(Heap::new(ExceptionValue::new(class, message.into())))
    }

    pub fn function(params: Vec<String>, body: BodyId, env: Environment) -> Self {
        Value::Function(FunctionValue::new(params, body, env))
    }

    pub fn builtin(name: &'static str, func: BuiltinFn) -> Self {
        Value::Builtin(BuiltinFunction::new(name, func))
    }

    /// The value a class or module name evaluates to.
    pub fn class_object(class: ClassRef) -> Self {
        if class.kind() == ClassKind::Module {
            Value::Module(class)
        } else {
            Value::Class(class)
        }
    }

    /// Fresh instance of `class` with no instance variables.
    pub fn object(class: ClassRef) -> Self {
        Value::Object(ObjectValue::new(class))
    }

    pub(crate) fn extended(inner: Value, eigenclass: ClassRef) -> Self {
        Value::Extended(ExtendedObject::new(inner, eigenclass))
    }

    /// Record `eigenclass` on the identity behind this value.
    ///
    /// Only objects and class objects have an identity to hold it; for every
    /// other value the `Extended` wrapper is the only carrier.
    pub(crate) fn attach_singleton(&self, eigenclass: &ClassRef) {
        match self {
            Value::Object(o) => o.attach_singleton(eigenclass.clone()),
            Value::Class(c) | Value::Module(c) => c.attach_singleton(eigenclass.clone()),
            _ => {}
        }
    }

    pub fn self_ref(inner: Value) -> Self {
        Value::SelfRef(Heap::new(inner))
    }

    pub fn return_value(inner: Value) -> Self {
        Value::ReturnValue(Heap::new(inner))
    }

    pub fn require_statement(name: impl Into<String>) -> Self {
        Value::RequireStatement(Heap::new(name.into()))
    }
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Nil => TypeTag::Nil,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Integer(_) => TypeTag::Integer,
            Value::Str(_) => TypeTag::String,
            Value::Symbol(_) => TypeTag::Symbol,
            Value::Array(_) => TypeTag::Array,
            Value::Exception(_) => TypeTag::Exception,
            Value::Function(_) => TypeTag::Function,
            Value::Builtin(_) => TypeTag::Builtin,
            Value::Class(_) => TypeTag::Class,
            Value::Module(_) => TypeTag::Module,
            Value::Object(_) => TypeTag::Object,
            Value::Extended(_) => TypeTag::Eigenclass,
            Value::SelfRef(_) => TypeTag::SelfRef,
            Value::ReturnValue(_) => TypeTag::ReturnValue,
            Value::RequireStatement(_) => TypeTag::RequireStatement,
        }
    }

    /// Ruby `inspect` text. Strings render raw, as `puts` prints them.
    pub fn inspect(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Symbol(s) => format!(":{}", &**s),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(Value::inspect).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Exception(e) => format!("#<{}: {}>", e.class().name(), e.message()),
            Value::Function(f) => f.inspect(),
            Value::Builtin(_) => "builtin function".to_string(),
            Value::Class(c) | Value::Module(c) => c.name().to_string(),
            Value::Object(o) => format!("#<{}>", o.class().name()),
            Value::Extended(e) => e.inner().inspect(),
            Value::SelfRef(inner) | Value::ReturnValue(inner) => inner.inspect(),
            Value::RequireStatement(name) => name.to_string(),
        }
    }

    /// Class that governs dispatch on this value.
    ///
    /// For an extended object this is its eigenclass. Objects and class
    /// objects keep their eigenclass on the shared identity, so every handle
    /// dispatches through it, extended or not. `None` only for the
    /// values that never reach user code as receivers: builtins, bare
    /// functions, return wrappers and require statements.
    pub fn class(&self, core: &CoreClasses) -> Option<ClassRef> {
        let class = match self {
            Value::Nil => &core.nil_class,
            Value::Boolean(true) => &core.true_class,
            Value::Boolean(false) => &core.false_class,
            Value::Integer(_) => &core.integer,
            Value::Str(_) => &core.string,
            Value::Symbol(_) => &core.symbol,
            Value::Array(_) => &core.array,
            Value::Exception(e) => e.class(),
            Value::Class(c) => return Some(c.singleton().unwrap_or_else(|| core.class.clone())),
            Value::Module(c) => return Some(c.singleton().unwrap_or_else(|| core.module.clone())),
            Value::Object(o) => return Some(o.singleton().unwrap_or_else(|| o.class().clone())),
            Value::Extended(e) => e.eigenclass(),
            Value::SelfRef(inner) => return inner.class(core),
            Value::Function(_)
            | Value::Builtin(_)
            | Value::ReturnValue(_)
            | Value::RequireStatement(_) => return None,
        };
        Some(class.clone())
    }

    /// Strip `SelfRef` and `Extended` wrappers down to the underlying value.
    pub fn unwrapped(&self) -> &Value {
        match self {
            Value::SelfRef(inner) => inner.unwrapped(),
            Value::Extended(e) => e.inner().unwrapped(),
            other => other,
        }
    }

    /// Peel one explicit-return wrapper, if present.
    #[must_use]
    pub fn unwrap_return(self) -> Value {
        match self {
            Value::ReturnValue(inner) => (*inner).clone(),
            other => other,
        }
    }

    /// Text payload of a string (through wrappers).
    pub fn as_str(&self) -> Option<&str> {
        match self.unwrapped() {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.unwrapped() {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Ruby truthiness: everything except `nil` and `false`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self.unwrapped(), Value::Nil | Value::Boolean(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.unwrapped(), Value::Nil)
    }
}

/// Scalars and arrays compare by contents. Objects, classes, exceptions and
/// functions compare by identity. `SelfRef`/`Extended` wrappers are
/// transparent, so an object equals its own extended form.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self.unwrapped(), other.unwrapped()) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Str(a), Value::Str(b)) | (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Exception(a), Value::Exception(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name() == b.name(),
            (Value::Class(a), Value::Class(b)) | (Value::Module(a), Value::Module(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::RequireStatement(a), Value::RequireStatement(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Function(func) => fmt::Debug::fmt(func, f),
            Value::Builtin(b) => fmt::Debug::fmt(b, f),
            Value::Extended(e) => write!(
                f,
                "Extended({:?}, {})",
                e.inner(),
                e.eigenclass().name()
            ),
            Value::SelfRef(inner) => write!(f, "SelfRef({inner:?})"),
            Value::ReturnValue(inner) => write!(f, "ReturnValue({inner:?})"),
            Value::RequireStatement(name) => write!(f, "RequireStatement({:?})", &**name),
            other => write!(f, "{}({})", other.type_tag(), other.inspect()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}
