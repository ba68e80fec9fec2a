//! Error types for method dispatch and builtin methods.
//!
//! `EvalErrorKind` carries the structured data for each failure so callers
//! can match on it; `EvalError` pairs the kind with its rendered message.
//! Factory functions (e.g. `no_method_error()`) are the public way to build
//! errors and keep the message format in one place.
//!
//! Messages follow Ruby's wording so the evaluator can surface them verbatim
//! inside exception objects.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Result of invoking a method or evaluating a body.
pub type EvalResult = Result<Value, EvalError>;

/// Why a method lookup failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoMethodReason {
    /// No class in the resolution chain defines the name.
    Undefined,
    /// The method exists but is private and the call had an explicit receiver.
    Private,
}

impl fmt::Display for NoMethodReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined method"),
            Self::Private => f.write_str("private method"),
        }
    }
}

impl NoMethodReason {
    fn connector(self) -> &'static str {
        match self {
            Self::Undefined => "",
            Self::Private => "called ",
        }
    }
}

/// Typed error category.
///
/// `receiver` strings use Ruby's `inspect:ClassName` form, e.g. `nil:NilClass`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    /// Lookup failure, or a private method called with an explicit receiver.
    #[error("{reason} `{name}' {}for {receiver}", .reason.connector())]
    NoMethod {
        name: String,
        receiver: String,
        reason: NoMethodReason,
    },

    /// Arity mismatch, detected before the method body runs.
    #[error("wrong number of arguments (given {given}, expected {expected})")]
    WrongNumberOfArguments { expected: usize, given: usize },

    /// A builtin needed an argument of a specific variant.
    #[error("no implicit conversion of {actual} into {expected}")]
    ImplicitConversion { expected: String, actual: String },

    /// Integer division by zero.
    #[error("divided by 0")]
    ZeroDivision,

    /// Integer arithmetic left the 64-bit range.
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    /// Call depth limit reached.
    #[error("stack level too deep")]
    StackLevelTooDeep { limit: usize },

    /// Singleton methods cannot be attached to this value.
    #[error("can't define singleton method on {type_name}")]
    CantDefineSingleton { type_name: String },

    /// A class was reopened with a different superclass.
    #[error("superclass mismatch for class {name}")]
    SuperclassMismatch { name: String },

    /// A name already bound to a module was reopened as a class, or the reverse.
    #[error("{name} is not a {expected}")]
    NotA { name: String, expected: String },

    /// Raised explicitly from user code via `raise`.
    #[error("{message}")]
    Runtime { message: String },
}

impl EvalErrorKind {
    /// Name of the Ruby exception class this failure surfaces as.
    pub fn exception_class_name(&self) -> &'static str {
        match self {
            Self::NoMethod { .. } => "NoMethodError",
            Self::WrongNumberOfArguments { .. } => "ArgumentError",
            Self::ImplicitConversion { .. }
            | Self::CantDefineSingleton { .. }
            | Self::SuperclassMismatch { .. }
            | Self::NotA { .. } => "TypeError",
            Self::ZeroDivision => "ZeroDivisionError",
            Self::IntegerOverflow { .. } => "RangeError",
            Self::StackLevelTooDeep { .. } => "SystemStackError",
            Self::Runtime { .. } => "RuntimeError",
        }
    }
}

/// Dispatch or builtin failure.
///
/// Never fatal to the host: the evaluator decides whether to turn it into an
/// exception object, propagate it, or stop.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EvalError {
    /// Structured category.
    pub kind: EvalErrorKind,
    /// Rendered message, equal to `kind.to_string()`.
    pub message: String,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Ruby exception class name for this error.
    pub fn exception_class_name(&self) -> &'static str {
        self.kind.exception_class_name()
    }

    /// Whether this is a `NoMethodError` (undefined or private).
    pub fn is_no_method(&self) -> bool {
        matches!(self.kind, EvalErrorKind::NoMethod { .. })
    }
}

// Dispatch errors

/// No method `name` anywhere in the receiver's chain.
#[cold]
pub fn no_method_error(name: &str, receiver: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoMethod {
        name: name.to_string(),
        receiver: receiver.to_string(),
        reason: NoMethodReason::Undefined,
    })
}

/// Private method `name` called with an explicit receiver.
#[cold]
pub fn private_method_called(name: &str, receiver: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoMethod {
        name: name.to_string(),
        receiver: receiver.to_string(),
        reason: NoMethodReason::Private,
    })
}

/// Argument count did not match a fixed arity.
#[cold]
pub fn wrong_number_of_arguments(expected: usize, given: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongNumberOfArguments { expected, given })
}

/// Nested invocations exceeded `limit`.
#[cold]
pub fn stack_level_too_deep(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackLevelTooDeep { limit })
}

// Builtin argument errors

/// Argument of class `actual` where a `expected` was required.
#[cold]
pub fn implicit_conversion(expected: &str, actual: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImplicitConversion {
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

/// Integer division or modulo by zero.
#[cold]
pub fn zero_division() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ZeroDivision)
}

/// Checked integer arithmetic overflowed.
#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

/// User-level `raise`.
#[cold]
pub fn runtime_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Runtime {
        message: message.into(),
    })
}

// Class and eigenclass errors

/// The value has no class to hang an eigenclass on.
#[cold]
pub fn cant_define_singleton(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CantDefineSingleton {
        type_name: type_name.to_string(),
    })
}

/// `class Name < Other` where `Name` already has a different superclass.
#[cold]
pub fn superclass_mismatch(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SuperclassMismatch {
        name: name.to_string(),
    })
}

/// `name` is bound to the wrong kind of class-like entity.
#[cold]
pub fn not_a(name: &str, expected: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotA {
        name: name.to_string(),
        expected: expected.to_string(),
    })
}
