#![deny(clippy::arithmetic_side_effects)]
//! Garnet object model.
//!
//! This crate provides:
//! - Runtime values (`Value`, `Heap`, `FunctionValue`, `ObjectValue`, ...)
//! - Classes, modules and eigenclasses (`ClassRef`, `ClassTable`)
//! - Methods with arity and visibility (`Method`, `CallContext`)
//! - Lexical environments (`Environment`)
//! - Dispatch and builtin error types (`EvalError`, `EvalResult`)
//!
//! Dispatch itself lives in `garnet_eval`; this crate only describes what is
//! being dispatched on.
//!
//! # Ownership
//!
//! Everything is single-threaded and reference counted (`Rc`). Class method
//! tables and instance variables use interior mutability, so a method added
//! to a class is visible at once through every handle to it.

mod class;
mod class_table;
mod eigenclass;
mod environment;
mod errors;
mod method;
mod value;

#[cfg(test)]
mod test_helpers;

pub use class::{Ancestors, Class, ClassKind, ClassRef, MethodTable};
pub use class_table::{ClassTable, CoreClasses};
pub use eigenclass::{define_singleton_method, nominal_class, singleton_class};
pub use environment::{Environment, LocalScope, Scope};
pub use errors::{
    cant_define_singleton, implicit_conversion, integer_overflow, no_method_error, not_a,
    private_method_called, runtime_error, stack_level_too_deep, superclass_mismatch,
    wrong_number_of_arguments, zero_division, EvalError, EvalErrorKind, EvalResult,
    NoMethodReason,
};
pub use method::{Arity, CallContext, CallSite, Method, MethodBody, NativeFn, Visibility};
pub use value::{
    BodyId, BuiltinFn, BuiltinFunction, ExceptionValue, ExtendedObject, FunctionValue, Heap,
    ObjectValue, TypeTag, Value,
};
