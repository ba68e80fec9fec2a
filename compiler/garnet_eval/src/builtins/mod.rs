//! Builtin methods of the core classes.
//!
//! Each submodule installs the methods of a few related classes. Natives
//! read their receiver through wrappers (`SelfRef`, `Extended`), so an
//! object with singleton methods keeps its builtin behavior.

mod collections;
mod numeric;
mod objects;
mod text;

use garnet_object::{implicit_conversion, CallContext, ClassTable, Environment, EvalError, Value};

use crate::kernel;

/// Install `Kernel` and every core class's methods.
pub(crate) fn install(classes: &ClassTable) {
    kernel::install(classes);
    numeric::install(classes);
    text::install(classes);
    collections::install(classes);
    objects::install(classes);
}

/// A fresh global environment holding the receiverless builtins.
pub(crate) fn globals() -> Environment {
    let globals = Environment::new();
    kernel::define_functions(&globals);
    globals
}

/// `value` as an integer, or a conversion error naming its class.
fn integer_arg(ctx: &dyn CallContext, value: &Value) -> Result<i64, EvalError> {
    value
        .as_integer()
        .ok_or_else(|| implicit_conversion("Integer", &ctx.classes().class_name_of(value)))
}

/// `value` as text, or a conversion error naming its class.
fn string_arg<'v>(ctx: &dyn CallContext, value: &'v Value) -> Result<&'v str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| implicit_conversion("String", &ctx.classes().class_name_of(value)))
}
