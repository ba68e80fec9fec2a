//! The `Kernel` module: default behavior for every object.
//!
//! `Kernel` sits at the root of every class chain, so these methods resolve
//! for any receiver unless a more specific class overrides them.

use garnet_object::{
    implicit_conversion, nominal_class, runtime_error, wrong_number_of_arguments, Arity,
    CallContext, CallSite, ClassTable, Environment, EvalResult, Method, Value,
};

use crate::dispatch;

pub(crate) fn install(classes: &ClassTable) {
    let kernel = &classes.core().kernel;
    kernel.define_method("puts", Method::private(Arity::Any, puts));
    kernel.define_method("require", Method::private(Arity::Fixed(1), require));
    kernel.define_method("raise", Method::private(Arity::Fixed(1), raise));
    kernel.define_method("nil?", Method::public(Arity::Fixed(0), is_nil));
    kernel.define_method("class", Method::public(Arity::Fixed(0), class));
    kernel.define_method("methods", Method::public(Arity::Fixed(0), methods));
    kernel.define_method("inspect", Method::public(Arity::Fixed(0), inspect));
    kernel.define_method("to_s", Method::public(Arity::Fixed(0), inspect));
    kernel.define_method("respond_to?", Method::public(Arity::Fixed(1), respond_to));
    kernel.define_method("==", Method::public(Arity::Fixed(1), equal));
}

/// Bind the `Kernel` functions callable as plain values.
pub(crate) fn define_functions(globals: &Environment) {
    globals.define("puts", Value::builtin("puts", puts));
}

/// Concatenated `inspect` of every argument, as one line.
fn puts(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let line: String = args.iter().map(Value::inspect).collect();
    ctx.println(&line);
    Ok(Value::Nil)
}

fn require(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let [name] = args else {
        return Err(wrong_number_of_arguments(1, args.len()));
    };
    match name.as_str() {
        Some(name) => Ok(Value::require_statement(name)),
        None => Err(implicit_conversion("String", &ctx.classes().class_name_of(name))),
    }
}

fn raise(_ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let [message] = args else {
        return Err(wrong_number_of_arguments(1, args.len()));
    };
    Err(runtime_error(message.inspect()))
}

fn is_nil(_ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::boolean(false))
}

/// The receiver's class, skipping one eigenclass level.
fn class(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(nominal_class(ctx.receiver(), ctx.classes()).map_or(Value::Nil, Value::class_object))
}

/// Public method names along the whole chain, most specific class first.
///
/// A name defined on several levels is listed once per level.
fn methods(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    let Some(class) = ctx.classes().class_of(ctx.receiver()) else {
        return Ok(Value::array(Vec::new()));
    };
    let names = class
        .ancestors()
        .flat_map(|level| level.public_method_names())
        .map(Value::symbol)
        .collect();
    Ok(Value::array(names))
}

fn inspect(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::string(ctx.receiver().inspect()))
}

fn respond_to(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let [name] = args else {
        return Err(wrong_number_of_arguments(1, args.len()));
    };
    let name = match name.unwrapped() {
        Value::Symbol(s) | Value::Str(s) => s.clone(),
        other => {
            return Err(implicit_conversion(
                "Symbol",
                &ctx.classes().class_name_of(other),
            ))
        }
    };
    let responds = ctx
        .classes()
        .class_of(ctx.receiver())
        .is_some_and(|class| dispatch::respond_to(&class, &name, CallSite::Explicit));
    Ok(Value::boolean(responds))
}

fn equal(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let [other] = args else {
        return Err(wrong_number_of_arguments(1, args.len()));
    };
    Ok(Value::boolean(ctx.receiver() == other))
}
