//! `NilClass`, `Exception`, `Module` and `Class`.

use garnet_object::{
    implicit_conversion, Arity, CallContext, CallSite, ClassRef, ClassTable, EvalError,
    EvalResult, Method, Value,
};

use crate::dispatch;

pub(super) fn install(classes: &ClassTable) {
    let core = classes.core();
    core.nil_class
        .define_method("nil?", Method::public(Arity::Fixed(0), nil_is_nil));
    core.nil_class
        .define_method("to_s", Method::public(Arity::Fixed(0), nil_to_s));

    core.exception
        .define_method("message", Method::public(Arity::Fixed(0), message));

    core.module
        .define_method("name", Method::public(Arity::Fixed(0), name));
    core.class
        .define_method("superclass", Method::public(Arity::Fixed(0), superclass));
    core.class
        .define_method("new", Method::public(Arity::Any, new));
}

fn nil_is_nil(_ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::boolean(true))
}

fn nil_to_s(_ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::string(""))
}

fn message(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    match ctx.receiver().unwrapped() {
        Value::Exception(e) => Ok(Value::string(e.message())),
        other => Err(implicit_conversion(
            "Exception",
            &ctx.classes().class_name_of(other),
        )),
    }
}

/// The class or module a `Module`/`Class` method was called on.
fn receiver_class(ctx: &dyn CallContext, expected: &str) -> Result<ClassRef, EvalError> {
    match ctx.receiver().unwrapped() {
        Value::Class(class) | Value::Module(class) => Ok(class.clone()),
        other => Err(implicit_conversion(
            expected,
            &ctx.classes().class_name_of(other),
        )),
    }
}

fn name(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::string(receiver_class(ctx, "Module")?.name()))
}

/// Nearest ancestor that is a class; `Kernel` above `Object` is skipped.
fn superclass(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    let class = receiver_class(ctx, "Class")?;
    Ok(class
        .ancestors()
        .skip(1)
        .find(|parent| !parent.is_module())
        .map_or(Value::Nil, Value::class_object))
}

/// Allocate an instance and run `initialize` on it if the class has one.
///
/// Without `initialize`, any argument is an arity error.
fn new(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let class = receiver_class(ctx, "Class")?;
    let instance = Value::object(class.clone());
    if dispatch::resolve(&class, "initialize").is_some() {
        ctx.send(&instance, "initialize", args, CallSite::ImplicitSelf)?;
    } else {
        Arity::Fixed(0).check(args.len())?;
    }
    Ok(instance)
}
