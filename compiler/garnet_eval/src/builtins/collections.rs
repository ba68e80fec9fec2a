//! `Array`.
//!
//! Arrays are immutable values here: `push` returns a new array.

use garnet_object::{
    implicit_conversion, integer_overflow, Arity, CallContext, ClassTable, EvalError, EvalResult,
    Heap, Method, Value,
};

pub(super) fn install(classes: &ClassTable) {
    let array = &classes.core().array;
    array.define_method("size", Method::public(Arity::Fixed(0), size));
    array.define_method("first", Method::public(Arity::Fixed(0), first));
    array.define_method("last", Method::public(Arity::Fixed(0), last));
    array.define_method("push", Method::public(Arity::Any, push));
}

fn receiver_items(ctx: &dyn CallContext) -> Result<Heap<Vec<Value>>, EvalError> {
    match ctx.receiver().unwrapped() {
        Value::Array(items) => Ok(items.clone()),
        other => Err(implicit_conversion(
            "Array",
            &ctx.classes().class_name_of(other),
        )),
    }
}

fn size(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    let items = receiver_items(ctx)?;
    i64::try_from(items.len())
        .map(Value::integer)
        .map_err(|_| integer_overflow("Array#size"))
}

fn first(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(receiver_items(ctx)?.first().cloned().unwrap_or(Value::Nil))
}

fn last(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(receiver_items(ctx)?.last().cloned().unwrap_or(Value::Nil))
}

/// A new array with `args` appended; the receiver is left unchanged.
fn push(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let items = receiver_items(ctx)?;
    let mut pushed = Vec::with_capacity(items.len().saturating_add(args.len()));
    pushed.extend(items.iter().cloned());
    pushed.extend(args.iter().cloned());
    Ok(Value::array(pushed))
}
