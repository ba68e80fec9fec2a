//! `Integer` arithmetic and comparison.
//!
//! Arithmetic is checked: overflow fails with `RangeError` instead of
//! wrapping. Division floors toward negative infinity, as in Ruby.

use garnet_object::{
    integer_overflow, wrong_number_of_arguments, zero_division, Arity, CallContext, ClassTable,
    EvalError, EvalResult, Method, Value,
};

use super::integer_arg;

pub(super) fn install(classes: &ClassTable) {
    let integer = &classes.core().integer;
    integer.define_method("+", Method::public(Arity::Fixed(1), add));
    integer.define_method("-", Method::public(Arity::Fixed(1), sub));
    integer.define_method("*", Method::public(Arity::Fixed(1), mul));
    integer.define_method("/", Method::public(Arity::Fixed(1), div));
    integer.define_method("==", Method::public(Arity::Fixed(1), eq));
    integer.define_method("<", Method::public(Arity::Fixed(1), lt));
    integer.define_method(">", Method::public(Arity::Fixed(1), gt));
}

/// Receiver and the single argument, both as integers.
fn operands(ctx: &dyn CallContext, args: &[Value]) -> Result<(i64, i64), EvalError> {
    let [rhs] = args else {
        return Err(wrong_number_of_arguments(1, args.len()));
    };
    let lhs = integer_arg(ctx, ctx.receiver())?;
    let rhs = integer_arg(ctx, rhs)?;
    Ok((lhs, rhs))
}

fn add(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let (a, b) = operands(ctx, args)?;
    a.checked_add(b)
        .map(Value::integer)
        .ok_or_else(|| integer_overflow("addition"))
}

fn sub(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let (a, b) = operands(ctx, args)?;
    a.checked_sub(b)
        .map(Value::integer)
        .ok_or_else(|| integer_overflow("subtraction"))
}

fn mul(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let (a, b) = operands(ctx, args)?;
    a.checked_mul(b)
        .map(Value::integer)
        .ok_or_else(|| integer_overflow("multiplication"))
}

fn div(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let (a, b) = operands(ctx, args)?;
    if b == 0 {
        return Err(zero_division());
    }
    floor_div(a, b)
        .map(Value::integer)
        .ok_or_else(|| integer_overflow("division"))
}

/// Floored division; `None` only for `i64::MIN / -1`.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    let remainder = a.checked_rem(b)?;
    if remainder != 0 && (remainder < 0) != (b < 0) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

fn eq(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let [rhs] = args else {
        return Err(wrong_number_of_arguments(1, args.len()));
    };
    // Comparing with a non-integer is just false, not an error.
    Ok(Value::boolean(ctx.receiver().as_integer().is_some() && ctx.receiver() == rhs))
}

fn lt(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let (a, b) = operands(ctx, args)?;
    Ok(Value::boolean(a < b))
}

fn gt(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let (a, b) = operands(ctx, args)?;
    Ok(Value::boolean(a > b))
}
