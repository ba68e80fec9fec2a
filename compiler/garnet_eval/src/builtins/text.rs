//! `String` and `Symbol`.

use garnet_object::{
    implicit_conversion, integer_overflow, wrong_number_of_arguments, Arity, CallContext,
    ClassTable, EvalError, EvalResult, Method, Value,
};

use super::string_arg;

pub(super) fn install(classes: &ClassTable) {
    let string = &classes.core().string;
    string.define_method("+", Method::public(Arity::Fixed(1), concat));
    string.define_method("size", Method::public(Arity::Fixed(0), size));
    string.define_method("to_s", Method::public(Arity::Fixed(0), string_to_s));
    string.define_method("to_sym", Method::public(Arity::Fixed(0), string_to_sym));

    let symbol = &classes.core().symbol;
    symbol.define_method("to_s", Method::public(Arity::Fixed(0), symbol_to_s));
    symbol.define_method("to_sym", Method::public(Arity::Fixed(0), symbol_to_sym));
}

fn receiver_text(ctx: &dyn CallContext) -> Result<&str, EvalError> {
    string_arg(ctx, ctx.receiver())
}

fn concat(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    let [other] = args else {
        return Err(wrong_number_of_arguments(1, args.len()));
    };
    let mut joined = receiver_text(ctx)?.to_string();
    joined.push_str(string_arg(ctx, other)?);
    Ok(Value::string(joined))
}

/// Length in characters, not bytes.
fn size(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    let count = receiver_text(ctx)?.chars().count();
    i64::try_from(count)
        .map(Value::integer)
        .map_err(|_| integer_overflow("String#size"))
}

fn string_to_s(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::string(receiver_text(ctx)?))
}

fn string_to_sym(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::symbol(receiver_text(ctx)?))
}

fn symbol_name(ctx: &dyn CallContext) -> Result<String, EvalError> {
    match ctx.receiver().unwrapped() {
        Value::Symbol(name) => Ok(name.to_string()),
        other => Err(implicit_conversion(
            "Symbol",
            &ctx.classes().class_name_of(other),
        )),
    }
}

fn symbol_to_s(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::string(symbol_name(ctx)?))
}

fn symbol_to_sym(ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::symbol(symbol_name(ctx)?))
}
