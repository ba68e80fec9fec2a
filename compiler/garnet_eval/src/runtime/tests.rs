use super::*;
use crate::print_handler::buffer_handler;
use crate::test_helpers::{Body, ScriptEvaluator};
use garnet_object::{Arity, CallContext, EvalErrorKind, NoMethodReason, Visibility};
use pretty_assertions::assert_eq;

fn buffered() -> (Runtime, SharedPrintHandler) {
    let output = buffer_handler();
    let runtime = Runtime::builder().print_handler(output.clone()).build();
    (runtime, output)
}

fn point(runtime: &Runtime) -> ClassRef {
    let Ok(class) = runtime.define_class("Point", None) else {
        panic!("define_class failed");
    };
    class
}

fn always_seven(_ctx: &mut dyn CallContext, _args: &[Value]) -> EvalResult {
    Ok(Value::integer(7))
}

// Resolution and lookup determinism

#[test]
fn unresolved_method_is_no_method_error() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();

    let Err(err) = runtime.invoke(&mut eval, &Value::Nil, "frobnicate", &[], CallSite::Explicit)
    else {
        panic!("call succeeded");
    };

    assert_eq!(err.message, "undefined method `frobnicate' for nil:NilClass");
    assert_eq!(err.exception_class_name(), "NoMethodError");
}

#[test]
fn method_defined_on_ancestor_is_found() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let class = point(&runtime);
    let obj = Value::object(class);

    let object = runtime.classes().core().object.clone();
    runtime.add_method(&object, "seven", Method::public(Arity::Fixed(0), always_seven));

    let result = runtime.invoke(&mut eval, &obj, "seven", &[], CallSite::Explicit);
    assert_eq!(result, Ok(Value::integer(7)));
    let owner = runtime.resolve(&obj, "seven").map(|r| r.owner);
    assert_eq!(owner, Some(object));
}

#[test]
fn subclass_definition_shadows_superclass() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let base = point(&runtime);
    let Ok(leaf) = runtime.define_class("Point3D", Some(&base)) else {
        panic!("define_class failed");
    };
    let base_method = eval.method(&[], Body::Literal(Value::string("base")));
    let leaf_method = eval.method(&[], Body::Literal(Value::string("leaf")));
    runtime.add_method(&base, "kind", base_method);
    runtime.add_method(&leaf, "kind", leaf_method);

    let on_leaf = runtime.invoke(&mut eval, &Value::object(leaf), "kind", &[], CallSite::Explicit);
    let on_base = runtime.invoke(&mut eval, &Value::object(base), "kind", &[], CallSite::Explicit);

    assert_eq!(on_leaf, Ok(Value::string("leaf")));
    assert_eq!(on_base, Ok(Value::string("base")));
}

// Eigenclasses

#[test]
fn singleton_method_is_isolated_to_its_object() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let class = point(&runtime);
    let first = Value::object(class.clone());
    let second = Value::object(class);

    let method = eval.method(&[], Body::Literal(Value::symbol("only_me")));
    let Ok(first) = runtime.add_singleton_method(&first, "special", method) else {
        panic!("extension failed");
    };

    let on_first = runtime.invoke(&mut eval, &first, "special", &[], CallSite::Explicit);
    assert_eq!(on_first, Ok(Value::symbol("only_me")));

    let Err(err) = runtime.invoke(&mut eval, &second, "special", &[], CallSite::Explicit) else {
        panic!("singleton method leaked to another instance");
    };
    assert!(err.is_no_method());
}

#[test]
fn repeated_extension_keeps_one_eigenclass() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let obj = Value::object(point(&runtime));

    let a = eval.method(&[], Body::Literal(Value::integer(1)));
    let b = eval.method(&[], Body::Literal(Value::integer(2)));
    let Ok(obj) = runtime.add_singleton_method(&obj, "a", a) else {
        panic!("first extension failed");
    };
    let Ok((_, eigen_before)) = runtime.new_eigenclass(&obj) else {
        panic!("eigenclass lookup failed");
    };
    let Ok(obj) = runtime.add_singleton_method(&obj, "b", b) else {
        panic!("second extension failed");
    };

    assert_eq!(runtime.class_of(&obj), Some(eigen_before));
    assert_eq!(
        runtime.invoke(&mut eval, &obj, "a", &[], CallSite::Explicit),
        Ok(Value::integer(1))
    );
    assert_eq!(
        runtime.invoke(&mut eval, &obj, "b", &[], CallSite::Explicit),
        Ok(Value::integer(2))
    );
}

#[test]
fn extension_through_an_alias_reaches_every_handle() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let obj = Value::object(point(&runtime));
    let alias = obj.clone();

    let a = eval.method(&[], Body::Literal(Value::integer(1)));
    let b = eval.method(&[], Body::Literal(Value::integer(2)));
    let Ok(first) = runtime.add_singleton_method(&obj, "a", a) else {
        panic!("first extension failed");
    };
    let Ok(second) = runtime.add_singleton_method(&alias, "b", b) else {
        panic!("second extension failed");
    };

    assert_eq!(runtime.class_of(&first), runtime.class_of(&second));
    for handle in [&obj, &alias, &first, &second] {
        assert_eq!(
            runtime.invoke(&mut eval, handle, "a", &[], CallSite::Explicit),
            Ok(Value::integer(1))
        );
        assert_eq!(
            runtime.invoke(&mut eval, handle, "b", &[], CallSite::Explicit),
            Ok(Value::integer(2))
        );
    }
}

#[test]
fn call_function_sees_singleton_methods_of_main() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let helper = eval.method(&[], Body::Literal(Value::integer(42)));
    let Ok(_) = runtime.add_singleton_method(runtime.main(), "helper", helper) else {
        panic!("extension failed");
    };
    let callee = Value::Function(eval.function(&[], Body::Call("helper", Vec::new())));

    assert_eq!(runtime.call_function(&mut eval, &callee, &[]), Ok(Value::integer(42)));
}

#[test]
fn class_on_extended_object_returns_original_class() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let class = point(&runtime);
    let method = eval.method(&[], Body::Literal(Value::Nil));
    let Ok(obj) = runtime.add_singleton_method(&Value::object(class.clone()), "m", method) else {
        panic!("extension failed");
    };

    let result = runtime.invoke(&mut eval, &obj, "class", &[], CallSite::Explicit);

    assert_eq!(result, Ok(Value::class_object(class)));
}

#[test]
fn eigenclass_methods_still_reach_builtins() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let method = eval.method(&[], Body::Literal(Value::string("extra")));
    let Ok(five) = runtime.add_singleton_method(&Value::integer(5), "extra", method) else {
        panic!("extension failed");
    };

    let sum = runtime.invoke(&mut eval, &five, "+", &[Value::integer(1)], CallSite::Explicit);
    assert_eq!(sum, Ok(Value::integer(6)));
}

// Arity and visibility

#[test]
fn arity_mismatch_fails_before_body_runs() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let class = point(&runtime);
    let method = eval.method(&[], Body::Literal(Value::Nil));
    runtime.add_method(&class, "noop", method);

    let Err(err) = runtime.invoke(
        &mut eval,
        &Value::object(class),
        "noop",
        &[Value::integer(1), Value::integer(2)],
        CallSite::Explicit,
    ) else {
        panic!("arity was not enforced");
    };

    assert_eq!(
        err.kind,
        EvalErrorKind::WrongNumberOfArguments {
            expected: 0,
            given: 2
        }
    );
    assert_eq!(eval.evaluations, 0);
}

#[test]
fn nil_predicate_rejects_arguments() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();

    let Err(err) = runtime.invoke(&mut eval, &Value::Nil, "nil?", &[Value::Nil], CallSite::Explicit)
    else {
        panic!("nil? accepted an argument");
    };
    assert_eq!(
        err.kind,
        EvalErrorKind::WrongNumberOfArguments {
            expected: 0,
            given: 1
        }
    );
}

#[test]
fn arity_is_checked_before_taking_a_frame() {
    let runtime = Runtime::builder()
        .print_handler(buffer_handler())
        .max_call_depth(Some(0))
        .build();
    let mut eval = ScriptEvaluator::new();
    let func = Value::Function(eval.function(&["x"], Body::Receiver));

    let Err(err) = runtime.invoke(&mut eval, &Value::Nil, "nil?", &[Value::Nil], CallSite::Explicit)
    else {
        panic!("nil? accepted an argument");
    };
    assert_eq!(
        err.kind,
        EvalErrorKind::WrongNumberOfArguments {
            expected: 0,
            given: 1
        }
    );

    let Err(err) = runtime.call_function(&mut eval, &func, &[]) else {
        panic!("arity not checked");
    };
    assert_eq!(
        err.kind,
        EvalErrorKind::WrongNumberOfArguments {
            expected: 1,
            given: 0
        }
    );

    let Err(err) = runtime.invoke(&mut eval, &Value::Nil, "nil?", &[], CallSite::Explicit) else {
        panic!("call ran past a zero depth limit");
    };
    assert_eq!(err.kind, EvalErrorKind::StackLevelTooDeep { limit: 0 });
}

#[test]
fn private_method_needs_implicit_receiver() {
    let (runtime, output) = buffered();
    let mut eval = ScriptEvaluator::new();

    let Err(err) = runtime.invoke(
        &mut eval,
        &Value::integer(1),
        "puts",
        &[Value::string("x")],
        CallSite::Explicit,
    ) else {
        panic!("explicit puts succeeded");
    };
    assert_eq!(err.message, "private method `puts' called for 1:Integer");
    assert!(matches!(
        err.kind,
        EvalErrorKind::NoMethod {
            reason: NoMethodReason::Private,
            ..
        }
    ));
    assert_eq!(output.output(), "");

    let ok = runtime.invoke(
        &mut eval,
        &Value::integer(1),
        "puts",
        &[Value::string("x")],
        CallSite::ImplicitSelf,
    );
    assert_eq!(ok, Ok(Value::Nil));
    assert_eq!(output.output(), "x\n");
}

#[test]
fn private_user_method_callable_from_inside() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let class = point(&runtime);
    let secret = eval
        .function(&[], Body::Literal(Value::integer(42)))
        .with_visibility(Visibility::Private);
    runtime.add_method(&class, "secret", Method::interpreted(secret));
    let reveal = eval.method(&[], Body::Call("secret", Vec::new()));
    runtime.add_method(&class, "reveal", reveal);
    let obj = Value::object(class);

    assert!(runtime
        .invoke(&mut eval, &obj, "secret", &[], CallSite::Explicit)
        .is_err());
    assert_eq!(
        runtime.invoke(&mut eval, &obj, "reveal", &[], CallSite::Explicit),
        Ok(Value::integer(42))
    );
    assert!(!runtime.respond_to(&obj, "secret", CallSite::Explicit));
    assert!(runtime.respond_to(&obj, "secret", CallSite::ImplicitSelf));
}

// Interpreted bodies

#[test]
fn parameters_are_bound_and_return_is_unwrapped() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let class = point(&runtime);
    let method = eval.method(
        &["a", "b"],
        Body::Seq(vec![
            Body::Return(Box::new(Body::Lookup("b"))),
            Body::Lookup("a"),
        ]),
    );
    runtime.add_method(&class, "second", method);

    let result = runtime.invoke(
        &mut eval,
        &Value::object(class),
        "second",
        &[Value::integer(1), Value::integer(2)],
        CallSite::Explicit,
    );

    assert_eq!(result, Ok(Value::integer(2)));
}

#[test]
fn call_function_runs_with_main_as_self() {
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();
    let func = eval.function(&["x"], Body::Seq(vec![Body::Receiver]));
    let callee = Value::Function(func);

    let result = runtime.call_function(&mut eval, &callee, &[Value::Nil]);
    assert_eq!(result.as_ref(), Ok(runtime.main()));

    let Err(err) = runtime.call_function(&mut eval, &callee, &[]) else {
        panic!("arity not checked");
    };
    assert!(matches!(err.kind, EvalErrorKind::WrongNumberOfArguments { .. }));
}

#[test]
fn call_function_accepts_builtins_and_rejects_others() {
    fn first_or_nil(_ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
        Ok(args.first().cloned().unwrap_or(Value::Nil))
    }
    let (runtime, _) = buffered();
    let mut eval = ScriptEvaluator::new();

    let builtin = Value::builtin("first_or_nil", first_or_nil);
    assert_eq!(
        runtime.call_function(&mut eval, &builtin, &[Value::integer(3)]),
        Ok(Value::integer(3))
    );
    assert!(runtime
        .call_function(&mut eval, &Value::integer(3), &[])
        .is_err());
}

#[test]
fn global_puts_writes_to_the_print_handler() {
    let (runtime, output) = buffered();
    let mut eval = ScriptEvaluator::new();

    let Some(puts) = runtime.globals().get("puts") else {
        panic!("puts missing from globals");
    };
    assert!(matches!(puts, Value::Builtin(_)));

    let result = runtime.call_function(&mut eval, &puts, &[Value::string("a"), Value::string("b")]);
    assert_eq!(result, Ok(Value::Nil));
    assert_eq!(output.output(), "ab\n");
    assert_eq!(runtime.call_depth(), 0);
}

#[test]
fn globals_are_per_runtime() {
    let (first, _) = buffered();
    let (second, _) = buffered();

    first.globals().define("answer", Value::integer(42));

    assert_eq!(first.globals().get("answer"), Some(Value::integer(42)));
    assert_eq!(second.globals().get("answer"), None);
    assert!(second.globals().get("puts").is_some());
}

#[test]
fn native_send_reenters_dispatch() {
    let (runtime, output) = buffered();
    let mut eval = ScriptEvaluator::new();
    let class = point(&runtime);
    let shout = eval.method(
        &["word"],
        Body::Call("puts", vec![Body::Lookup("word"), Body::Literal(Value::string("!"))]),
    );
    runtime.add_method(&class, "shout", shout);
    let obj = Value::object(class);

    let result = runtime.invoke(
        &mut eval,
        &obj,
        "shout",
        &[Value::string("hey")],
        CallSite::Explicit,
    );

    assert_eq!(result, Ok(Value::Nil));
    assert_eq!(output.output(), "hey!\n");
    assert_eq!(runtime.call_depth(), 0);
}

// Call depth

#[test]
fn runaway_recursion_is_stack_level_too_deep() {
    let output = buffer_handler();
    let runtime = Runtime::builder()
        .print_handler(output)
        .max_call_depth(Some(50))
        .build();
    let mut eval = ScriptEvaluator::new();
    let class = point(&runtime);
    let forever = eval.method(&[], Body::Call("forever", Vec::new()));
    runtime.add_method(&class, "forever", forever);

    let Err(err) = runtime.invoke(
        &mut eval,
        &Value::object(class),
        "forever",
        &[],
        CallSite::Explicit,
    ) else {
        panic!("recursion terminated on its own");
    };

    assert_eq!(err.kind, EvalErrorKind::StackLevelTooDeep { limit: 50 });
    assert_eq!(err.exception_class_name(), "SystemStackError");
    assert_eq!(runtime.call_depth(), 0);
    assert_eq!(eval.evaluations, 50);
}

#[test]
fn builder_defaults() {
    crate::init_tracing();
    let runtime = Runtime::default();
    assert_eq!(runtime.max_call_depth(), Some(DEFAULT_MAX_CALL_DEPTH));
    let unlimited = Runtime::builder().max_call_depth(None).build();
    assert_eq!(unlimited.max_call_depth(), None);
    assert_eq!(runtime.print_handler().output(), "");
}

// Classes and exceptions

#[test]
fn class_definitions_reopen() {
    let (runtime, _) = buffered();
    let first = point(&runtime);
    let again = point(&runtime);
    assert_eq!(first, again);

    let Ok(module) = runtime.define_module("Helpers") else {
        panic!("define_module failed");
    };
    assert!(module.is_module());
    assert!(runtime.define_class("Helpers", None).is_err());
}

#[test]
fn exception_for_uses_matching_class() {
    let (runtime, _) = buffered();
    let err = garnet_object::zero_division();

    let exception = runtime.exception_for(&err);

    assert_eq!(exception.inspect(), "#<ZeroDivisionError: divided by 0>");
    let Some(class) = runtime.class_of(&exception) else {
        panic!("exception without class");
    };
    let ancestors: Vec<String> = class.ancestors().map(|c| c.name().to_string()).collect();
    assert!(ancestors.contains(&"StandardError".to_string()));
}
