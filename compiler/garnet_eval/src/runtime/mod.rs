//! The runtime session: class table, output sink and dispatch entry points.
//!
//! A `Runtime` replaces any global class registry. The evaluator owns one,
//! calls [`Runtime::invoke`] for every method call, and receives interpreted
//! bodies back through its [`Evaluator`] implementation.

mod builder;
mod call_stack;

pub use builder::{RuntimeBuilder, DEFAULT_MAX_CALL_DEPTH};

use garnet_object::{
    define_singleton_method, no_method_error, not_a, private_method_called, singleton_class,
    CallSite, ClassRef, ClassTable, Environment, EvalError, EvalResult, Method, Value,
};

use crate::call_context::{Evaluator, MethodCallContext};
use crate::dispatch::{self, ResolvedMethod};
use crate::print_handler::SharedPrintHandler;
use call_stack::CallStack;

pub struct Runtime {
    classes: ClassTable,
    print_handler: SharedPrintHandler,
    call_stack: CallStack,
    /// Top-level `self`, an instance of `Object`.
    main: Value,
    /// Bindings visible to every top-level program, seeded with `puts`.
    globals: Environment,
}

impl Runtime {
    /// A runtime printing to stdout with the default call depth limit.
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// The top-level object that bare function calls run against.
    pub fn main(&self) -> &Value {
        &self.main
    }

    /// The global environment programs evaluate against.
    ///
    /// Holds the builtin functions callable without a receiver. Evaluators
    /// should enclose it rather than start from an empty environment.
    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Number of method invocations currently on the stack.
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    pub fn max_call_depth(&self) -> Option<usize> {
        self.call_stack.max_depth()
    }

    /// Call `name` on `receiver`.
    ///
    /// Resolves from the receiver's dispatch class, enforces visibility for
    /// the call site and checks arity, then runs the method. A call with the
    /// wrong argument count fails before it takes a stack frame.
    #[tracing::instrument(level = "debug", skip(self, evaluator, receiver, args), fields(argc = args.len()))]
    pub fn invoke(
        &self,
        evaluator: &mut dyn Evaluator,
        receiver: &Value,
        name: &str,
        args: &[Value],
        call_site: CallSite,
    ) -> EvalResult {
        let Some(resolved) = self.resolve(receiver, name) else {
            return Err(no_method_error(name, &self.describe(receiver)));
        };
        if !call_site.permits(resolved.method.visibility()) {
            return Err(private_method_called(name, &self.describe(receiver)));
        }
        tracing::trace!(
            owner = resolved.owner.name(),
            remaining_stack = ?garnet_stack::remaining_stack(),
            "resolved"
        );

        resolved.method.arity().check(args.len())?;
        let _frame = self.call_stack.push(name)?;
        let mut ctx = MethodCallContext::new(self, evaluator, receiver);
        garnet_stack::ensure_sufficient_stack(|| resolved.method.call(&mut ctx, args))
    }

    /// Call a bare function value with `main` as `self`.
    ///
    /// Functions get the same arity check and return unwrapping as methods.
    /// Builtins run against a call context too, so `puts` found in
    /// [`Runtime::globals`] writes to this runtime's print handler.
    pub fn call_function(
        &self,
        evaluator: &mut dyn Evaluator,
        callee: &Value,
        args: &[Value],
    ) -> EvalResult {
        match callee.unwrapped() {
            Value::Function(func) => {
                let method = Method::interpreted(func.clone());
                method.arity().check(args.len())?;
                let _frame = self.call_stack.push("(function)")?;
                let mut ctx = MethodCallContext::new(self, evaluator, &self.main);
                garnet_stack::ensure_sufficient_stack(|| method.call(&mut ctx, args))
            }
            Value::Builtin(builtin) => {
                let _frame = self.call_stack.push(builtin.name())?;
                let mut ctx = MethodCallContext::new(self, evaluator, &self.main);
                builtin.call(&mut ctx, args)
            }
            other => Err(not_a(&other.inspect(), "function")),
        }
    }

    /// Method `name` as seen from `receiver`, ignoring visibility.
    pub fn resolve(&self, receiver: &Value, name: &str) -> Option<ResolvedMethod> {
        let class = self.classes.class_of(receiver)?;
        dispatch::resolve(&class, name)
    }

    /// Whether `invoke` from `call_site` would find a callable method.
    pub fn respond_to(&self, receiver: &Value, name: &str, call_site: CallSite) -> bool {
        self.classes
            .class_of(receiver)
            .is_some_and(|class| dispatch::respond_to(&class, name, call_site))
    }

    /// Dispatch class of `value`: its eigenclass if it has one.
    pub fn class_of(&self, value: &Value) -> Option<ClassRef> {
        self.classes.class_of(value)
    }

    /// `class Name < superclass`: define, or reopen an existing class.
    pub fn define_class(
        &self,
        name: &str,
        superclass: Option<&ClassRef>,
    ) -> Result<ClassRef, EvalError> {
        self.classes.define_class(name, superclass)
    }

    pub fn define_module(&self, name: &str) -> Result<ClassRef, EvalError> {
        self.classes.define_module(name)
    }

    /// Add or replace an instance method on `class`.
    pub fn add_method(&self, class: &ClassRef, name: &str, method: Method) {
        class.define_method(name, method);
    }

    /// The eigenclass of `value`, created on first use.
    ///
    /// Returns the extended value, which the caller must keep in place of
    /// the original so later calls dispatch through the eigenclass.
    pub fn new_eigenclass(&self, value: &Value) -> Result<(Value, ClassRef), EvalError> {
        singleton_class(value, &self.classes)
    }

    /// `def obj.name`: add a method to `value` alone; returns the extended value.
    pub fn add_singleton_method(
        &self,
        value: &Value,
        name: &str,
        method: Method,
    ) -> Result<Value, EvalError> {
        define_singleton_method(value, name, method, &self.classes)
    }

    /// A user-visible exception object for `err`, of the matching class.
    pub fn exception_for(&self, err: &EvalError) -> Value {
        let class = self.classes.exception_class(err.exception_class_name());
        Value::exception(class, err.message.clone())
    }

    fn describe(&self, receiver: &Value) -> String {
        dispatch::describe_receiver(receiver, &self.classes)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
