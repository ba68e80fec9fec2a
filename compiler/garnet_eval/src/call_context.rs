//! The bridge between dispatch and the tree-walking evaluator.

use garnet_object::{BodyId, CallContext, CallSite, ClassTable, Environment, EvalResult, Value};

use crate::runtime::Runtime;

/// Evaluates interpreted bodies on behalf of the runtime.
///
/// Implemented by the evaluator that owns the AST. The runtime calls it for
/// every interpreted method body, passing the receiver that `self` refers to
/// and an environment that already binds the parameters.
pub trait Evaluator {
    fn eval(
        &mut self,
        runtime: &Runtime,
        receiver: &Value,
        body: BodyId,
        env: Environment,
    ) -> EvalResult;
}

impl<F> Evaluator for F
where
    F: FnMut(&Runtime, &Value, BodyId, Environment) -> EvalResult,
{
    fn eval(
        &mut self,
        runtime: &Runtime,
        receiver: &Value,
        body: BodyId,
        env: Environment,
    ) -> EvalResult {
        self(runtime, receiver, body, env)
    }
}

/// `CallContext` for one method invocation.
pub(crate) struct MethodCallContext<'a> {
    runtime: &'a Runtime,
    evaluator: &'a mut dyn Evaluator,
    receiver: &'a Value,
}

impl<'a> MethodCallContext<'a> {
    pub(crate) fn new(
        runtime: &'a Runtime,
        evaluator: &'a mut dyn Evaluator,
        receiver: &'a Value,
    ) -> Self {
        MethodCallContext {
            runtime,
            evaluator,
            receiver,
        }
    }
}

impl CallContext for MethodCallContext<'_> {
    fn receiver(&self) -> &Value {
        self.receiver
    }

    fn eval(&mut self, body: BodyId, env: Environment) -> EvalResult {
        self.evaluator.eval(self.runtime, self.receiver, body, env)
    }

    fn classes(&self) -> &ClassTable {
        self.runtime.classes()
    }

    fn println(&self, line: &str) {
        self.runtime.print_handler().println(line);
    }

    fn send(
        &mut self,
        receiver: &Value,
        name: &str,
        args: &[Value],
        call_site: CallSite,
    ) -> EvalResult {
        self.runtime
            .invoke(&mut *self.evaluator, receiver, name, args, call_site)
    }
}
