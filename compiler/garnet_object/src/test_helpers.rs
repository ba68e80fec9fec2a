//! Shared fixtures for unit tests in this crate.

use std::cell::RefCell;

use crate::{
    no_method_error, BodyId, CallContext, CallSite, ClassTable, Environment, EvalResult, Value,
};

/// A `CallContext` without a dispatcher behind it.
///
/// `eval` records the body and returns the `result` binding of the
/// environment wrapped in an explicit return, so tests can observe both
/// parameter binding and return unwrapping.
pub(crate) struct StubContext {
    pub receiver: Value,
    pub classes: ClassTable,
    pub output: RefCell<Vec<String>>,
    pub evaluated: Vec<BodyId>,
}

impl StubContext {
    pub fn new(receiver: Value) -> Self {
        StubContext {
            receiver,
            classes: ClassTable::new(),
            output: RefCell::new(Vec::new()),
            evaluated: Vec::new(),
        }
    }
}

impl CallContext for StubContext {
    fn receiver(&self) -> &Value {
        &self.receiver
    }

    fn eval(&mut self, body: BodyId, env: Environment) -> EvalResult {
        self.evaluated.push(body);
        Ok(Value::return_value(env.get("result").unwrap_or(Value::Nil)))
    }

    fn classes(&self) -> &ClassTable {
        &self.classes
    }

    fn println(&self, line: &str) {
        self.output.borrow_mut().push(line.to_string());
    }

    fn send(
        &mut self,
        receiver: &Value,
        name: &str,
        _args: &[Value],
        _call_site: CallSite,
    ) -> EvalResult {
        Err(no_method_error(name, &receiver.inspect()))
    }
}
