//! A tiny scripted evaluator for unit tests.
//!
//! Bodies are small trees of `Body` nodes registered up front; the runtime
//! hands back their `BodyId` through `Evaluator::eval`.

use rustc_hash::FxHashMap;

use garnet_object::{runtime_error, Method};

use crate::{BodyId, CallSite, Environment, EvalResult, Evaluator, FunctionValue, Runtime, Value};

#[derive(Clone)]
pub(crate) enum Body {
    /// A name bound in the method's environment, or nil.
    Lookup(&'static str),
    Literal(Value),
    /// `self`
    Receiver,
    /// `return <body>`
    Return(Box<Body>),
    /// `name(args)` with implicit self.
    Call(&'static str, Vec<Body>),
    /// `recv.name(args)`
    Send(Box<Body>, &'static str, Vec<Body>),
    /// `@name = <body>`
    SetIvar(&'static str, Box<Body>),
    /// `@name`
    Ivar(&'static str),
    /// Statements in order; an explicit return stops the sequence.
    Seq(Vec<Body>),
}

pub(crate) struct ScriptEvaluator {
    bodies: FxHashMap<BodyId, Body>,
    next: u32,
    /// Number of bodies evaluated so far.
    pub evaluations: usize,
}

impl ScriptEvaluator {
    pub fn new() -> Self {
        ScriptEvaluator {
            bodies: FxHashMap::default(),
            next: 0,
            evaluations: 0,
        }
    }

    pub fn body(&mut self, body: Body) -> BodyId {
        let id = BodyId::new(self.next);
        self.next = self.next.saturating_add(1);
        self.bodies.insert(id, body);
        id
    }

    pub fn function(&mut self, params: &[&str], body: Body) -> FunctionValue {
        let params = params.iter().map(ToString::to_string).collect();
        FunctionValue::new(params, self.body(body), Environment::new())
    }

    pub fn method(&mut self, params: &[&str], body: Body) -> Method {
        Method::interpreted(self.function(params, body))
    }

    fn run(
        &mut self,
        runtime: &Runtime,
        receiver: &Value,
        body: &Body,
        env: &Environment,
    ) -> EvalResult {
        match body {
            Body::Lookup(name) => Ok(env.get(name).unwrap_or(Value::Nil)),
            Body::Literal(value) => Ok(value.clone()),
            Body::Receiver => Ok(receiver.clone()),
            Body::Return(inner) => Ok(Value::return_value(self.run(runtime, receiver, inner, env)?)),
            Body::Call(name, args) => {
                let args = self.run_all(runtime, receiver, args, env)?;
                runtime.invoke(self, receiver, name, &args, CallSite::ImplicitSelf)
            }
            Body::Send(target, name, args) => {
                let target = self.run(runtime, receiver, target, env)?;
                let args = self.run_all(runtime, receiver, args, env)?;
                runtime.invoke(self, &target, name, &args, CallSite::Explicit)
            }
            Body::SetIvar(name, value) => {
                let value = self.run(runtime, receiver, value, env)?;
                if let Value::Object(obj) = receiver.unwrapped() {
                    obj.set_ivar(*name, value.clone());
                }
                Ok(value)
            }
            Body::Ivar(name) => Ok(match receiver.unwrapped() {
                Value::Object(obj) => obj.ivar(name).unwrap_or(Value::Nil),
                _ => Value::Nil,
            }),
            Body::Seq(statements) => {
                let mut last = Value::Nil;
                for statement in statements {
                    last = self.run(runtime, receiver, statement, env)?;
                    if matches!(last, Value::ReturnValue(_)) {
                        break;
                    }
                }
                Ok(last)
            }
        }
    }

    fn run_all(
        &mut self,
        runtime: &Runtime,
        receiver: &Value,
        bodies: &[Body],
        env: &Environment,
    ) -> Result<Vec<Value>, crate::EvalError> {
        bodies
            .iter()
            .map(|body| self.run(runtime, receiver, body, env))
            .collect()
    }
}

impl Evaluator for ScriptEvaluator {
    fn eval(
        &mut self,
        runtime: &Runtime,
        receiver: &Value,
        body: BodyId,
        env: Environment,
    ) -> EvalResult {
        self.evaluations = self.evaluations.saturating_add(1);
        let Some(script) = self.bodies.get(&body).cloned() else {
            return Err(runtime_error(format!("unknown body {}", body.index())));
        };
        self.run(runtime, receiver, &script, &env)
    }
}
