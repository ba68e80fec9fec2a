//! Methods and the per-call capability they run against.

use std::fmt;

use crate::class_table::ClassTable;
use crate::environment::Environment;
use crate::errors::{wrong_number_of_arguments, EvalError, EvalResult};
use crate::value::{BodyId, FunctionValue, Value};

/// Declared argument count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// Variadic: any number of arguments is accepted.
    Any,
}

impl Arity {
    /// Reject `given` arguments if they do not match.
    pub fn check(self, given: usize) -> Result<(), EvalError> {
        match self {
            Arity::Fixed(expected) if expected != given => {
                Err(wrong_number_of_arguments(expected, given))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    /// Callable only with an implicit `self` receiver.
    Private,
}

/// How the call was written at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallSite {
    /// `recv.name(...)`
    Explicit,
    /// `name(...)` with `self` as the implicit receiver.
    ImplicitSelf,
}

impl CallSite {
    /// Map the evaluator's "is this an internal call" flag.
    pub fn from_internal(is_internal: bool) -> Self {
        if is_internal {
            CallSite::ImplicitSelf
        } else {
            CallSite::Explicit
        }
    }

    /// Whether a method with `visibility` may be called from this site.
    pub fn permits(self, visibility: Visibility) -> bool {
        visibility == Visibility::Public || self == CallSite::ImplicitSelf
    }
}

/// Per-call capabilities handed to a method body.
///
/// Implemented by the dispatcher. Natives use it to reach the receiver,
/// print, inspect classes and call back into dispatch; interpreted methods
/// use `eval` to have the evaluator run their body.
pub trait CallContext {
    /// The receiver of the current call, as the caller passed it.
    fn receiver(&self) -> &Value;

    /// Evaluate an interpreted body in `env`.
    fn eval(&mut self, body: BodyId, env: Environment) -> EvalResult;

    fn classes(&self) -> &ClassTable;

    /// Write one line to the runtime's output sink.
    fn println(&self, line: &str);

    /// Re-entrant dispatch on an arbitrary receiver.
    fn send(
        &mut self,
        receiver: &Value,
        name: &str,
        args: &[Value],
        call_site: CallSite,
    ) -> EvalResult;
}

/// Signature of a natively implemented method.
pub type NativeFn = fn(&mut dyn CallContext, &[Value]) -> EvalResult;

#[derive(Clone)]
pub enum MethodBody {
    Native(NativeFn),
    Interpreted(FunctionValue),
}

/// A callable unit: arity, visibility and body.
#[derive(Clone)]
pub struct Method {
    arity: Arity,
    visibility: Visibility,
    body: MethodBody,
}

impl Method {
    pub fn native(arity: Arity, visibility: Visibility, func: NativeFn) -> Self {
        Method {
            arity,
            visibility,
            body: MethodBody::Native(func),
        }
    }

    #[inline]
    pub fn public(arity: Arity, func: NativeFn) -> Self {
        Self::native(arity, Visibility::Public, func)
    }

    #[inline]
    pub fn private(arity: Arity, func: NativeFn) -> Self {
        Self::native(arity, Visibility::Private, func)
    }

    /// Install a user function as a method; arity is its parameter count.
    pub fn interpreted(func: FunctionValue) -> Self {
        Method {
            arity: Arity::Fixed(func.arity()),
            visibility: func.visibility(),
            body: MethodBody::Interpreted(func),
        }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Run the method. Arity is checked before the body executes.
    pub fn call(&self, ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
        self.arity.check(args.len())?;
        match &self.body {
            MethodBody::Native(func) => func(ctx, args),
            MethodBody::Interpreted(func) => {
                let env = func.bind_arguments(args);
                Ok(ctx.eval(func.body(), env)?.unwrap_return())
            }
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match &self.body {
            MethodBody::Native(_) => "native",
            MethodBody::Interpreted(_) => "interpreted",
        };
        f.debug_struct("Method")
            .field("arity", &self.arity)
            .field("visibility", &self.visibility)
            .field("body", &body)
            .finish()
    }
}
