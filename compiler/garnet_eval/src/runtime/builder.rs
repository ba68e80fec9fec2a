//! `RuntimeBuilder` for creating `Runtime` instances with various configurations.

use garnet_object::{ClassTable, Value};

use super::call_stack::CallStack;
use super::Runtime;
use crate::builtins;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Call depth limit used unless the builder is told otherwise.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Builder for [`Runtime`].
///
/// Defaults: output to stdout, call depth limited to
/// [`DEFAULT_MAX_CALL_DEPTH`].
pub struct RuntimeBuilder {
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: Option<usize>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        RuntimeBuilder {
            print_handler: None,
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
        }
    }

    /// Where `puts` writes. Use `buffer_handler()` to capture output.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Maximum nesting of method invocations. `None` removes the limit.
    #[must_use]
    pub fn max_call_depth(mut self, limit: Option<usize>) -> Self {
        self.max_call_depth = limit;
        self
    }

    /// Build the runtime with the builtin classes, `Kernel` and the global
    /// functions installed.
    pub fn build(self) -> Runtime {
        let classes = ClassTable::new();
        builtins::install(&classes);
        let main = Value::object(classes.core().object.clone());
        tracing::debug!(max_call_depth = ?self.max_call_depth, "runtime ready");

        Runtime {
            classes,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            call_stack: CallStack::new(self.max_call_depth),
            main,
            globals: builtins::globals(),
        }
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
