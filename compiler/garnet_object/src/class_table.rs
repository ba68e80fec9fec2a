//! Name to class registry, owned by one runtime session.
//!
//! The builtin hierarchy is created up front, before any user code runs;
//! `Kernel` is the root of every class chain.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::class::ClassRef;
use crate::errors::{not_a, superclass_mismatch, EvalError};
use crate::value::Value;

/// Handles to the builtin classes, for fast access without a name lookup.
#[derive(Clone, Debug)]
pub struct CoreClasses {
    pub kernel: ClassRef,
    pub object: ClassRef,
    pub module: ClassRef,
    pub class: ClassRef,
    pub nil_class: ClassRef,
    pub true_class: ClassRef,
    pub false_class: ClassRef,
    pub integer: ClassRef,
    pub string: ClassRef,
    pub symbol: ClassRef,
    pub array: ClassRef,
    pub exception: ClassRef,
    pub standard_error: ClassRef,
    pub runtime_error: ClassRef,
}

/// Every named class and module of a session.
///
/// Definition takes `&self` so user code can define classes while a method
/// body is running; the name map is never borrowed across a call.
pub struct ClassTable {
    by_name: RefCell<FxHashMap<String, ClassRef>>,
    core: CoreClasses,
}

impl ClassTable {
    /// A table holding only the builtin hierarchy (no methods installed).
    pub fn new() -> Self {
        let mut by_name = FxHashMap::default();
        let mut register = |class: ClassRef| {
            by_name.insert(class.name().to_string(), class.clone());
            class
        };
        let sub = |name: &str, superclass: &ClassRef| ClassRef::new_class(name, Some(superclass.clone()));

        let kernel = register(ClassRef::new_module("Kernel"));
        let object = register(sub("Object", &kernel));
        let nil_class = register(sub("NilClass", &object));
        let true_class = register(sub("TrueClass", &object));
        let false_class = register(sub("FalseClass", &object));
        let integer = register(sub("Integer", &object));
        let string = register(sub("String", &object));
        let symbol = register(sub("Symbol", &object));
        let array = register(sub("Array", &object));
        let module = register(sub("Module", &object));
        let class = register(sub("Class", &module));

        let exception = register(sub("Exception", &object));
        let standard_error = register(sub("StandardError", &exception));
        let name_error = register(sub("NameError", &standard_error));
        register(sub("NoMethodError", &name_error));
        register(sub("ArgumentError", &standard_error));
        register(sub("TypeError", &standard_error));
        register(sub("ZeroDivisionError", &standard_error));
        let runtime_error = register(sub("RuntimeError", &standard_error));
        register(sub("RangeError", &standard_error));
        let script_error = register(sub("ScriptError", &exception));
        register(sub("LoadError", &script_error));
        register(sub("SystemStackError", &exception));

        ClassTable {
            by_name: RefCell::new(by_name),
            core: CoreClasses {
                kernel,
                object,
                module,
                class,
                nil_class,
                true_class,
                false_class,
                integer,
                string,
                symbol,
                array,
                exception,
                standard_error,
                runtime_error,
            },
        }
    }

    pub fn core(&self) -> &CoreClasses {
        &self.core
    }

    pub fn get(&self, name: &str) -> Option<ClassRef> {
        self.by_name.borrow().get(name).cloned()
    }

    /// Define `name`, or reopen it if it already exists.
    ///
    /// A new class without an explicit superclass inherits from `Object`.
    /// Reopening with a different superclass than the existing one fails.
    pub fn define_class(
        &self,
        name: &str,
        superclass: Option<&ClassRef>,
    ) -> Result<ClassRef, EvalError> {
        if let Some(existing) = self.get(name) {
            if existing.is_module() {
                return Err(not_a(name, "class"));
            }
            if let Some(requested) = superclass {
                if existing.superclass() != Some(requested) {
                    return Err(superclass_mismatch(name));
                }
            }
            return Ok(existing);
        }
        let superclass = match superclass {
            Some(parent) if parent.is_module() => return Err(not_a(parent.name(), "class")),
            Some(parent) => parent.clone(),
            None => self.core.object.clone(),
        };
        tracing::debug!(class = name, superclass = superclass.name(), "define class");
        let class = ClassRef::new_class(name, Some(superclass));
        self.by_name.borrow_mut().insert(name.to_string(), class.clone());
        Ok(class)
    }

    /// Define or reopen module `name`.
    pub fn define_module(&self, name: &str) -> Result<ClassRef, EvalError> {
        if let Some(existing) = self.get(name) {
            if !existing.is_module() {
                return Err(not_a(name, "module"));
            }
            return Ok(existing);
        }
        tracing::debug!(module = name, "define module");
        let module = ClassRef::new_module(name);
        self.by_name.borrow_mut().insert(name.to_string(), module.clone());
        Ok(module)
    }

    /// Dispatch class of `value`: its eigenclass if extended.
    pub fn class_of(&self, value: &Value) -> Option<ClassRef> {
        value.class(&self.core)
    }

    /// User-facing class name of `value`, for messages.
    ///
    /// Skips an eigenclass; falls back to the type tag for classless values.
    pub fn class_name_of(&self, value: &Value) -> String {
        match self.class_of(value) {
            Some(class) => class.nominal().name().to_string(),
            None => value.type_tag().to_string(),
        }
    }

    /// Exception class registered as `name`, or `RuntimeError` if there is none.
    pub fn exception_class(&self, name: &str) -> ClassRef {
        self.get(name)
            .unwrap_or_else(|| self.core.runtime_error.clone())
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}
