//! Per-object singleton classes.
//!
//! Extending a value pairs it with an eigenclass whose superclass is the
//! value's current class. The pairing (`Value::Extended`) replaces the value
//! in the caller's hands; extending it again reuses the same eigenclass.
//!
//! Objects and class objects are shared handles, so their eigenclass is also
//! recorded on the identity itself. Extending another handle to the same
//! object finds it there instead of creating a second one.

use crate::class::ClassRef;
use crate::class_table::ClassTable;
use crate::errors::{cant_define_singleton, EvalError};
use crate::method::Method;
use crate::value::Value;

/// The eigenclass of `value`, creating one if needed.
///
/// Returns the value to keep using (extended) alongside its eigenclass. A
/// `SelfRef` wrapper is dropped first so an eigenclass never wraps `self`.
pub fn singleton_class(value: &Value, classes: &ClassTable) -> Result<(Value, ClassRef), EvalError> {
    match value {
        Value::Extended(extended) => Ok((value.clone(), extended.eigenclass().clone())),
        Value::SelfRef(inner) => singleton_class(inner, classes),
        _ => {
            let Some(current) = classes.class_of(value) else {
                return Err(cant_define_singleton(value.type_tag().as_str()));
            };
            let eigenclass = if current.is_eigenclass() {
                current
            } else {
                let eigenclass = ClassRef::new_eigenclass(&value.inspect(), current);
                value.attach_singleton(&eigenclass);
                tracing::debug!(eigenclass = eigenclass.name(), "created eigenclass");
                eigenclass
            };
            Ok((Value::extended(value.clone(), eigenclass.clone()), eigenclass))
        }
    }
}

/// Add `method` to the eigenclass of `value`; returns the extended value.
pub fn define_singleton_method(
    value: &Value,
    name: &str,
    method: Method,
    classes: &ClassTable,
) -> Result<Value, EvalError> {
    let (extended, eigenclass) = singleton_class(value, classes)?;
    eigenclass.define_method(name, method);
    Ok(extended)
}

/// The class user code sees for `value`: one eigenclass level is skipped.
pub fn nominal_class(value: &Value, classes: &ClassTable) -> Option<ClassRef> {
    classes.class_of(value).map(|class| class.nominal())
}
