//! Method resolution.
//!
//! Resolution walks the receiver's chain from its dispatch class (the
//! eigenclass for an extended object) through each superclass. The first
//! class defining the name wins; no class is visited twice because chains
//! are acyclic.

use garnet_object::{CallSite, ClassRef, ClassTable, Method, Value};

/// A resolved method and the class that defines it.
#[derive(Clone, Debug)]
pub struct ResolvedMethod {
    pub method: Method,
    pub owner: ClassRef,
}

/// Find `name` starting at `class`.
///
/// The method is cloned out of the owner's table, so no borrow outlives the
/// lookup and the body is free to define methods on the same class.
pub fn resolve(class: &ClassRef, name: &str) -> Option<ResolvedMethod> {
    for owner in class.ancestors() {
        tracing::trace!(class = owner.name(), method = name, "lookup");
        if let Some(method) = owner.lookup_own(name) {
            return Some(ResolvedMethod { method, owner });
        }
    }
    None
}

/// Whether a call to `name` from `call_site` would find a callable method.
pub fn respond_to(class: &ClassRef, name: &str, call_site: CallSite) -> bool {
    resolve(class, name).is_some_and(|r| call_site.permits(r.method.visibility()))
}

/// Receiver text for `NoMethodError` messages: `inspect:ClassName`.
pub fn describe_receiver(receiver: &Value, classes: &ClassTable) -> String {
    format!("{}:{}", receiver.inspect(), classes.class_name_of(receiver))
}
