//! Stack growth for recursive method invocation.
//!
//! Interpreted methods re-enter the dispatcher through the evaluator, so a
//! recursive Garnet method turns into recursive Rust frames: dispatcher,
//! evaluator, dispatcher again. The call-depth limit on the runtime bounds
//! how deep that goes; this crate makes sure the host stack can actually hold
//! that many frames.
//!
//! - **Native targets**: grows the stack on demand via `stacker`.
//! - **WASM targets**: plain passthrough.

/// Remaining stack below which a new segment is allocated (128KB).
///
/// A single dispatch round trip (invoke, method body, evaluator callback)
/// can use several KB, so this leaves room for a handful of them.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// The dispatcher wraps every method body in this, so arbitrarily deep
/// interpreted recursion fails with the runtime's `stack level too deep`
/// error rather than a host stack overflow.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack in bytes, if the platform can report it.
///
/// Used in dispatch tracing to show how close a deep call chain is to the
/// next segment allocation.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

/// WASM version: not observable.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
