//! Live method-call stack with a depth limit.

use std::cell::RefCell;

use garnet_object::{stack_level_too_deep, EvalError};

/// Live call stack of a runtime session.
///
/// Each invocation pushes a frame and pops it when the body finishes. The
/// depth check is part of `push`, so a frame is never recorded past the
/// limit.
#[derive(Debug)]
pub(crate) struct CallStack {
    frames: RefCell<Vec<String>>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `None` means unlimited; the native stack is still grown on demand.
    pub(crate) fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: RefCell::new(Vec::new()),
            max_depth,
        }
    }

    /// Record a call to `name`; the frame is popped when the guard drops.
    pub(crate) fn push(&self, name: &str) -> Result<FrameGuard<'_>, EvalError> {
        let mut frames = self.frames.borrow_mut();
        if let Some(max) = self.max_depth {
            if frames.len() >= max {
                tracing::warn!(
                    depth = frames.len(),
                    method = name,
                    caller = ?frames.last(),
                    "call depth limit reached"
                );
                return Err(stack_level_too_deep(max));
            }
        }
        frames.push(name.to_string());
        Ok(FrameGuard { stack: self })
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    pub(crate) fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

/// Pops its frame on drop, including when the body returned an error.
pub(crate) struct FrameGuard<'a> {
    stack: &'a CallStack,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.stack.frames.borrow_mut().pop();
    }
}
