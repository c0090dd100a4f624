use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::object::{Bindings, EvaluationError, Object};

/// Default ceiling for nested function calls.
pub const MAX_CALL_DEPTH: usize = 500;

/// Session state: the active frame plus the nested call counter.
///
/// There is no parent chain. A call swaps in a fresh frame for its duration
/// (see [`CallScope`]) and the session frame comes back when it returns.
#[derive(Debug, Clone)]
pub struct Environment {
    frame: Bindings,
    call_depth: usize,
    max_call_depth: usize,
}

impl Environment {
    pub fn new() -> Self {
        Self::with_max_call_depth(MAX_CALL_DEPTH)
    }

    pub fn with_max_call_depth(max_call_depth: usize) -> Self {
        Environment {
            frame: Bindings::new(),
            call_depth: 0,
            max_call_depth,
        }
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        self.frame.get(key).cloned()
    }

    pub fn set(&mut self, key: Rc<str>, value: Object) {
        self.frame.insert(key, value);
    }

    /// Bindings of the active frame, ordered by name.
    pub fn bindings(&self) -> Vec<(&str, &Object)> {
        let mut bindings: Vec<_> = self
            .frame
            .iter()
            .map(|(name, value)| (name.as_ref(), value))
            .collect();
        bindings.sort_unstable_by_key(|(name, _)| *name);
        bindings
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub(crate) fn frame(&self) -> &Bindings {
        &self.frame
    }

    /// Counts one more nested call. Past the ceiling the counter is reset to
    /// zero and the call is refused.
    pub(crate) fn enter_call(&mut self) -> Result<CallScope<'_>, EvaluationError> {
        self.call_depth += 1;
        if self.call_depth > self.max_call_depth {
            self.call_depth = 0;
            return Err(EvaluationError::MaxStackSizeExceeded(self.max_call_depth));
        }
        Ok(CallScope {
            environment: self,
            caller_frame: None,
        })
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// One active call. Dropping it puts the caller's frame back and decrements
/// the call counter, whichever way the call ends.
pub(crate) struct CallScope<'a> {
    environment: &'a mut Environment,
    caller_frame: Option<Bindings>,
}

impl<'a> CallScope<'a> {
    /// Makes `frame` the active frame until the scope is dropped.
    pub(crate) fn enter_frame(&mut self, frame: Bindings) {
        let caller_frame = std::mem::replace(&mut self.environment.frame, frame);
        // Only the first swap holds the caller's frame.
        self.caller_frame.get_or_insert(caller_frame);
    }
}

impl<'a> Deref for CallScope<'a> {
    type Target = Environment;

    fn deref(&self) -> &Environment {
        self.environment
    }
}

impl<'a> DerefMut for CallScope<'a> {
    fn deref_mut(&mut self) -> &mut Environment {
        self.environment
    }
}

impl<'a> Drop for CallScope<'a> {
    fn drop(&mut self) {
        if let Some(frame) = self.caller_frame.take() {
            self.environment.frame = frame;
        }
        // Saturates: an overflow further down may already have reset it.
        self.environment.call_depth = self.environment.call_depth.saturating_sub(1);
    }
}
