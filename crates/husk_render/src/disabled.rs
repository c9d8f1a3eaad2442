//! Disabled state provided by an enclosing scope
//!
//! A fieldset-like container can disable every widget inside it. The value
//! is threaded explicitly: containers create a nested context with
//! [`DisabledContext::provide`] and pass it down to the widgets they render.

/// Disabled value visible to a widget
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisabledContext {
    value: Option<bool>,
}

impl DisabledContext {
    /// Root context with nothing provided
    pub fn new() -> Self {
        Self::default()
    }

    /// Nested context whose value replaces this one
    pub fn provide(&self, value: Option<bool>) -> Self {
        Self { value }
    }

    /// The provided value, if any
    pub fn value(&self) -> Option<bool> {
        self.value
    }

    /// The provided value, `false` when nothing was provided
    pub fn is_disabled(&self) -> bool {
        self.value.unwrap_or(false)
    }
}
