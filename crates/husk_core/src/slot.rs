//! Render-state slots
//!
//! A [`Slot`] describes a widget's current interaction state (`hover`,
//! `focus`, `active`, ...). It is handed to render-prop children and
//! slot-dependent class names, and its boolean entries become `data-*`
//! attributes on the rendered element.

use indexmap::IndexMap;

/// A single slot entry
#[derive(Clone, Debug, PartialEq)]
pub enum SlotValue {
    Bool(bool),
    Text(String),
    Number(f64),
}

impl From<bool> for SlotValue {
    fn from(value: bool) -> Self {
        SlotValue::Bool(value)
    }
}

impl From<&str> for SlotValue {
    fn from(value: &str) -> Self {
        SlotValue::Text(value.to_string())
    }
}

impl From<String> for SlotValue {
    fn from(value: String) -> Self {
        SlotValue::Text(value)
    }
}

impl From<f64> for SlotValue {
    fn from(value: f64) -> Self {
        SlotValue::Number(value)
    }
}

/// Ordered mapping from state name to value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slot {
    entries: IndexMap<String, SlotValue>,
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SlotValue>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.entries.get(name)
    }

    /// Boolean entry, `None` when missing or not a boolean
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.entries.get(name) {
            Some(SlotValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
