//! Prop bags and the prop merge engine
//!
//! A [`PropBag`] is the ordered set of attributes and event handlers attached
//! to an element. Widgets build their own bag, hover/focus/press detectors each
//! contribute one, and the caller supplies another; [`merge_props`] and
//! [`merge_props_advanced`] fold them into the single bag the element gets.
//!
//! # Merge rules
//!
//! - Keys starting with `on` whose value is a [`Handler`] are *chained*: every
//!   handler registered under that name runs, in bag order.
//! - Every other key is overwritten by later bags.
//!
//! ```ignore
//! use husk_core::props::{merge_props, PropBag};
//!
//! let ours = PropBag::new()
//!     .with("type", "button")
//!     .on("onClick", |_| println!("internal"));
//! let theirs = PropBag::new()
//!     .with("type", "submit")
//!     .on("onClick", |_| println!("caller"));
//!
//! // type = "submit", onClick runs "internal" then "caller"
//! let merged = merge_props([ours, theirs]);
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::events::Event;
use crate::node_ref::ElementRef;
use crate::slot::Slot;

/// Element event handler
///
/// Uses Rc since UI is single-threaded.
pub type Handler = Rc<dyn Fn(&Event)>;

/// Class name computed from the current slot
pub type ClassFn = Rc<dyn Fn(&Slot) -> String>;

/// Inline style declarations
pub type StyleMap = IndexMap<String, String>;

/// Prefix shared by every event handler prop name
pub const HANDLER_PREFIX: &str = "on";

/// Well-known prop names
pub mod keys {
    pub const CLASS_NAME: &str = "className";
    pub const REF: &str = "ref";
    pub const ID: &str = "id";
    pub const STYLE: &str = "style";
    pub const HIDDEN: &str = "hidden";
    pub const DISABLED: &str = "disabled";
    pub const ARIA_DISABLED: &str = "aria-disabled";
    pub const ARIA_LABELLEDBY: &str = "aria-labelledby";
    pub const TYPE: &str = "type";
    pub const AUTO_FOCUS: &str = "autoFocus";
}

/// A prop value
#[derive(Clone)]
pub enum PropValue {
    Text(String),
    Bool(bool),
    Number(f64),
    Style(StyleMap),
    ClassFn(ClassFn),
    Ref(ElementRef),
    Handler(Handler),
}

impl PropValue {
    /// Truthiness used for `disabled`-style checks
    ///
    /// Booleans are themselves, numbers are truthy unless zero or NaN, text is
    /// truthy unless empty or `"false"`, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Bool(value) => *value,
            PropValue::Number(value) => *value != 0.0 && !value.is_nan(),
            PropValue::Text(value) => !value.is_empty() && value != "false",
            _ => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            PropValue::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    pub fn as_element_ref(&self) -> Option<&ElementRef> {
        match self {
            PropValue::Ref(r) => Some(r),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<StyleMap> for PropValue {
    fn from(value: StyleMap) -> Self {
        PropValue::Style(value)
    }
}

impl From<ElementRef> for PropValue {
    fn from(value: ElementRef) -> Self {
        PropValue::Ref(value)
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(v) => write!(f, "{v:?}"),
            PropValue::Bool(v) => write!(f, "{v}"),
            PropValue::Number(v) => write!(f, "{v}"),
            PropValue::Style(v) => write!(f, "{v:?}"),
            PropValue::ClassFn(_) => write!(f, "<class fn>"),
            PropValue::Ref(r) => write!(f, "{r:?}"),
            PropValue::Handler(_) => write!(f, "<handler>"),
        }
    }
}

/// Wrap a closure as a handler prop value
pub fn handler<F>(f: F) -> PropValue
where
    F: Fn(&Event) + 'static,
{
    PropValue::Handler(Rc::new(f))
}

/// Wrap a closure as a slot-dependent class name prop value
pub fn class_fn<F>(f: F) -> PropValue
where
    F: Fn(&Slot) -> String + 'static,
{
    PropValue::ClassFn(Rc::new(f))
}

/// Ordered mapping from prop name to value
#[derive(Clone, Default)]
pub struct PropBag {
    entries: IndexMap<String, PropValue>,
}

impl PropBag {
    /// Create a new empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of an event handler
    pub fn on<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        self.insert(key, handler(f));
        self
    }

    /// Insert a value, returning the previous one. Existing keys keep their
    /// position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Text value of a key
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_text)
    }

    /// Handler stored under a key
    pub fn handler(&self, key: &str) -> Option<&Handler> {
        self.get(key).and_then(PropValue::as_handler)
    }

    /// Whether a key is present with a truthy value
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).map(PropValue::is_truthy).unwrap_or(false)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` over this bag (later wins)
    pub fn extend(&mut self, other: PropBag) {
        self.entries.extend(other.entries);
    }

    /// Keep only the entries for which `f` returns true
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &PropValue) -> bool,
    {
        self.entries.retain(|k, v| f(k, v));
    }

    /// Copy of this bag without the given keys
    pub fn omit(&self, keys: &[&str]) -> PropBag {
        let mut clone = self.clone();
        for key in keys {
            clone.remove(key);
        }
        clone
    }
}

impl IntoIterator for PropBag {
    type Item = (String, PropValue);
    type IntoIter = indexmap::map::IntoIter<String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, PropValue)> for PropBag {
    fn from_iter<T: IntoIterator<Item = (String, PropValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for PropBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Handlers collected per prop name, in registration order
type HandlerChains = IndexMap<String, SmallVec<[Handler; 2]>>;

/// Split bags into last-wins plain props and chained handlers
fn collect(bags: Vec<PropBag>) -> (PropBag, HandlerChains) {
    let mut target = PropBag::new();
    let mut chains = HandlerChains::new();

    for bag in bags {
        for (key, value) in bag {
            match value {
                PropValue::Handler(h) if key.starts_with(HANDLER_PREFIX) => {
                    chains.entry(key).or_default().push(h);
                }
                other => {
                    target.entries.insert(key, other);
                }
            }
        }
    }

    (target, chains)
}

/// Whether a handler name belongs to the pointer/mouse/keyboard activation
/// family (`onClick`, `onPointerDown`, `onKeyPress`, ...)
pub fn is_activation_handler(name: &str) -> bool {
    let Some(rest) = name.strip_prefix(HANDLER_PREFIX) else {
        return false;
    };
    let suffix = ["Click", "Pointer", "Mouse", "Key"]
        .iter()
        .find_map(|family| rest.strip_prefix(family));
    matches!(suffix, Some("" | "Down" | "Up" | "Press"))
}

/// Merge prop bags, chaining event handlers
///
/// Zero bags yield an empty bag and a single bag is returned as-is.
pub fn merge_props<I>(bags: I) -> PropBag
where
    I: IntoIterator<Item = PropBag>,
{
    let mut bags: Vec<PropBag> = bags.into_iter().collect();
    if bags.len() <= 1 {
        return bags.pop().unwrap_or_default();
    }

    let (mut target, chains) = collect(bags);
    for (name, handlers) in chains {
        target.insert(
            name,
            PropValue::Handler(Rc::new(move |event: &Event| {
                for h in &handlers {
                    h(event);
                }
            })),
        );
    }
    target
}

/// Merge prop bags with disabled suppression and `default_prevented`
/// short-circuiting
///
/// When the merged bag has a truthy `disabled` or `aria-disabled`, every
/// activation handler chain is replaced by one that only calls
/// `prevent_default`. Each combined chain stops as soon as a handler (or the
/// dispatcher) has prevented the default.
pub fn merge_props_advanced<I>(bags: I) -> PropBag
where
    I: IntoIterator<Item = PropBag>,
{
    let mut bags: Vec<PropBag> = bags.into_iter().collect();
    if bags.len() <= 1 {
        return bags.pop().unwrap_or_default();
    }

    let (mut target, mut chains) = collect(bags);

    if target.is_truthy(keys::DISABLED) || target.is_truthy(keys::ARIA_DISABLED) {
        for (name, handlers) in chains.iter_mut() {
            if is_activation_handler(name) {
                tracing::trace!(handler = name.as_str(), "suppressing handler on disabled element");
                handlers.clear();
                handlers.push(Rc::new(|event: &Event| event.prevent_default()));
            }
        }
    }

    for (name, handlers) in chains {
        target.insert(
            name,
            PropValue::Handler(Rc::new(move |event: &Event| {
                for h in &handlers {
                    if event.default_prevented() {
                        return;
                    }
                    h(event);
                }
            })),
        );
    }
    target
}
