//! `data-*` attributes derived from the slot

use husk_core::props::PropBag;
use husk_core::slot::{Slot, SlotValue};

/// Attribute listing every active state, space separated
pub const STATE_ATTRIBUTE: &str = "data-husk-state";

/// Dash-case a state name: `autoFocus` -> `auto-focus`
pub fn dash_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Derive state attributes from a slot
///
/// Nothing is derived unless the slot has at least one boolean entry. Then
/// the combined [`STATE_ATTRIBUTE`] lists the true entries and each of them
/// also gets an empty `data-<state>` attribute.
pub fn state_attributes(slot: &Slot) -> PropBag {
    let mut expose = false;
    let mut states = Vec::new();
    for (name, value) in slot.iter() {
        if let SlotValue::Bool(on) = value {
            expose = true;
            if *on {
                states.push(dash_case(name));
            }
        }
    }

    let mut attrs = PropBag::new();
    if !expose {
        return attrs;
    }
    attrs.insert(STATE_ATTRIBUTE, states.join(" "));
    for state in states {
        attrs.insert(format!("data-{state}"), "");
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_case() {
        assert_eq!(dash_case("autoFocus"), "auto-focus");
        assert_eq!(dash_case("hover"), "hover");
        assert_eq!(dash_case("isHTMLReady"), "is-h-t-m-l-ready");
    }

    #[test]
    fn test_combined_state_lists_true_entries() {
        let slot = Slot::new().with("autoFocus", true).with("hover", false);
        let attrs = state_attributes(&slot);

        assert_eq!(attrs.text(STATE_ATTRIBUTE), Some("auto-focus"));
        assert_eq!(attrs.text("data-auto-focus"), Some(""));
        assert!(!attrs.contains_key("data-hover"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_all_false_still_exposes_state() {
        let attrs = state_attributes(&Slot::new().with("open", false));
        assert_eq!(attrs.text(STATE_ATTRIBUTE), Some(""));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_non_boolean_slot_derives_nothing() {
        let slot = Slot::new().with("label", "Save").with("count", 2.0);
        assert!(state_attributes(&slot).is_empty());
        assert!(state_attributes(&Slot::new()).is_empty());
    }
}
