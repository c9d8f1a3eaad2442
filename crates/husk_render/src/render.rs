//! Polymorphic rendering
//!
//! [`render`] turns a widget's own props and the caller's props into an
//! [`Element`]. The caller decides what the widget renders as (`as_tag`), may
//! pass render-prop children and slot-dependent class names, and may render
//! the widget as a Fragment around a single child element, in which case the
//! merged props are cloned onto that child.
//!
//! ```ignore
//! let element = render(
//!     RenderRequest::new("Button", "button")
//!         .our_props(PropBag::new().with("type", "button"))
//!         .their_props(ElementProps::new().as_tag("a").attr("href", "/home"))
//!         .slot(Slot::new().with("hover", true)),
//! )?;
//! ```

use bitflags::bitflags;
use husk_core::node_ref::ElementRef;
use husk_core::props::{class_fn, keys, merge_props_advanced, PropBag, PropValue, StyleMap};
use husk_core::slot::Slot;

use crate::class_names::class_names;
use crate::element::{Children, Element, ElementProps, Tag};
use crate::error::{RenderError, Result};
use crate::refs::{DefaultMergeRefs, MergeRefs};
use crate::state_attrs::state_attributes;

bitflags! {
    /// Hidden-state behaviours a widget supports
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RenderFeatures: u8 {
        /// No features
        const NONE = 0;
        /// Honour the caller's `unmount` choice when not visible
        const RENDER_STRATEGY = 1 << 0;
        /// Honour the caller's `static` flag and always render
        const STATIC = 1 << 1;
    }
}

/// How a non-visible widget with [`RenderFeatures::RENDER_STRATEGY`] renders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Render nothing
    Unmount,
    /// Render with `hidden` and `display: none`
    Hidden,
}

/// Everything needed for one render pass
pub struct RenderRequest<'a> {
    /// Props the widget sets itself; these win over the caller's
    pub our_props: PropBag,
    pub their_props: ElementProps,
    pub slot: Slot,
    pub default_tag: Tag,
    pub features: RenderFeatures,
    pub visible: bool,
    /// Component name used in diagnostics
    pub name: &'a str,
    /// Ref merging strategy; [`DefaultMergeRefs`] when unset
    pub merge_refs: Option<&'a dyn MergeRefs>,
}

impl<'a> RenderRequest<'a> {
    pub fn new(name: &'a str, default_tag: impl Into<Tag>) -> Self {
        Self {
            our_props: PropBag::new(),
            their_props: ElementProps::default(),
            slot: Slot::new(),
            default_tag: default_tag.into(),
            features: RenderFeatures::NONE,
            visible: true,
            name,
            merge_refs: None,
        }
    }

    pub fn our_props(mut self, props: PropBag) -> Self {
        self.our_props = props;
        self
    }

    pub fn their_props(mut self, props: ElementProps) -> Self {
        self.their_props = props;
        self
    }

    pub fn slot(mut self, slot: Slot) -> Self {
        self.slot = slot;
        self
    }

    pub fn features(mut self, features: RenderFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn merge_refs(mut self, strategy: &'a dyn MergeRefs) -> Self {
        self.merge_refs = Some(strategy);
        self
    }
}

/// Where and how the merged props land
struct Target<'a> {
    tag: Tag,
    children: Children,
    ref_name: String,
    slot: &'a Slot,
    name: &'a str,
    merge_refs: &'a dyn MergeRefs,
}

/// Render a widget
///
/// Returns `Ok(None)` when the widget is hidden with the unmount strategy.
/// The only error is [`RenderError::FragmentProps`].
pub fn render(request: RenderRequest<'_>) -> Result<Option<Element>> {
    let RenderRequest {
        our_props,
        their_props,
        slot,
        default_tag,
        features,
        visible,
        name,
        merge_refs,
    } = request;
    let ElementProps {
        as_tag,
        children,
        ref_name,
        unmount,
        static_render,
        attrs,
    } = their_props;

    let mut props = merge_props_advanced([attrs, our_props]);
    let target = Target {
        tag: as_tag.unwrap_or(default_tag),
        children,
        ref_name: ref_name.unwrap_or_else(|| keys::REF.to_string()),
        slot: &slot,
        name,
        merge_refs: merge_refs.unwrap_or(&DefaultMergeRefs as &dyn MergeRefs),
    };

    if visible {
        return render_element(props, target).map(Some);
    }

    if features.contains(RenderFeatures::STATIC) && static_render {
        tracing::trace!(component = name, "static component rendered while not visible");
        return render_element(props, target).map(Some);
    }

    if features.contains(RenderFeatures::RENDER_STRATEGY) {
        let strategy = if unmount.unwrap_or(true) {
            RenderStrategy::Unmount
        } else {
            RenderStrategy::Hidden
        };
        tracing::trace!(component = name, ?strategy, "rendering non-visible component");

        return match strategy {
            RenderStrategy::Unmount => Ok(None),
            RenderStrategy::Hidden => {
                let mut style = StyleMap::new();
                style.insert("display".to_string(), "none".to_string());
                props.insert(keys::HIDDEN, true);
                props.insert(keys::STYLE, style);
                render_element(props, target).map(Some)
            }
        };
    }

    render_element(props, target).map(Some)
}

fn render_element(mut props: PropBag, target: Target<'_>) -> Result<Element> {
    let Target {
        tag,
        children,
        ref_name,
        slot,
        name,
        merge_refs,
    } = target;

    let node_ref = props
        .get(keys::REF)
        .and_then(PropValue::as_element_ref)
        .cloned();
    let children = children.resolve(slot);

    if let Some(PropValue::ClassFn(f)) = props.get(keys::CLASS_NAME).cloned() {
        props.insert(keys::CLASS_NAME, f(slot));
    }

    let labels_itself = match (props.text(keys::ARIA_LABELLEDBY), props.text(keys::ID)) {
        (Some(labelledby), Some(id)) => !labelledby.is_empty() && labelledby == id,
        _ => false,
    };
    if labels_itself {
        props.remove(keys::ARIA_LABELLEDBY);
    }

    let data_attrs = state_attributes(slot);

    let children = if tag.is_fragment() && !(props.is_empty() && data_attrs.is_empty()) {
        match children.into_single_element() {
            Ok(child) => {
                tracing::debug!(component = name, "forwarding props onto the Fragment child");
                return Ok(clone_into_child(child, props, data_attrs, node_ref, &ref_name, merge_refs));
            }
            Err(children) if props.is_empty() => {
                tracing::trace!(component = name, "dropping state attributes on Fragment");
                children
            }
            Err(_) => {
                let keys: Vec<String> = props
                    .keys()
                    .chain(data_attrs.keys())
                    .map(str::to_string)
                    .collect();
                tracing::warn!(component = name, ?keys, "cannot forward props through a Fragment");
                return Err(RenderError::FragmentProps {
                    component: name.to_string(),
                    keys,
                });
            }
        }
    } else {
        children
    };

    props.remove(keys::REF);
    if !tag.is_fragment() {
        if let Some(node_ref) = node_ref {
            props.insert(ref_name, node_ref);
        }
        props.extend(data_attrs);
    }
    Ok(Element::create(tag, props, children))
}

fn clone_into_child(
    child: Element,
    props: PropBag,
    data_attrs: PropBag,
    node_ref: Option<ElementRef>,
    ref_name: &str,
    merge_refs: &dyn MergeRefs,
) -> Element {
    let Element {
        tag,
        props: child_props,
        node_ref: child_ref,
        children,
    } = child;

    let incoming_class = props.text(keys::CLASS_NAME).map(str::to_string);
    let class_name = match child_props.get(keys::CLASS_NAME) {
        Some(PropValue::ClassFn(f)) => {
            let f = f.clone();
            Some(class_fn(move |slot| {
                class_names([Some(f(slot).as_str()), incoming_class.as_deref()])
            }))
        }
        other => {
            let joined = class_names([other.and_then(PropValue::as_text), incoming_class.as_deref()]);
            (!joined.is_empty()).then(|| PropValue::from(joined))
        }
    };

    let mut merged = merge_props_advanced([child_props, props.omit(&[keys::REF])]);
    for (key, value) in data_attrs {
        if !merged.contains_key(&key) {
            merged.insert(key, value);
        }
    }

    let mut forwarded = None;
    if let Some(node_ref) = node_ref {
        if ref_name == keys::REF {
            forwarded = Some(node_ref);
        } else {
            merged.insert(ref_name, node_ref);
        }
    }
    let node_ref = merge_refs.merge_refs(&[child_ref, forwarded]);

    if let Some(class_name) = class_name {
        merged.insert(keys::CLASS_NAME, class_name);
    }

    Element {
        tag,
        props: merged,
        node_ref,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Component, Node};
    use crate::refs::RefMerger;
    use crate::state_attrs::STATE_ATTRIBUTE;
    use husk_core::events::{event_types, Event};
    use husk_core::node_ref::RefContainer;
    use husk_core::{MemoryDocument, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn request(name: &str) -> RenderRequest<'_> {
        RenderRequest::new(name, "div")
    }

    fn rendered(request: RenderRequest<'_>) -> Element {
        render(request).expect("render ok").expect("element")
    }

    #[test]
    fn test_visible_renders_default_tag() {
        let element = rendered(
            request("Box")
                .our_props(PropBag::new().with("type", "button"))
                .their_props(ElementProps::new().attr("type", "submit").attr("title", "t")),
        );

        assert_eq!(element.tag, Tag::from("div"));
        // Own props win over the caller's
        assert_eq!(element.text("type"), Some("button"));
        assert_eq!(element.text("title"), Some("t"));
    }

    #[test]
    fn test_as_tag_overrides_default() {
        let element = rendered(request("Box").their_props(ElementProps::new().as_tag("a")));
        assert_eq!(element.tag.host_name(), Some("a"));

        let card = Component::new("Card", |_, _| None);
        let element = rendered(request("Box").their_props(ElementProps::new().as_tag(card.clone())));
        assert_eq!(element.tag, Tag::Component(card));
    }

    #[test]
    fn test_caller_handler_runs_before_own() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (theirs, ours) = (log.clone(), log.clone());
        let element = rendered(
            request("Box")
                .our_props(PropBag::new().on("onClick", move |_| ours.borrow_mut().push("ours")))
                .their_props(ElementProps::new().on("onClick", move |_| theirs.borrow_mut().push("theirs"))),
        );

        element.dispatch(&Event::new(event_types::CLICK));
        assert_eq!(*log.borrow(), vec!["theirs", "ours"]);
    }

    #[test]
    fn test_unmount_strategy() {
        let result = render(
            request("Panel")
                .features(RenderFeatures::RENDER_STRATEGY)
                .visible(false),
        )
        .expect("render ok");
        assert!(result.is_none());
    }

    #[test]
    fn test_hidden_strategy() {
        let element = rendered(
            request("Panel")
                .features(RenderFeatures::RENDER_STRATEGY)
                .visible(false)
                .their_props(ElementProps::new().unmount(false)),
        );

        assert!(element.props.is_truthy("hidden"));
        match element.prop("style") {
            Some(PropValue::Style(style)) => {
                assert_eq!(style.get("display").map(String::as_str), Some("none"));
            }
            other => panic!("unexpected style {other:?}"),
        }
    }

    #[test]
    fn test_static_renders_while_not_visible() {
        let element = rendered(
            request("Panel")
                .features(RenderFeatures::STATIC | RenderFeatures::RENDER_STRATEGY)
                .visible(false)
                .their_props(ElementProps::new().static_render(true)),
        );
        assert!(!element.has_prop("hidden"));

        // Without the flag the render strategy applies
        let result = render(
            request("Panel")
                .features(RenderFeatures::STATIC | RenderFeatures::RENDER_STRATEGY)
                .visible(false),
        )
        .expect("render ok");
        assert!(result.is_none());
    }

    #[test]
    fn test_no_features_renders_when_not_visible() {
        let element = rendered(request("Panel").visible(false));
        assert_eq!(element.tag.host_name(), Some("div"));
    }

    #[test]
    fn test_class_name_function_gets_slot() {
        let element = rendered(
            request("Box")
                .slot(Slot::new().with("hover", true))
                .their_props(ElementProps::new().attr(
                    "className",
                    class_fn(|slot| {
                        let class = if slot.get_bool("hover") == Some(true) { "hovered" } else { "idle" };
                        class.to_string()
                    }),
                )),
        );
        assert_eq!(element.class_name(), Some("hovered"));
    }

    #[test]
    fn test_render_prop_children_get_slot() {
        let element = rendered(
            request("Box")
                .slot(Slot::new().with("open", true))
                .their_props(ElementProps::new().children(Children::render_prop(|slot| {
                    Children::one(if slot.get_bool("open") == Some(true) { "open" } else { "closed" })
                }))),
        );
        assert!(matches!(element.children.nodes(), [Node::Text(t)] if t == "open"));
    }

    #[test]
    fn test_self_referencing_aria_labelledby() {
        let element = rendered(
            request("Box").their_props(ElementProps::new().attr("id", "x").attr("aria-labelledby", "x")),
        );
        assert!(!element.has_prop("aria-labelledby"));

        let element = rendered(
            request("Box").their_props(ElementProps::new().attr("id", "x").attr("aria-labelledby", "x y")),
        );
        assert_eq!(element.text("aria-labelledby"), Some("x y"));
    }

    #[test]
    fn test_data_attributes_on_element() {
        let element = rendered(request("Box").slot(Slot::new().with("autoFocus", true).with("hover", false)));

        assert_eq!(element.text(STATE_ATTRIBUTE), Some("auto-focus"));
        assert_eq!(element.text("data-auto-focus"), Some(""));
        assert!(!element.has_prop("data-hover"));
    }

    #[test]
    fn test_ref_exposed_under_ref_name() {
        let container = RefContainer::new();
        let element = rendered(
            request("Box").our_props(PropBag::new().with("ref", ElementRef::from(container.clone()))),
        );
        assert!(element.node_ref.is_some());

        let element = rendered(
            request("Box")
                .our_props(PropBag::new().with("ref", ElementRef::from(container)))
                .their_props(ElementProps::new().ref_name("innerRef")),
        );
        assert!(element.node_ref.is_none());
        assert!(matches!(element.prop("innerRef"), Some(PropValue::Ref(_))));
    }

    #[test]
    fn test_fragment_with_two_children_errors() {
        let err = render(
            request("Menu").their_props(
                ElementProps::new()
                    .as_tag(Tag::Fragment)
                    .attr("className", "menu")
                    .children(Children::many([Element::new("a"), Element::new("b")])),
            ),
        )
        .expect_err("fragment props cannot be forwarded");

        let RenderError::FragmentProps { component, keys } = err;
        assert_eq!(component, "Menu");
        assert_eq!(keys, vec!["className".to_string()]);
    }

    #[test]
    fn test_fragment_error_lists_data_attributes() {
        let err = render(
            request("Menu")
                .slot(Slot::new().with("open", true))
                .their_props(ElementProps::new().as_tag(Tag::Fragment).attr("id", "m").child("text")),
        )
        .expect_err("text child cannot receive props");

        let RenderError::FragmentProps { keys, .. } = err;
        assert_eq!(keys, vec!["id", STATE_ATTRIBUTE, "data-open"]);
    }

    #[test]
    fn test_fragment_with_only_data_attributes_drops_them() {
        let element = rendered(
            request("Menu")
                .slot(Slot::new().with("open", true))
                .their_props(
                    ElementProps::new()
                        .as_tag(Tag::Fragment)
                        .children(Children::many([Element::new("a"), Element::new("b")])),
                ),
        );

        assert!(element.tag.is_fragment());
        assert!(element.props.is_empty());
        assert_eq!(element.children.len(), 2);
    }

    #[test]
    fn test_fragment_clones_single_child() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (child_log, own_log) = (log.clone(), log.clone());

        let child = Element::create(
            "a",
            PropBag::new()
                .with("className", "link")
                .with("href", "/docs")
                .with("data-open", "custom")
                .on("onClick", move |_| child_log.borrow_mut().push("child")),
            Children::one("Docs"),
        );

        let element = rendered(
            request("Button")
                .slot(Slot::new().with("open", true))
                .our_props(
                    PropBag::new()
                        .with("className", "btn")
                        .on("onClick", move |_| own_log.borrow_mut().push("own")),
                )
                .their_props(ElementProps::new().as_tag(Tag::Fragment).child(child)),
        );

        assert_eq!(element.tag.host_name(), Some("a"));
        assert_eq!(element.text("href"), Some("/docs"));
        assert_eq!(element.class_name(), Some("link btn"));
        // The child's own data attribute wins
        assert_eq!(element.text("data-open"), Some("custom"));
        assert_eq!(element.text(STATE_ATTRIBUTE), Some("open"));
        assert!(matches!(element.children.nodes(), [Node::Text(t)] if t == "Docs"));

        element.dispatch(&Event::new(event_types::CLICK));
        assert_eq!(*log.borrow(), vec!["child", "own"]);
    }

    #[test]
    fn test_fragment_clone_keeps_class_function() {
        let child = Element::create(
            "a",
            PropBag::new().with(
                "className",
                class_fn(|slot| {
                    let class = if slot.get_bool("active") == Some(true) { "on" } else { "off" };
                    class.to_string()
                }),
            ),
            Children::None,
        );

        let element = rendered(
            request("Item")
                .their_props(ElementProps::new().as_tag(Tag::Fragment).attr("className", "item").child(child)),
        );

        let Some(PropValue::ClassFn(f)) = element.prop("className") else {
            panic!("class name should stay slot dependent");
        };
        assert_eq!(f(&Slot::new().with("active", true)), "on item");
        assert_eq!(f(&Slot::new()), "off item");
    }

    #[test]
    fn test_fragment_clone_merges_refs() {
        let doc = MemoryDocument::new();
        let node = doc.create_node(Rect::default());
        let ours = RefContainer::new();
        let childs = RefContainer::new();
        let merger = RefMerger::new();

        let child = Element::new("input").with_ref(childs.clone());
        let element = rendered(
            request("Field")
                .merge_refs(&merger)
                .our_props(PropBag::new().with("ref", ElementRef::from(ours.clone())))
                .their_props(ElementProps::new().as_tag(Tag::Fragment).child(child)),
        );

        element.attach(Some(node));
        assert_eq!(ours.get(), Some(node));
        assert_eq!(childs.get(), Some(node));
        assert!(!element.has_prop("ref"));
    }

    #[test]
    fn test_fragment_clone_with_custom_ref_name() {
        let doc = MemoryDocument::new();
        let node = doc.create_node(Rect::default());
        let ours = RefContainer::new();
        let childs = RefContainer::new();

        let child = Element::new("input").with_ref(childs.clone());
        let element = rendered(
            request("Field")
                .our_props(PropBag::new().with("ref", ElementRef::from(ours.clone())))
                .their_props(
                    ElementProps::new()
                        .as_tag(Tag::Fragment)
                        .ref_name("innerRef")
                        .child(child),
                ),
        );

        // Our ref is handed to the child under the custom name
        let Some(PropValue::Ref(inner)) = element.prop("innerRef") else {
            panic!("innerRef should carry our ref");
        };
        assert!(!element.has_prop("ref"));

        // Only the child's own ref is attached to the node
        element.attach(Some(node));
        assert_eq!(childs.get(), Some(node));
        assert_eq!(ours.get(), None);

        inner.set(Some(node));
        assert_eq!(ours.get(), Some(node));
    }

    #[test]
    fn test_disabled_suppresses_caller_handlers() {
        let clicked = Rc::new(RefCell::new(false));
        let c = clicked.clone();
        let element = rendered(
            request("Box")
                .our_props(PropBag::new().with("disabled", true))
                .their_props(ElementProps::new().on("onClick", move |_| *c.borrow_mut() = true)),
        );

        let event = Event::new(event_types::CLICK);
        element.dispatch(&event);
        assert!(event.default_prevented());
        assert!(!*clicked.borrow());
    }
}
