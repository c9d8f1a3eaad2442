//! Headless button
//!
//! Composes focus-ring, hover and press tracking into a button that renders
//! as any tag the caller picks. The slot exposes `disabled`, `hover`, `focus`,
//! `active` and `autofocus`, which also become `data-*` attributes.
//!
//! # Example
//!
//! ```ignore
//! use husk_widgets::prelude::*;
//!
//! let doc = MemoryDocument::new();
//! let button = Button::new(doc.clone());
//! button.on_change(|| request_render());
//!
//! let element = button.render(
//!     ButtonProps::new()
//!         .button_type(ButtonType::Submit)
//!         .element(ElementProps::new().child("Save")),
//!     &DisabledContext::new(),
//!     None,
//! )?;
//! ```

use std::rc::Rc;

use husk_core::dom::Host;
use husk_core::node_ref::ElementRef;
use husk_core::props::{keys, merge_props, PropBag};
use husk_core::slot::Slot;
use husk_render::{
    render, ActivePress, DisabledContext, DisplayName, Element, ElementProps, FocusRing,
    FocusRingConfig, Hover, HoverConfig, PressConfig, RefMerger, RenderRequest, Result,
};

/// Tag a button renders as unless the caller overrides it
pub const DEFAULT_BUTTON_TAG: &str = "button";

/// The `type` attribute of a button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonType {
    #[default]
    Button,
    Submit,
    Reset,
}

impl ButtonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonType::Button => "button",
            ButtonType::Submit => "submit",
            ButtonType::Reset => "reset",
        }
    }
}

/// Props a caller passes to [`Button::render`]
#[derive(Clone, Debug, Default)]
pub struct ButtonProps {
    /// Overrides the disabled context when set
    pub disabled: Option<bool>,
    pub auto_focus: bool,
    pub button_type: Option<ButtonType>,
    /// Tag override, children and any other attributes
    pub element: ElementProps,
}

impl ButtonProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    pub fn button_type(mut self, button_type: ButtonType) -> Self {
        self.button_type = Some(button_type);
        self
    }

    pub fn element(mut self, element: ElementProps) -> Self {
        self.element = element;
        self
    }
}

/// A headless button
///
/// One `Button` holds the interaction state of one mounted button; render it
/// again whenever [`on_change`](Self::on_change) fires.
pub struct Button {
    press: ActivePress,
    hover: Hover,
    focus: FocusRing,
    refs: RefMerger,
}

impl DisplayName for Button {
    const DISPLAY_NAME: &'static str = "Button";
}

impl Button {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            press: ActivePress::new(host),
            hover: Hover::new(),
            focus: FocusRing::new(),
            refs: RefMerger::new(),
        }
    }

    /// Call `f` whenever the hover, focus or press state changes
    pub fn on_change(&self, f: impl Fn() + 'static) {
        let f: Rc<dyn Fn()> = Rc::new(f);
        let on_press = f.clone();
        self.press.subscribe(move |_| on_press());
        let on_hover = f.clone();
        self.hover.subscribe(move || on_hover());
        self.focus.subscribe(move || f());
    }

    /// Whether a press is currently in flight over the button
    pub fn is_active(&self) -> bool {
        self.press.pressed()
    }

    /// Render the button
    ///
    /// `node_ref` receives the mounted node.
    pub fn render(
        &self,
        props: ButtonProps,
        ctx: &DisabledContext,
        node_ref: Option<ElementRef>,
    ) -> Result<Option<Element>> {
        let ButtonProps {
            disabled,
            auto_focus,
            button_type,
            element,
        } = props;
        let disabled = disabled.or(ctx.value()).unwrap_or(false);

        let focus = self.focus.state(FocusRingConfig { auto_focus });
        let hover = self.hover.state(HoverConfig {
            is_disabled: disabled,
        });
        let press = self.press.state(PressConfig { disabled });

        let button_type = match button_type {
            Some(button_type) => button_type.as_str().to_string(),
            None => element
                .attrs
                .text(keys::TYPE)
                .unwrap_or(ButtonType::Button.as_str())
                .to_string(),
        };

        let mut base = PropBag::new();
        if let Some(node_ref) = node_ref {
            base.insert(keys::REF, node_ref);
        }
        base.insert(keys::TYPE, button_type);
        if disabled {
            base.insert(keys::DISABLED, true);
        }
        base.insert(keys::AUTO_FOCUS, auto_focus);

        let our_props = merge_props([base, focus.focus_props, hover.hover_props, press.press_props]);

        let slot = Slot::new()
            .with("disabled", disabled)
            .with("hover", hover.is_hovered)
            .with("focus", focus.is_focus_visible)
            .with("active", press.pressed)
            .with("autofocus", auto_focus);

        tracing::trace!(
            disabled,
            hover = hover.is_hovered,
            focus = focus.is_focus_visible,
            active = press.pressed,
            "rendering button"
        );

        render(
            RenderRequest::new(Self::DISPLAY_NAME, DEFAULT_BUTTON_TAG)
                .our_props(our_props)
                .their_props(element)
                .slot(slot)
                .merge_refs(&self.refs),
        )
    }

    /// Release every resource held by an in-flight press
    pub fn unmount(&self) {
        tracing::debug!("unmounting button");
        self.press.dispose();
    }
}
