//! Element descriptions
//!
//! The render function never builds host nodes itself. It produces an
//! [`Element`]: a tag, a prop bag, an optional ref and children, which the
//! host reconciles into its own tree.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use husk_core::events::{event_types, Event};
use husk_core::node_ref::ElementRef;
use husk_core::props::{keys, PropBag, PropValue};
use husk_core::slot::Slot;
use husk_core::NodeId;

/// Render function of a user-defined component
pub type ComponentFn = Rc<dyn Fn(&PropBag, &Children) -> Option<Element>>;

/// A user-defined component usable as a render target
#[derive(Clone)]
pub struct Component {
    name: Cow<'static, str>,
    render: ComponentFn,
}

impl Component {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, render: F) -> Self
    where
        F: Fn(&PropBag, &Children) -> Option<Element> + 'static,
    {
        Self {
            name: name.into(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the component with the given props and children
    pub fn render(&self, props: &PropBag, children: &Children) -> Option<Element> {
        (self.render)(props, children)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// What an element renders as
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    /// Renders its children without a wrapping node
    Fragment,
    /// A host element such as `button` or `div`
    Host(Cow<'static, str>),
    Component(Component),
}

impl Tag {
    pub fn host(name: impl Into<Cow<'static, str>>) -> Self {
        Tag::Host(name.into())
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self, Tag::Fragment)
    }

    /// Host tag name, if this is a host element
    pub fn host_name(&self) -> Option<&str> {
        match self {
            Tag::Host(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&'static str> for Tag {
    fn from(name: &'static str) -> Self {
        Tag::Host(Cow::Borrowed(name))
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::Host(Cow::Owned(name))
    }
}

impl From<Component> for Tag {
    fn from(component: Component) -> Self {
        Tag::Component(component)
    }
}

/// A child node
#[derive(Clone, Debug)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// Children of an element
#[derive(Clone, Default)]
pub enum Children {
    #[default]
    None,
    One(Box<Node>),
    Many(Vec<Node>),
    /// Children computed from the current slot
    RenderProp(Rc<dyn Fn(&Slot) -> Children>),
}

impl Children {
    pub fn one(node: impl Into<Node>) -> Self {
        Children::One(Box::new(node.into()))
    }

    pub fn many<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Children::Many(nodes.into_iter().map(Into::into).collect())
    }

    pub fn render_prop<F>(f: F) -> Self
    where
        F: Fn(&Slot) -> Children + 'static,
    {
        Children::RenderProp(Rc::new(f))
    }

    /// Invoke a render prop with the slot; other children are returned as-is
    pub fn resolve(self, slot: &Slot) -> Children {
        match self {
            Children::RenderProp(f) => f(slot),
            other => other,
        }
    }

    /// The only child, if it is an element
    ///
    /// A list holding exactly one element counts as a single child.
    pub fn single_element(&self) -> Option<&Element> {
        match self {
            Children::One(node) => match node.as_ref() {
                Node::Element(element) => Some(element),
                Node::Text(_) => None,
            },
            Children::Many(nodes) => match nodes.as_slice() {
                [Node::Element(element)] => Some(element),
                _ => None,
            },
            _ => None,
        }
    }

    /// Take the single child element out, or give the children back
    pub fn into_single_element(self) -> Result<Element, Children> {
        if self.single_element().is_none() {
            return Err(self);
        }
        match self {
            Children::One(node) => match *node {
                Node::Element(element) => Ok(element),
                text => Err(Children::One(Box::new(text))),
            },
            Children::Many(mut nodes) => match nodes.pop() {
                Some(Node::Element(element)) => Ok(element),
                _ => Err(Children::Many(nodes)),
            },
            other => Err(other),
        }
    }

    /// Resolved child nodes; render props have none until resolved
    pub fn nodes(&self) -> &[Node] {
        match self {
            Children::One(node) => std::slice::from_ref(node.as_ref()),
            Children::Many(nodes) => nodes,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_render_prop() && self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_render_prop(&self) -> bool {
        matches!(self, Children::RenderProp(_))
    }
}

impl fmt::Debug for Children {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Children::None => write!(f, "None"),
            Children::One(node) => f.debug_tuple("One").field(node).finish(),
            Children::Many(nodes) => f.debug_tuple("Many").field(nodes).finish(),
            Children::RenderProp(_) => write!(f, "RenderProp(<fn>)"),
        }
    }
}

impl From<Element> for Children {
    fn from(element: Element) -> Self {
        Children::one(element)
    }
}

/// A rendered element description
#[derive(Clone, Debug)]
pub struct Element {
    pub tag: Tag,
    pub props: PropBag,
    /// Ref the host hands the mounted node to
    pub node_ref: Option<ElementRef>,
    pub children: Children,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            props: PropBag::new(),
            node_ref: None,
            children: Children::None,
        }
    }

    /// Create an element from a prop bag
    ///
    /// A `ref` prop holding a ref is moved out of the bag into `node_ref`.
    pub fn create(tag: impl Into<Tag>, mut props: PropBag, children: Children) -> Self {
        let node_ref = match props.remove(keys::REF) {
            Some(PropValue::Ref(r)) => Some(r),
            Some(other) => {
                props.insert(keys::REF, other);
                None
            }
            None => None,
        };
        Self {
            tag: tag.into(),
            props,
            node_ref,
            children,
        }
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key, value);
        self
    }

    pub fn with_ref(mut self, node_ref: impl Into<ElementRef>) -> Self {
        self.node_ref = Some(node_ref.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        let child = child.into();
        self.children = match self.children {
            Children::None => Children::one(child),
            Children::One(first) => Children::Many(vec![*first, child]),
            Children::Many(mut nodes) => {
                nodes.push(child);
                Children::Many(nodes)
            }
            Children::RenderProp(_) => Children::one(child),
        };
        self
    }

    pub fn with_children(mut self, children: Children) -> Self {
        self.children = children;
        self
    }

    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    pub fn has_prop(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Text value of a prop
    pub fn text(&self, key: &str) -> Option<&str> {
        self.props.text(key)
    }

    /// Resolved class name
    pub fn class_name(&self) -> Option<&str> {
        self.text(keys::CLASS_NAME)
    }

    /// Deliver an element-level event to this element's handler
    ///
    /// Returns whether a handler was found.
    pub fn dispatch(&self, event: &Event) -> bool {
        let handler = event_types::handler_prop(event.event_type).and_then(|name| self.props.handler(name));
        match handler {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    /// Hand the mounted node (or `None` on detach) to this element's ref
    pub fn attach(&self, node: Option<NodeId>) {
        if let Some(node_ref) = &self.node_ref {
            node_ref.set(node);
        }
    }
}

/// Props a caller passes to a polymorphic widget
#[derive(Clone, Default, Debug)]
pub struct ElementProps {
    /// Render as this tag instead of the widget's default
    pub as_tag: Option<Tag>,
    pub children: Children,
    /// Prop name the widget's ref is exposed under (default `ref`)
    pub ref_name: Option<String>,
    /// With the render strategy feature: unmount when hidden (default `true`)
    pub unmount: Option<bool>,
    /// With the static feature: always render, ignoring visibility
    pub static_render: bool,
    /// Remaining attributes and handlers
    pub attrs: PropBag,
}

impl ElementProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.as_tag = Some(tag.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children = Children::one(child);
        self
    }

    pub fn children(mut self, children: Children) -> Self {
        self.children = children;
        self
    }

    pub fn ref_name(mut self, name: impl Into<String>) -> Self {
        self.ref_name = Some(name.into());
        self
    }

    pub fn unmount(mut self, unmount: bool) -> Self {
        self.unmount = Some(unmount);
        self
    }

    pub fn static_render(mut self, is_static: bool) -> Self {
        self.static_render = is_static;
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.attrs.insert(key, value);
        self
    }

    pub fn on<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        self.attrs = self.attrs.on(key, f);
        self
    }

    pub fn attrs(mut self, attrs: PropBag) -> Self {
        self.attrs.extend(attrs);
        self
    }
}

/// Name a widget reports in diagnostics
pub trait DisplayName {
    const DISPLAY_NAME: &'static str;
}
