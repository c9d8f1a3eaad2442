//! Ref merging
//!
//! When a widget clones its props onto a caller-supplied child, both the
//! widget and the child may hold a ref to the same node. Merging produces a
//! single callback ref that forwards the node to every present ref.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use husk_core::node_ref::ElementRef;
use husk_core::NodeId;

type RefList = SmallVec<[ElementRef; 2]>;

/// Strategy for combining refs
pub trait MergeRefs {
    /// Combine refs into one, or `None` when no ref is present
    fn merge_refs(&self, refs: &[Option<ElementRef>]) -> Option<ElementRef>;
}

fn present(refs: &[Option<ElementRef>]) -> RefList {
    refs.iter().flatten().cloned().collect()
}

fn forward(refs: &[ElementRef], node: Option<NodeId>) {
    for r in refs {
        r.set(node);
    }
}

/// Builds a fresh callback on every merge
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultMergeRefs;

impl MergeRefs for DefaultMergeRefs {
    fn merge_refs(&self, refs: &[Option<ElementRef>]) -> Option<ElementRef> {
        merge_refs(refs)
    }
}

/// Merge refs into a new callback ref
pub fn merge_refs(refs: &[Option<ElementRef>]) -> Option<ElementRef> {
    let refs = present(refs);
    if refs.is_empty() {
        return None;
    }
    Some(ElementRef::callback(move |node| forward(&refs, node)))
}

/// Merges refs behind one callback that keeps its identity
///
/// Each merge swaps the refs the callback forwards to, so a host that compares
/// ref identity between renders sees the same ref every time.
pub struct RefMerger {
    current: Rc<RefCell<RefList>>,
    merged: ElementRef,
}

impl RefMerger {
    pub fn new() -> Self {
        let current: Rc<RefCell<RefList>> = Rc::default();
        let targets = current.clone();
        let merged = ElementRef::callback(move |node| {
            let refs = targets.borrow().clone();
            forward(&refs, node);
        });
        Self { current, merged }
    }
}

impl Default for RefMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeRefs for RefMerger {
    fn merge_refs(&self, refs: &[Option<ElementRef>]) -> Option<ElementRef> {
        let refs = present(refs);
        if refs.is_empty() {
            return None;
        }
        *self.current.borrow_mut() = refs;
        Some(self.merged.clone())
    }
}
