//! Directive runtimes.
//!
//! Each directive owns one compiled expression and the host nodes it
//! reconciles. [`TextBinding`] rewrites an element's dedicated text node;
//! [`ConditionalBinding`] attaches and detaches an element.
//!
//! The host tree is never borrowed while an expression runs: methods may
//! write to the store, and the nested broadcast re-enters other directives.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use que_atelier::{Compiled, Template};
use que_relief::EvalResult;

use crate::context::Context;
use crate::host::{HostTree, NodeId};

/// Conditional presence of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Attached,
    Detached,
}

pub(crate) type PresenceCell = Rc<Cell<Presence>>;

/// A compiled directive re-run on store changes
pub trait Directive {
    /// Re-evaluate and reconcile the host tree
    fn update(&self) -> EvalResult<()>;

    /// Whether a change to `field` can affect this directive
    fn depends_on(&self, field: &str) -> bool;
}

/// Text interpolation into an element's dedicated text node
pub struct TextBinding<H: HostTree> {
    template: Template,
    context: Rc<Context>,
    host: Rc<RefCell<H>>,
    text_node: NodeId,
    /// Presence of the element and its conditional ancestors
    gates: Vec<PresenceCell>,
    renders: Cell<usize>,
}

impl<H: HostTree> TextBinding<H> {
    pub(crate) fn new(
        template: Template,
        context: Rc<Context>,
        host: Rc<RefCell<H>>,
        text_node: NodeId,
        gates: Vec<PresenceCell>,
    ) -> Self {
        Self {
            template,
            context,
            host,
            text_node,
            gates,
            renders: Cell::new(0),
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn text_node(&self) -> NodeId {
        self.text_node
    }

    /// How many times the template has been rendered
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    /// Whether the element or a conditional ancestor is detached
    pub fn is_gated(&self) -> bool {
        self.gates
            .iter()
            .any(|gate| gate.get() == Presence::Detached)
    }

    /// Render and write the text node, ignoring presence
    pub fn refresh(&self) {
        let text = self.template.render(&*self.context);
        self.renders.set(self.renders.get() + 1);
        self.host.borrow_mut().set_text(self.text_node, &text);
    }
}

impl<H: HostTree> Directive for TextBinding<H> {
    fn update(&self) -> EvalResult<()> {
        if self.is_gated() {
            tracing::trace!(node = ?self.text_node, "interpolation skipped while detached");
        } else {
            self.refresh();
        }
        Ok(())
    }

    fn depends_on(&self, field: &str) -> bool {
        self.template.dependencies().includes(field)
    }
}

/// Where a conditional element goes back when it re-attaches.
///
/// Recorded once at mount and never recomputed, so interleaved toggling of
/// several conditional siblings can restore them out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub parent: NodeId,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

/// Attach/detach state machine for a conditional element
pub struct ConditionalBinding<H: HostTree> {
    predicate: Compiled,
    context: Rc<Context>,
    host: Rc<RefCell<H>>,
    el: NodeId,
    anchor: Anchor,
    presence: PresenceCell,
    /// Interpolations inside the element, refreshed before re-insertion
    subtree: Vec<Rc<TextBinding<H>>>,
}

impl<H: HostTree> ConditionalBinding<H> {
    pub(crate) fn new(
        predicate: Compiled,
        context: Rc<Context>,
        host: Rc<RefCell<H>>,
        el: NodeId,
        anchor: Anchor,
        presence: PresenceCell,
        subtree: Vec<Rc<TextBinding<H>>>,
    ) -> Self {
        Self {
            predicate,
            context,
            host,
            el,
            anchor,
            presence,
            subtree,
        }
    }

    pub fn predicate(&self) -> &Compiled {
        &self.predicate
    }

    pub fn presence(&self) -> Presence {
        self.presence.get()
    }

    fn detach(&self) {
        self.host
            .borrow_mut()
            .remove_child(self.anchor.parent, self.el);
        self.presence.set(Presence::Detached);
        tracing::debug!(node = ?self.el, "detached");
    }

    fn attach(&self) {
        self.presence.set(Presence::Attached);
        for binding in &self.subtree {
            if !binding.is_gated() {
                binding.refresh();
            }
        }

        let Anchor { parent, prev, next } = self.anchor;
        let mut host = self.host.borrow_mut();
        match (next, prev) {
            (Some(next), _) => host.insert_before(parent, self.el, next),
            (None, Some(prev)) => host.insert_after(parent, self.el, prev),
            (None, None) => host.prepend(parent, self.el),
        }
        tracing::debug!(node = ?self.el, "attached");
    }
}

impl<H: HostTree> Directive for ConditionalBinding<H> {
    fn update(&self) -> EvalResult<()> {
        let visible = self.predicate.evaluate(&*self.context)?.is_truthy();
        match (visible, self.presence.get()) {
            (false, Presence::Attached) => self.detach(),
            (true, Presence::Detached) => self.attach(),
            _ => {}
        }
        Ok(())
    }

    fn depends_on(&self, field: &str) -> bool {
        self.predicate.dependencies().includes(field)
    }
}
