//! Mounting and the mounted component.
//!
//! [`mount`] walks the element subtree under the selector once, in
//! pre-order, building a [`ComponentNode`] mirror per element and compiling
//! its directives. Activation then runs each directive once (per element,
//! the conditional before the interpolation) and subscribes it to the
//! store in the same order.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use que_atelier::{compile_expression, compile_template, CallExpression};
use que_carton::{CompactString, FxHashMap};
use que_relief::{DirectiveOptions, EvalResult, Value};

use crate::context::{Context, Methods};
use crate::directive::{Anchor, ConditionalBinding, Directive, Presence, PresenceCell, TextBinding};
use crate::host::{HostTree, NodeId, NodeKind};
use crate::store::{Store, SubscriptionId};

/// Everything [`mount`] needs besides the host tree
#[derive(Debug, Clone)]
pub struct MountOptions {
    pub data: Store,
    pub methods: Methods,
    pub directives: DirectiveOptions,
    /// Skip directives for changes to fields they do not read
    pub track_dependencies: bool,
}

impl MountOptions {
    pub fn new(data: Store) -> Self {
        Self {
            data,
            methods: Methods::default(),
            directives: DirectiveOptions::default(),
            track_dependencies: false,
        }
    }

    pub fn with_methods(mut self, methods: Methods) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_directives(mut self, directives: DirectiveOptions) -> Self {
        self.directives = directives;
        self
    }

    pub fn with_dependency_tracking(mut self, enabled: bool) -> Self {
        self.track_dependencies = enabled;
        self
    }
}

/// Mirror of a mounted element
pub struct ComponentNode {
    pub tag: CompactString,
    pub id: Option<CompactString>,
    pub class: Option<CompactString>,
    pub value: Option<CompactString>,
    pub href: Option<CompactString>,
    /// Direct text content as written in the markup
    pub text: String,
    pub children: Vec<ComponentNode>,
    pub el: NodeId,
    pub parent: Option<NodeId>,
    /// Dedicated interpolation text node
    pub text_node: Option<NodeId>,
    directives: Vec<Rc<dyn Directive>>,
    presence: Option<PresenceCell>,
}

impl ComponentNode {
    pub fn directives(&self) -> &[Rc<dyn Directive>] {
        &self.directives
    }

    /// Current presence; `None` for elements without a conditional
    pub fn presence(&self) -> Option<Presence> {
        self.presence.as_ref().map(|cell| cell.get())
    }

    /// Find the mirror of `el` in this subtree
    pub fn find(&self, el: NodeId) -> Option<&ComponentNode> {
        if self.el == el {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(el))
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ComponentNode::node_count).sum::<usize>()
    }
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentNode")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("class", &self.class)
            .field("el", &self.el)
            .field("text_node", &self.text_node)
            .field("directives", &self.directives.len())
            .field("presence", &self.presence())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// A mounted component. Dropping it unsubscribes every directive.
pub struct Component<H: HostTree + 'static> {
    host: Rc<RefCell<H>>,
    store: Store,
    context: Rc<Context>,
    root: ComponentNode,
    clicks: FxHashMap<NodeId, CallExpression>,
    directives: Vec<Rc<dyn Directive>>,
    subscriptions: Vec<SubscriptionId>,
}

impl<H: HostTree + 'static> Component<H> {
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn host(&self) -> &Rc<RefCell<H>> {
        &self.host
    }

    pub fn root(&self) -> &ComponentNode {
        &self.root
    }

    /// Directives in activation order
    pub fn directives(&self) -> &[Rc<dyn Directive>] {
        &self.directives
    }

    /// Elements with a click binding, in document order of mounting
    pub fn click_targets(&self) -> Vec<NodeId> {
        let mut targets: Vec<NodeId> = self.clicks.keys().copied().collect();
        targets.sort_unstable();
        targets
    }

    /// Parse `text` as a call and invoke the method.
    ///
    /// A bare name is a call without arguments.
    pub fn dispatch(&self, text: &str) -> EvalResult {
        let call = CallExpression::parse(text)?;
        call.invoke(&*self.context)
    }

    /// Run the click binding of `node`, if it has one. Clicks do not bubble.
    pub fn click(&self, node: NodeId) -> EvalResult<Option<Value>> {
        let Some(call) = self.clicks.get(&node) else {
            tracing::trace!(?node, "no click binding");
            return Ok(None);
        };
        call.invoke(&*self.context).map(Some)
    }

    /// Re-run every directive without a store change
    pub fn render(&self) -> EvalResult<()> {
        for directive in &self.directives {
            directive.update()?;
        }
        Ok(())
    }

    fn activate(&mut self, track_dependencies: bool) -> EvalResult<()> {
        for directive in self.directives.clone() {
            directive.update()?;
            let id = self.store.subscribe(move |event| {
                if track_dependencies && !directive.depends_on(&event.field) {
                    return Ok(());
                }
                directive.update()
            });
            self.subscriptions.push(id);
        }
        Ok(())
    }
}

impl<H: HostTree + 'static> Drop for Component<H> {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.store.unsubscribe(id);
        }
    }
}

impl<H: HostTree + 'static> fmt::Debug for Component<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("store", &self.store)
            .field("root", &self.root)
            .field("clicks", &self.clicks.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

/// Mount a component onto the first element matching `selector`.
///
/// Returns `Ok(None)` when nothing matches. Fails if an initial evaluation
/// fails; the partially activated component is torn down.
pub fn mount<H: HostTree + 'static>(
    host: Rc<RefCell<H>>,
    selector: &str,
    options: MountOptions,
) -> EvalResult<Option<Component<H>>> {
    let Some(root_el) = host.borrow().query_selector(selector) else {
        tracing::debug!(selector, "mount target missing");
        return Ok(None);
    };

    let MountOptions {
        data,
        methods,
        directives,
        track_dependencies,
    } = options;
    let context = Rc::new(Context::new(data.clone(), methods));

    let mut builder = Builder {
        host: &host,
        context: &context,
        options: &directives,
        order: Vec::new(),
        clicks: FxHashMap::default(),
    };
    let (root, _) = builder.build(root_el, &[]);
    let Builder { order, clicks, .. } = builder;
    let directives: Vec<Rc<dyn Directive>> = order.into_iter().flatten().collect();
    tracing::debug!(
        selector,
        nodes = root.node_count(),
        directives = directives.len(),
        clicks = clicks.len(),
        "mounting"
    );

    let mut component = Component {
        host,
        store: data,
        context,
        root,
        clicks,
        directives,
        subscriptions: Vec::new(),
    };
    component.activate(track_dependencies)?;
    Ok(Some(component))
}

struct Builder<'a, H: HostTree + 'static> {
    host: &'a Rc<RefCell<H>>,
    context: &'a Rc<Context>,
    options: &'a DirectiveOptions,
    /// Directives in activation order. A conditional's slot is reserved
    /// before its subtree is built and filled afterwards.
    order: Vec<Option<Rc<dyn Directive>>>,
    clicks: FxHashMap<NodeId, CallExpression>,
}

/// What mount reads from one element before building it
struct ElementInfo {
    tag: CompactString,
    id: Option<CompactString>,
    class: Option<CompactString>,
    value: Option<CompactString>,
    href: Option<CompactString>,
    show_if: Option<CompactString>,
    on_click: Option<CompactString>,
    parent: Option<NodeId>,
    anchor: Option<Anchor>,
    text_children: Vec<NodeId>,
    element_children: Vec<NodeId>,
}

impl<H: HostTree + 'static> Builder<'_, H> {
    /// Build `el` and its subtree. Returns the mirror and every text
    /// binding in the subtree.
    fn build(&mut self, el: NodeId, gates: &[PresenceCell]) -> (ComponentNode, Vec<Rc<TextBinding<H>>>) {
        let info = self.read(el);

        if let Some(source) = &info.on_click {
            match CallExpression::parse(source) {
                Ok(call) => {
                    self.clicks.insert(el, call);
                }
                Err(error) => tracing::warn!(node = ?el, %error, "skipping malformed click binding"),
            }
        }

        let presence = match (&info.show_if, info.anchor) {
            (Some(_), Some(_)) => Some(Rc::new(Cell::new(Presence::Attached))),
            (Some(source), None) => {
                tracing::warn!(node = ?el, expression = %source, "conditional element has no parent");
                None
            }
            _ => None,
        };
        let mut own_gates = gates.to_vec();
        own_gates.extend(presence.iter().cloned());
        let slot = presence.as_ref().map(|_| {
            self.order.push(None);
            self.order.len() - 1
        });

        let text: String = {
            let host = self.host.borrow();
            info.text_children
                .iter()
                .filter_map(|child| host.text(*child))
                .collect()
        };
        let options = self.options;
        let (open, close) = &options.delimiters;
        let text_binding = compile_template(&text, open, close).map(|template| {
            let node = self.replace_text_children(el, &text, &info.text_children);
            let binding = Rc::new(TextBinding::new(
                template,
                Rc::clone(self.context),
                Rc::clone(self.host),
                node,
                own_gates.clone(),
            ));
            self.order.push(Some(Rc::clone(&binding) as Rc<dyn Directive>));
            binding
        });

        let mut subtree: Vec<Rc<TextBinding<H>>> = text_binding.iter().cloned().collect();
        let mut children = Vec::with_capacity(info.element_children.len());
        for child in &info.element_children {
            let (node, bindings) = self.build(*child, &own_gates);
            subtree.extend(bindings);
            children.push(node);
        }

        let mut directives: Vec<Rc<dyn Directive>> = Vec::new();
        if let (Some(slot), Some(source), Some(anchor), Some(cell)) =
            (slot, &info.show_if, info.anchor, &presence)
        {
            let binding: Rc<dyn Directive> = Rc::new(ConditionalBinding::new(
                compile_expression(source),
                Rc::clone(self.context),
                Rc::clone(self.host),
                el,
                anchor,
                Rc::clone(cell),
                subtree.clone(),
            ));
            self.order[slot] = Some(Rc::clone(&binding));
            directives.push(binding);
        }
        if let Some(binding) = &text_binding {
            directives.push(Rc::clone(binding) as Rc<dyn Directive>);
        }

        let node = ComponentNode {
            tag: info.tag,
            id: info.id,
            class: info.class,
            value: info.value,
            href: info.href,
            text,
            children,
            el,
            parent: info.parent,
            text_node: text_binding.as_ref().map(|binding| binding.text_node()),
            directives,
            presence,
        };
        (node, subtree)
    }

    fn read(&self, el: NodeId) -> ElementInfo {
        let mut host = self.host.borrow_mut();
        let on_click = host.remove_attribute(el, &self.options.on_click);
        let attr = |name: &str| host.attribute(el, name).map(CompactString::from);
        let (id, class, value, href) = (attr("id"), attr("class"), attr("value"), attr("href"));
        let show_if = attr(self.options.show_if.as_str());

        let parent = host.parent(el);
        let anchor = parent.and_then(|parent| {
            let siblings = host.element_children(parent);
            let index = siblings.iter().position(|id| *id == el)?;
            Some(Anchor {
                parent,
                prev: index.checked_sub(1).map(|prev| siblings[prev]),
                next: siblings.get(index + 1).copied(),
            })
        });

        ElementInfo {
            tag: CompactString::from(host.tag_name(el).unwrap_or_default()),
            id,
            class,
            value,
            href,
            show_if,
            on_click,
            parent,
            anchor,
            text_children: host
                .children(el)
                .iter()
                .copied()
                .filter(|child| host.kind(*child) == NodeKind::Text)
                .collect(),
            element_children: host.element_children(el),
        }
    }

    /// Swap the direct text children of `el` for one text node placed where
    /// the first of them was
    fn replace_text_children(&self, el: NodeId, text: &str, text_children: &[NodeId]) -> NodeId {
        let mut host = self.host.borrow_mut();
        let node = host.create_text_node(text);
        match text_children.first() {
            Some(first) => host.insert_before(el, node, *first),
            None => host.append_child(el, node),
        }
        for old in text_children {
            host.remove_child(el, *old);
        }
        node
    }
}
