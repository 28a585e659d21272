//! Component arena and the shared [`Ui`] handle.
//!
//! Components live in a slotmap keyed by [`ComponentId`]; ownership is the
//! `owner`/`children` links between entries. Structural changes happen under
//! the tree lock, per-component flags are atomics shared with the loop, and
//! redraw marks go to a separate dirty set drained once per loop pass.
//!
//! Lock order is tree, then dirty. No lock is held while widget callbacks run.

use super::component::{Component, Cx};
use super::geom::{Pos, Rect, Size};
use super::id::ComponentId;
use super::input::Event;
use crate::error::UiError;
use crate::ui::backend::EventPoster;
use crate::ui::root::ModalPad;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Poisoning only means a callback panicked on another thread; the guarded
/// data is still consistent because no callback runs under these locks.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Per-component state readable without the tree lock.
#[derive(Debug)]
pub(crate) struct BoxState {
    visible: AtomicBool,
    active: AtomicBool,
    closed: AtomicBool,
    bounds: Mutex<Rect>,
    /// Serializes activation against visibility changes.
    gate: Mutex<()>,
}

impl BoxState {
    fn new() -> Self {
        Self {
            visible: AtomicBool::new(true),
            active: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            bounds: Mutex::new(Rect::default()),
            gate: Mutex::new(()),
        }
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn bounds(&self) -> Rect {
        *lock(&self.bounds)
    }

    fn set_bounds(&self, r: Rect) {
        *lock(&self.bounds) = r;
    }

    /// Flips the active flag, returning whether it changed. Activating a
    /// hidden component is a programming error.
    pub(crate) fn set_active_flag(&self, id: ComponentId, active: bool) -> bool {
        let _gate = lock(&self.gate);
        if active && !self.is_visible() {
            panic!("cannot activate invisible component {id:?}");
        }
        self.active.swap(active, Ordering::AcqRel) != active
    }

    fn set_visible_flag(&self, visible: bool) -> bool {
        let _gate = lock(&self.gate);
        self.visible.swap(visible, Ordering::AcqRel) != visible
    }

    fn mark_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }
}

struct Node {
    state: Arc<BoxState>,
    behavior: Arc<dyn Component>,
    container: bool,
    bound: bool,
    owner: Option<ComponentId>,
    children: Vec<ComponentId>,
}

/// What a loop walk needs from one node, copied out under the tree lock.
#[derive(Clone)]
pub(crate) struct NodeView {
    pub(crate) state: Arc<BoxState>,
    pub(crate) behavior: Arc<dyn Component>,
    pub(crate) container: bool,
    pub(crate) owner: Option<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
}

/// A component pulled out of the tree by a sweep, waiting for its teardown
/// notifications.
pub(crate) struct Detached {
    pub(crate) id: ComponentId,
    pub(crate) owner: Option<ComponentId>,
    pub(crate) behavior: Arc<dyn Component>,
}

#[derive(Default)]
struct Tree {
    nodes: SlotMap<ComponentId, Node>,
}

impl Tree {
    fn node(&self, id: ComponentId) -> Result<&Node, UiError> {
        self.nodes.get(id).ok_or(UiError::UnknownComponent(id))
    }

    /// Looks up a node that `init` has bound and nobody has closed yet.
    fn live(&self, id: ComponentId) -> Result<&Node, UiError> {
        let node = self.node(id)?;
        if !node.bound {
            return Err(UiError::NotInitialized(id));
        }
        if node.state.is_closed() {
            return Err(UiError::Closed(id));
        }
        Ok(node)
    }

    fn attach(&mut self, id: ComponentId, owner: ComponentId) -> Result<(), UiError> {
        if id == owner {
            return Err(UiError::SelfOwnership(id));
        }
        let node = self.node(id)?;
        if node.state.is_closed() {
            return Err(UiError::Closed(id));
        }
        if let Some(current) = node.owner {
            if current != owner {
                return Err(UiError::OwnershipConflict {
                    component: id,
                    owner: current,
                });
            }
        }
        if !self.live(owner)?.container {
            return Err(UiError::NotAContainer(owner));
        }

        if let Some(parent) = self.nodes.get_mut(owner) {
            parent.children.retain(|child| *child != id);
            parent.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.owner = Some(owner);
            node.bound = true;
        }
        Ok(())
    }

    /// Depth-first pass that closes the descendants of closed containers,
    /// unlinks closed children and collects them, children before parents.
    /// Returns whether `id` itself is closed.
    fn sweep(
        &mut self,
        id: ComponentId,
        owner: Option<ComponentId>,
        out: &mut Vec<Detached>,
    ) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let closed = node.state.is_closed();
        let children = node.children.clone();
        let behavior = Arc::clone(&node.behavior);

        let mut unlink = false;
        for child in children {
            if closed {
                if let Some(c) = self.nodes.get_mut(child) {
                    c.state.mark_closed();
                    c.owner = None;
                }
            }
            unlink |= self.sweep(child, Some(id), out);
        }
        if unlink {
            let nodes = &self.nodes;
            let open: Vec<ComponentId> = nodes[id]
                .children
                .iter()
                .copied()
                .filter(|c| nodes.get(*c).is_some_and(|n| !n.state.is_closed()))
                .collect();
            if let Some(node) = self.nodes.get_mut(id) {
                node.children = open;
            }
        }
        if closed {
            out.push(Detached {
                id,
                owner,
                behavior,
            });
        }
        closed
    }
}

struct Shared {
    tree: Mutex<Tree>,
    dirty: Mutex<FxHashSet<ComponentId>>,
    poster: EventPoster,
    root: ComponentId,
}

/// Cloneable handle to one component tree. Safe to use from any thread;
/// structural changes take effect immediately, drawing and teardown happen
/// on the controller loop.
#[derive(Clone)]
pub struct Ui {
    shared: Arc<Shared>,
}

impl Ui {
    pub(crate) fn new(poster: EventPoster, root: impl Component) -> Self {
        let mut tree = Tree::default();
        let root = tree.nodes.insert(Node {
            state: Arc::new(BoxState::new()),
            container: true,
            behavior: Arc::new(root),
            bound: true,
            owner: None,
            children: Vec::new(),
        });
        Self {
            shared: Arc::new(Shared {
                tree: Mutex::new(tree),
                dirty: Mutex::new(FxHashSet::default()),
                poster,
                root,
            }),
        }
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        lock(&self.shared.tree)
    }

    pub fn root(&self) -> ComponentId {
        self.shared.root
    }

    /// Registers a widget. It stays detached until [`Ui::init`] binds it.
    pub fn insert(&self, widget: impl Component) -> ComponentId {
        self.insert_shared(Arc::new(widget))
    }

    /// Like [`Ui::insert`], for callers that keep their own handle to the
    /// widget.
    pub fn insert_shared<C: Component>(&self, widget: Arc<C>) -> ComponentId {
        let container = widget.is_container();
        let id = self.tree().nodes.insert(Node {
            state: Arc::new(BoxState::new()),
            behavior: widget,
            container,
            bound: false,
            owner: None,
            children: Vec::new(),
        });
        tracing::trace!(?id, container, "component inserted");
        id
    }

    /// Binds `id` to `owner` and places it on top of the owner's children.
    /// Calling it again with the same owner only moves the child to the top.
    /// A component that was never bound is dropped when binding fails.
    pub fn init(&self, id: ComponentId, owner: ComponentId) -> Result<(), UiError> {
        if id == self.root() {
            return Err(UiError::Root);
        }
        {
            let mut tree = self.tree();
            if let Err(err) = tree.attach(id, owner) {
                if tree.nodes.get(id).is_some_and(|node| !node.bound) {
                    tree.nodes.remove(id);
                    tracing::debug!(?id, %err, "unbound component dropped");
                }
                return Err(err);
            }
        }
        tracing::debug!(?id, ?owner, "component attached");
        self.record_dirty(owner);
        Ok(())
    }

    pub fn add(&self, owner: ComponentId, widget: impl Component) -> Result<ComponentId, UiError> {
        self.add_shared(owner, Arc::new(widget))
    }

    pub fn add_shared<C: Component>(
        &self,
        owner: ComponentId,
        widget: Arc<C>,
    ) -> Result<ComponentId, UiError> {
        let id = self.insert_shared(widget);
        self.init(id, owner)?;
        Ok(id)
    }

    /// Full-screen modal layer on top of the root. Children added to it are
    /// the only ones reachable by input until it closes. Focus moves to the
    /// pad on the next loop pass.
    pub fn new_modal_pad(&self) -> Result<ComponentId, UiError> {
        let pad = self.add(self.root(), ModalPad)?;
        let area = self.bounds(self.root()).unwrap_or_default().at_origin();
        self.set_bounds(pad, area)?;
        self.set_active(pad);
        Ok(pad)
    }

    pub fn set_bounds(&self, id: ComponentId, r: Rect) -> Result<(), UiError> {
        let (state, owner, container) = {
            let tree = self.tree();
            let node = tree.live(id)?;
            (Arc::clone(&node.state), node.owner, node.container)
        };
        state.set_bounds(r.normalized_size());
        self.record_dirty(owner.unwrap_or(id));
        if container {
            self.shared.poster.post(Event::OwnerResized(id));
        }
        Ok(())
    }

    /// Bounds in the owner's children coordinates.
    pub fn bounds(&self, id: ComponentId) -> Option<Rect> {
        self.tree().nodes.get(id).map(|node| node.state.bounds())
    }

    /// Hiding the root is ignored.
    pub fn set_visible(&self, id: ComponentId, visible: bool) -> Result<(), UiError> {
        if id == self.root() {
            return Ok(());
        }
        let (state, owner) = {
            let tree = self.tree();
            let node = tree.live(id)?;
            (Arc::clone(&node.state), node.owner)
        };
        if state.set_visible_flag(visible) {
            self.record_dirty(owner.unwrap_or(id));
        }
        Ok(())
    }

    pub fn is_visible(&self, id: ComponentId) -> bool {
        self.flag(id, BoxState::is_visible, false)
    }

    pub fn is_active(&self, id: ComponentId) -> bool {
        self.flag(id, BoxState::is_active, false)
    }

    /// True once `close` was called, and for ids that no longer exist.
    pub fn is_closed(&self, id: ComponentId) -> bool {
        self.flag(id, BoxState::is_closed, true)
    }

    fn flag(&self, id: ComponentId, read: fn(&BoxState) -> bool, missing: bool) -> bool {
        self.tree()
            .nodes
            .get(id)
            .map_or(missing, |node| read(&node.state))
    }

    pub fn owner(&self, id: ComponentId) -> Option<ComponentId> {
        self.tree().nodes.get(id).and_then(|node| node.owner)
    }

    /// Children in draw order, bottom first. Closed children remain listed
    /// until the next loop pass sweeps them out.
    pub fn children(&self, id: ComponentId) -> Vec<ComponentId> {
        self.tree()
            .nodes
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Smallest rectangle covering every child's bounds.
    pub fn children_bounds(&self, id: ComponentId) -> Rect {
        let tree = self.tree();
        let Some(node) = tree.nodes.get(id) else {
            return Rect::default();
        };
        let mut iter = node
            .children
            .iter()
            .filter_map(|child| tree.nodes.get(*child))
            .map(|child| child.state.bounds());
        let Some(first) = iter.next() else {
            return Rect::default();
        };
        iter.fold(first, |acc, r| acc.union(r))
    }

    pub fn virtual_offset(&self, id: ComponentId) -> Pos {
        self.component(id)
            .map(|c| c.virtual_offset())
            .unwrap_or_default()
    }

    pub fn virtual_size(&self, id: ComponentId) -> Size {
        let Some(view) = self.view(id) else {
            return Size::default();
        };
        view.behavior.virtual_size(view.state.bounds())
    }

    /// The widget behind `id`.
    pub fn component(&self, id: ComponentId) -> Option<Arc<dyn Component>> {
        self.tree()
            .nodes
            .get(id)
            .map(|node| Arc::clone(&node.behavior))
    }

    /// The visible child holding focus, if any. A hidden child keeps its
    /// active flag but gets no input until it is shown again.
    pub fn active_child(&self, id: ComponentId) -> Option<ComponentId> {
        self.find_active_child(id, |n| n.state.is_visible())
    }

    /// The child whose active flag is set, shown or not.
    pub(crate) fn flagged_active_child(&self, id: ComponentId) -> Option<ComponentId> {
        self.find_active_child(id, |_| true)
    }

    fn find_active_child(
        &self,
        id: ComponentId,
        accept: fn(&Node) -> bool,
    ) -> Option<ComponentId> {
        let tree = self.tree();
        tree.nodes.get(id)?.children.iter().copied().find(|child| {
            tree.nodes.get(*child).is_some_and(|n| {
                n.state.is_active() && !n.state.is_closed() && accept(n)
            })
        })
    }

    /// Closes `id`. The owner link is cut right away; the component stays in
    /// the owner's children until the loop tears it down, with its own
    /// children, on the next pass. Closing twice is a no-op. The root only
    /// closes when the loop shuts down.
    pub fn close(&self, id: ComponentId) -> Result<(), UiError> {
        if id == self.root() {
            return Err(UiError::Root);
        }
        self.close_node(id)
    }

    /// Marks the root closed so the next sweep takes the whole tree down.
    pub(crate) fn close_root(&self) {
        if let Err(err) = self.close_node(self.root()) {
            tracing::debug!(%err, "root already gone");
        }
    }

    fn close_node(&self, id: ComponentId) -> Result<(), UiError> {
        let owner = {
            let mut tree = self.tree();
            let node = tree
                .nodes
                .get_mut(id)
                .ok_or(UiError::UnknownComponent(id))?;
            if !node.bound {
                return Err(UiError::NotInitialized(id));
            }
            if !node.state.mark_closed() {
                return Ok(());
            }
            node.owner.take()
        };
        tracing::debug!(?id, ?owner, "component closed");
        self.record_dirty(owner.unwrap_or(id));
        Ok(())
    }

    /// Asks the loop to repaint the component's owner, or the component
    /// itself when it has none.
    pub fn redraw(&self, id: ComponentId) {
        let owner = {
            let tree = self.tree();
            match tree.nodes.get(id) {
                Some(node) => node.owner,
                None => return,
            }
        };
        self.record_dirty(owner.unwrap_or(id));
    }

    /// Queues an activation request; the loop applies it.
    pub fn set_active(&self, id: ComponentId) {
        self.shared.poster.post(Event::Activate(id));
    }

    /// Wakes the loop only for the first mark since the last drain.
    fn record_dirty(&self, id: ComponentId) {
        let first = {
            let mut dirty = lock(&self.shared.dirty);
            let first = dirty.is_empty();
            dirty.insert(id);
            first
        };
        if first {
            self.shared.poster.post(Event::Wake);
        }
    }

    pub(crate) fn view(&self, id: ComponentId) -> Option<NodeView> {
        let tree = self.tree();
        let node = tree.nodes.get(id)?;
        Some(NodeView {
            state: Arc::clone(&node.state),
            behavior: Arc::clone(&node.behavior),
            container: node.container,
            owner: node.owner,
            children: node.children.clone(),
        })
    }

    pub(crate) fn set_root_bounds(&self, r: Rect) {
        if let Some(node) = self.tree().nodes.get(self.root()) {
            node.state.set_bounds(r.normalized_size());
        }
    }

    /// Drains the dirty set and unlinks every closed component in one
    /// critical section.
    pub(crate) fn sweep(&self) -> (FxHashSet<ComponentId>, Vec<Detached>) {
        let mut tree = self.tree();
        let mut dirty = lock(&self.shared.dirty);
        let mut deleted = Vec::new();
        tree.sweep(self.root(), None, &mut deleted);
        if !deleted.is_empty() {
            dirty.insert(self.root());
        }
        (std::mem::take(&mut *dirty), deleted)
    }

    /// Notifies swept components and their surviving owners, then drops them
    /// from the arena.
    pub(crate) fn tear_down(&self, deleted: Vec<Detached>) {
        for d in &deleted {
            d.behavior.on_closed(&Cx::new(self, d.id));
            let Some(owner) = d.owner else {
                continue;
            };
            if self.is_closed(owner) {
                continue;
            }
            if let Some(behavior) = self.component(owner) {
                behavior.on_child_closed(&Cx::new(self, owner), d.id);
            }
        }
        let mut tree = self.tree();
        for d in deleted {
            tree.nodes.remove(d.id);
            tracing::trace!(id = ?d.id, "component removed");
        }
    }

    #[cfg(test)]
    pub(crate) fn take_dirty(&self) -> FxHashSet<ComponentId> {
        std::mem::take(&mut *lock(&self.shared.dirty))
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/tree.rs"]
mod tests;
