//! The single loop that owns drawing, input dispatch and teardown.
//!
//! Each pass drains the dirty set and sweeps closed components in one
//! critical section, tears the swept components down, repaints what changed
//! and then blocks for the next event. Everything else talks to the loop
//! through [`Ui`], which only records marks and posts events.

use crate::config::UiConfig;
use crate::ui::backend::{EventPoster, Screen};
use crate::ui::core::canvas::CanvasContext;
use crate::ui::core::component::{Component, Cx, MouseWheel};
use crate::ui::core::focus;
use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::id::ComponentId;
use crate::ui::core::input::Event;
use crate::ui::core::style::Style;
use crate::ui::core::tree::Ui;
use crate::ui::root::RootContainer;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use rustc_hash::FxHashSet;
use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;

pub struct Controller {
    screen: Box<dyn Screen>,
    ui: Ui,
    config: UiConfig,
    mouse_pressed: bool,
}

impl Controller {
    pub fn new(screen: Box<dyn Screen>, config: UiConfig) -> Self {
        let root = RootContainer::new(Style::default().bg(config.root_background));
        let ui = Ui::new(screen.poster(), root);
        Self {
            screen,
            ui,
            config,
            mouse_pressed: false,
        }
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn canceller(&self) -> Canceller {
        Canceller {
            poster: self.screen.poster(),
        }
    }

    /// Runs the loop on its own thread.
    pub fn run(self) -> io::Result<RunHandle> {
        let canceller = self.canceller();
        let (done_tx, done) = mpsc::channel();
        let thread = std::thread::Builder::new()
            .name("termwin-loop".to_string())
            .spawn(move || {
                let result = self.run_blocking();
                let _ = done_tx.send(());
                result
            })?;
        Ok(RunHandle {
            canceller,
            done,
            thread: Some(thread),
        })
    }

    /// Runs the loop on the calling thread until it is interrupted, Ctrl+C
    /// is pressed or the screen runs out of events. Every component is torn
    /// down and the screen released before returning.
    pub fn run_blocking(mut self) -> io::Result<()> {
        if let Err(err) = self.start() {
            tracing::error!(%err, "screen setup failed");
            self.screen.fini();
            return Err(err);
        }
        tracing::info!(size = ?self.screen.size(), "controller loop started");

        let result = loop {
            if let Err(err) = self.redraw() {
                tracing::error!(%err, "screen update failed");
                break Err(err);
            }
            let Some(event) = self.screen.poll_event() else {
                tracing::debug!("event source exhausted");
                break Ok(());
            };
            if !self.handle_event(event) {
                break Ok(());
            }
        };

        self.close_all();
        self.screen.fini();
        tracing::info!("controller loop stopped");
        result
    }

    pub(crate) fn start(&mut self) -> io::Result<()> {
        self.screen.clear()?;
        if self.config.mouse_capture {
            self.screen.enable_mouse()?;
        }
        self.on_screen_resize();
        Ok(())
    }

    /// Handles one event. Returns false when the loop should stop.
    pub(crate) fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => return self.on_key(key),
            Event::Mouse(mouse) => self.on_mouse_event(mouse),
            Event::Resize(..) => self.on_screen_resize(),
            Event::Wake => {}
            Event::Interrupt => {
                tracing::debug!("loop interrupted");
                return false;
            }
            Event::Activate(id) => {
                if !focus::set_active(&self.ui, id) {
                    tracing::warn!(?id, "activation request rejected");
                }
            }
            Event::OwnerResized(id) => self.notify_owner_resized(id),
        }
        true
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return true;
        }
        if self.config.exit_on_ctrl_c
            && key.code == KeyCode::Char('c')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            tracing::info!("ctrl+c pressed, stopping");
            return false;
        }
        focus::dispatch_key(&self.ui, self.ui.root(), &key);
        true
    }

    /// A click is delivered when the button comes back up.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let at = Pos::new(mouse.column as i32, mouse.row as i32);
        match mouse.kind {
            MouseEventKind::Down(_) => self.mouse_pressed = true,
            MouseEventKind::Up(_) => {
                if std::mem::take(&mut self.mouse_pressed) {
                    self.deliver_mouse(at, |c, cx, local| c.on_mouse_pressed(cx, local));
                }
            }
            kind => {
                if let Some(wheel) = MouseWheel::from_event(kind, mouse.modifiers) {
                    self.deliver_mouse(at, |c, cx, local| c.on_mouse_wheel(cx, local, wheel));
                }
            }
        }
    }

    fn deliver_mouse<F>(&self, at: Pos, handler: F) -> bool
    where
        F: Fn(&dyn Component, &Cx<'_>, Pos) -> bool,
    {
        let root = self.ui.root();
        let size = self.ui.bounds(root).unwrap_or_default().size();
        let mut cc = CanvasContext::new(size);
        mouse_hit(&self.ui, &mut cc, root, at, &handler)
    }

    /// Resizes the root to the screen. Only the root's direct children are
    /// told; deeper components hear about it through their own owners.
    pub(crate) fn on_screen_resize(&mut self) {
        let size = self.screen.size();
        let root = self.ui.root();
        if self.ui.bounds(root).map(|b| b.size()) == Some(size) {
            return;
        }
        tracing::debug!(?size, "screen resized");
        self.ui.set_root_bounds(Rect::from_parts(Pos::default(), size));
        self.notify_owner_resized(root);
        self.ui.redraw(root);
    }

    fn notify_owner_resized(&self, owner: ComponentId) {
        for child in self.ui.children(owner) {
            if self.ui.is_closed(child) {
                continue;
            }
            if let Some(behavior) = self.ui.component(child) {
                behavior.on_owner_resized(&Cx::new(&self.ui, child));
            }
        }
    }

    /// One loop pass: sweep, tear down, repaint.
    pub(crate) fn redraw(&mut self) -> io::Result<()> {
        let (dirty, deleted) = self.ui.sweep();
        if !deleted.is_empty() {
            tracing::debug!(count = deleted.len(), "tearing down closed components");
            self.ui.tear_down(deleted);
        }
        let root = self.ui.root();
        if dirty.is_empty() || self.ui.is_closed(root) {
            return Ok(());
        }
        let size = self.ui.bounds(root).unwrap_or_default().size();
        tracing::trace!(dirty = dirty.len(), "redraw pass");
        {
            let mut cc = CanvasContext::with_surface(size, self.screen.surface());
            draw(&self.ui, &mut cc, root, false, &dirty);
        }
        self.screen.show()
    }

    /// Alternates passes and events until the screen has nothing queued.
    #[cfg(test)]
    pub(crate) fn pump(&mut self) -> bool {
        loop {
            if let Err(err) = self.redraw() {
                panic!("redraw failed: {err}");
            }
            let Some(event) = self.screen.poll_event() else {
                return true;
            };
            if !self.handle_event(event) {
                return false;
            }
        }
    }

    /// Closes the root and tears the whole tree down.
    fn close_all(&mut self) {
        self.ui.close_root();
        let (_, deleted) = self.ui.sweep();
        self.ui.tear_down(deleted);
    }
}

/// Repaints `id` when it is dirty or an ancestor was repainted, then walks
/// its children: inactive ones bottom to top, the active one last.
fn draw(
    ui: &Ui,
    cc: &mut CanvasContext<'_>,
    id: ComponentId,
    mut repaint: bool,
    dirty: &FxHashSet<ComponentId>,
) {
    let Some(view) = ui.view(id) else {
        return;
    };
    if view.state.is_closed() || !view.state.is_visible() {
        return;
    }
    let bounds = view.state.bounds();
    if !cc.is_visible(bounds) {
        return;
    }
    let cx = Cx::new(ui, id);
    if repaint || dirty.contains(&id) {
        cc.push_relative_region(Pos::default(), bounds);
        view.behavior.draw(&cx, cc);
        cc.pop();
        repaint = true;
    }
    if !view.container || view.children.is_empty() {
        return;
    }

    cc.push_relative_region(
        view.behavior.virtual_offset(),
        view.behavior.children_canvas_bounds(bounds),
    );
    let active = ui.active_child(id);
    for child in view.children.iter().copied().filter(|c| Some(*c) != active) {
        draw(ui, cc, child, repaint, dirty);
    }
    if let Some(child) = active {
        draw(ui, cc, child, repaint, dirty);
    }
    cc.pop();
}

/// Finds the deepest visible component under `at` and offers it the event,
/// moving outward until a handler consumes it or a component takes focus.
/// The active child is hit-tested first, then the rest top to bottom.
fn mouse_hit<F>(ui: &Ui, cc: &mut CanvasContext<'_>, id: ComponentId, at: Pos, handler: &F) -> bool
where
    F: Fn(&dyn Component, &Cx<'_>, Pos) -> bool,
{
    let Some(view) = ui.view(id) else {
        return false;
    };
    if view.state.is_closed() || !view.state.is_visible() {
        return false;
    }
    let bounds = view.state.bounds();
    let top_left = cc.physical_point(bounds.top_left());
    if !Rect::from_parts(top_left, bounds.size())
        .intersect(cc.physical_region())
        .contains(at)
    {
        return false;
    }

    if view.container {
        cc.push_relative_region(
            view.behavior.virtual_offset(),
            view.behavior.children_canvas_bounds(bounds),
        );
        let mut consumed = false;
        if cc.physical_region().contains(at) {
            let active = ui.active_child(id);
            let rest = view.children.iter().rev().copied().filter(|c| Some(*c) != active);
            for child in active.into_iter().chain(rest) {
                if mouse_hit(ui, cc, child, at, handler) {
                    consumed = true;
                    break;
                }
            }
        }
        cc.pop();
        if consumed {
            return true;
        }
    }

    let local = Pos::new(at.x - top_left.x, at.y - top_left.y);
    let handled = handler(view.behavior.as_ref(), &Cx::new(ui, id), local);
    let activated = focus::set_active(ui, id);
    handled || activated
}

/// Stops a running loop from any thread.
#[derive(Clone, Debug)]
pub struct Canceller {
    poster: EventPoster,
}

impl Canceller {
    pub fn cancel(&self) {
        self.poster.post(Event::Interrupt);
    }
}

pub struct RunHandle {
    canceller: Canceller,
    done: mpsc::Receiver<()>,
    thread: Option<JoinHandle<io::Result<()>>>,
}

impl RunHandle {
    pub fn canceller(&self) -> Canceller {
        self.canceller.clone()
    }

    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    /// Signalled once every component is torn down and the screen released.
    pub fn done(&self) -> &mpsc::Receiver<()> {
        &self.done
    }

    /// Waits for the loop thread and returns its result.
    pub fn wait(mut self) -> io::Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        thread
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("controller loop panicked")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/controller.rs"]
mod tests;
