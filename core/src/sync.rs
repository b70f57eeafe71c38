use std::cell::RefCell;
use std::rc::Rc;

use crate::config::SyncConfig;
use crate::resolve::resolve;
use crate::view::{CoordinateSpace, FragmentStyle, Point, ViewState};

/// What the synchronizer needs from a viewer.
pub trait ViewerControl {
    fn space(&self) -> CoordinateSpace;
    fn center(&self) -> Point;
    fn zoom(&self) -> f64;
    /// Moves center and zoom together in one call.
    fn set_view(&self, center: Point, zoom: f64);
    /// Maps a projected `x`/`y` pair into the center space.
    fn unproject(&self, projected: Point) -> Point;
    /// False until the viewer has something to show.
    fn content_loaded(&self) -> bool;
}

/// The page's fragment. `fragment` excludes the leading `#`.
///
/// `replace_fragment` must not add a history entry and must not raise the
/// fragment-changed signal the synchronizer listens to.
pub trait FragmentLocation {
    fn fragment(&self) -> String;
    fn replace_fragment(&self, fragment: &str);
}

/// Single-shot timers. Dropping the returned handle cancels the task.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    Unchanged,
    Moved {
        center_changed: bool,
        zoom_changed: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Disabled,
    EmptyFragment,
    /// Waiting for [`FragmentSync::content_ready`].
    Deferred,
    Applied(ApplyOutcome),
}

pub struct FragmentSync<V, L, S>
where
    S: Scheduler,
{
    viewer: V,
    location: L,
    scheduler: S,
    config: SyncConfig,
    pending_write: RefCell<Option<S::Handle>>,
    deferred_fragment: RefCell<Option<String>>,
}

impl<V, L, S> FragmentSync<V, L, S>
where
    V: ViewerControl + 'static,
    L: FragmentLocation + 'static,
    S: Scheduler + 'static,
{
    pub fn new(viewer: V, location: L, scheduler: S, config: SyncConfig) -> Rc<Self> {
        Rc::new(Self {
            viewer,
            location,
            scheduler,
            config,
            pending_write: RefCell::new(None),
            deferred_fragment: RefCell::new(None),
        })
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn config(&self) -> SyncConfig {
        self.config
    }

    pub fn style(&self) -> FragmentStyle {
        self.viewer.space().style(self.config.precision)
    }

    pub fn current_view(&self) -> ViewState {
        ViewState::new(self.viewer.center(), self.viewer.zoom())
    }

    /// Restores the view from the fragment present at startup.
    pub fn activate(&self) -> Activation {
        if !self.config.enabled {
            return Activation::Disabled;
        }
        self.load_fragment(self.location.fragment())
    }

    /// One-shot: applies the fragment held back by [`Self::activate`], if any.
    pub fn content_ready(&self) -> Option<ApplyOutcome> {
        let fragment = self.deferred_fragment.borrow_mut().take()?;
        Some(self.apply_fragment(&fragment))
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred_fragment.borrow().is_some()
    }

    /// Handles an externally initiated fragment change.
    pub fn fragment_changed(&self) -> Activation {
        if !self.config.enabled {
            return Activation::Disabled;
        }
        self.load_fragment(self.location.fragment())
    }

    fn load_fragment(&self, fragment: String) -> Activation {
        if fragment.is_empty() {
            return Activation::EmptyFragment;
        }
        if !self.viewer.content_loaded() {
            tracing::debug!("viewer not ready, holding fragment '{fragment}'");
            *self.deferred_fragment.borrow_mut() = Some(fragment);
            return Activation::Deferred;
        }
        Activation::Applied(self.apply_fragment(&fragment))
    }

    /// Decodes `fragment` and moves the viewer only where it differs from
    /// the current view.
    pub fn apply_fragment(&self, fragment: &str) -> ApplyOutcome {
        let params = self.style().decode(fragment);
        let current = self.current_view();
        let resolved = resolve(&params, |projected| self.viewer.unproject(projected));
        let center = resolved.center.unwrap_or(current.center);
        let zoom = resolved.zoom.unwrap_or(current.zoom);

        let center_changed = center != current.center;
        let zoom_changed = zoom != current.zoom;
        if !center_changed && !zoom_changed {
            return ApplyOutcome::Unchanged;
        }
        tracing::debug!(
            "applying fragment '{fragment}': center ({}, {}) zoom {zoom}",
            center.x,
            center.y
        );
        self.viewer.set_view(center, zoom);
        ApplyOutcome::Moved {
            center_changed,
            zoom_changed,
        }
    }

    /// Schedules a fragment write, replacing any write already pending.
    pub fn view_changed(self: &Rc<Self>) {
        if !self.config.enabled {
            return;
        }
        if self.config.debounce_ms == 0 {
            self.write_fragment();
            return;
        }
        let sync = Rc::downgrade(self);
        let handle = self.scheduler.schedule(
            self.config.debounce_ms,
            Box::new(move || {
                let Some(sync) = sync.upgrade() else {
                    return;
                };
                let _fired = sync.pending_write.borrow_mut().take();
                sync.write_fragment();
            }),
        );
        // the previous handle drops here, cancelling its timer
        *self.pending_write.borrow_mut() = Some(handle);
    }

    pub fn has_pending_write(&self) -> bool {
        self.pending_write.borrow().is_some()
    }

    /// Writes now if a write is pending. Returns whether anything was written.
    pub fn flush(&self) -> bool {
        let pending = self.pending_write.borrow_mut().take();
        if pending.is_none() {
            return false;
        }
        drop(pending);
        self.write_fragment();
        true
    }

    /// Drops any pending write without performing it.
    pub fn cancel(&self) {
        self.pending_write.borrow_mut().take();
    }

    fn write_fragment(&self) {
        let fragment = self.style().serialize(&self.current_view());
        tracing::debug!("replacing fragment with '{fragment}'");
        self.location.replace_fragment(&fragment);
    }
}
