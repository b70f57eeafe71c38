#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use viewmark_core::{
    CoordinateSpace, FragmentLocation, FragmentSync, Point, Scheduler, SyncConfig, ViewerControl,
};

pub struct FakeViewer {
    pub space: CoordinateSpace,
    pub center: Cell<Point>,
    pub zoom: Cell<f64>,
    pub loaded: Cell<bool>,
    pub set_view_calls: RefCell<Vec<(Point, f64)>>,
}

impl FakeViewer {
    pub fn new(space: CoordinateSpace, center: Point, zoom: f64) -> Self {
        Self {
            space,
            center: Cell::new(center),
            zoom: Cell::new(zoom),
            loaded: Cell::new(true),
            set_view_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn unloaded(self) -> Self {
        self.loaded.set(false);
        self
    }

    /// Simulates the user panning/zooming without going through `set_view`.
    pub fn move_to(&self, center: Point, zoom: f64) {
        self.center.set(center);
        self.zoom.set(zoom);
    }

    pub fn calls(&self) -> Vec<(Point, f64)> {
        self.set_view_calls.borrow().clone()
    }
}

impl ViewerControl for FakeViewer {
    fn space(&self) -> CoordinateSpace {
        self.space
    }

    fn center(&self) -> Point {
        self.center.get()
    }

    fn zoom(&self) -> f64 {
        self.zoom.get()
    }

    fn set_view(&self, center: Point, zoom: f64) {
        self.set_view_calls.borrow_mut().push((center, zoom));
        self.center.set(center);
        self.zoom.set(zoom);
    }

    fn unproject(&self, projected: Point) -> Point {
        match self.space {
            // toy transform: 100 projected units per degree
            CoordinateSpace::Geographic => Point::from_lng_lat(projected.x / 100.0, projected.y / 100.0),
            CoordinateSpace::Cartesian => projected,
        }
    }

    fn content_loaded(&self) -> bool {
        self.loaded.get()
    }
}

#[derive(Default)]
pub struct MemoryLocation {
    pub fragment: RefCell<String>,
    pub writes: RefCell<Vec<String>>,
}

impl MemoryLocation {
    pub fn with_fragment(fragment: &str) -> Self {
        Self {
            fragment: RefCell::new(fragment.to_string()),
            writes: RefCell::new(Vec::new()),
        }
    }

    /// An external navigation: changes the fragment without recording a write.
    pub fn navigate(&self, fragment: &str) {
        *self.fragment.borrow_mut() = fragment.to_string();
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl FragmentLocation for MemoryLocation {
    fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    fn replace_fragment(&self, fragment: &str) {
        *self.fragment.borrow_mut() = fragment.to_string();
        self.writes.borrow_mut().push(fragment.to_string());
    }
}

struct ScheduledTask {
    delay_ms: u32,
    cancelled: Rc<Cell<bool>>,
    task: Option<Box<dyn FnOnce()>>,
}

/// Timers that only run when the test fires them.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tasks: Rc<RefCell<Vec<ScheduledTask>>>,
}

pub struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl ManualScheduler {
    pub fn live_count(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|task| !task.cancelled.get() && task.task.is_some())
            .count()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.tasks.borrow().iter().map(|task| task.delay_ms).collect()
    }

    /// Runs every task that is still armed. Returns how many ran.
    pub fn fire_all(&self) -> usize {
        let ready: Vec<Box<dyn FnOnce()>> = {
            let mut tasks = self.tasks.borrow_mut();
            tasks
                .iter_mut()
                .filter(|task| !task.cancelled.get())
                .filter_map(|task| task.task.take())
                .collect()
        };
        let count = ready.len();
        for task in ready {
            task();
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ManualHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.borrow_mut().push(ScheduledTask {
            delay_ms,
            cancelled: cancelled.clone(),
            task: Some(task),
        });
        ManualHandle { cancelled }
    }
}

pub type TestSync = FragmentSync<FakeViewer, MemoryLocation, ManualScheduler>;

pub fn build_sync(
    viewer: FakeViewer,
    fragment: &str,
    config: SyncConfig,
) -> (Rc<TestSync>, ManualScheduler) {
    let scheduler = ManualScheduler::default();
    let sync = FragmentSync::new(
        viewer,
        MemoryLocation::with_fragment(fragment),
        scheduler.clone(),
        config,
    );
    (sync, scheduler)
}

pub fn map_viewer() -> FakeViewer {
    FakeViewer::new(CoordinateSpace::Geographic, Point::from_lng_lat(0.0, 0.0), 1.0)
}

pub fn image_viewer() -> FakeViewer {
    FakeViewer::new(CoordinateSpace::Cartesian, Point::new(0.5, 0.5), 1.0)
}
