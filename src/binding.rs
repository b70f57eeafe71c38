use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;

use viewmark_core::{FragmentSync, SyncConfig, ViewerControl};

use crate::js::{self, BindError};
use crate::location::BrowserLocation;
use crate::timer::TimeoutScheduler;

pub(crate) type BrowserSync<V> = FragmentSync<V, BrowserLocation, TimeoutScheduler>;

/// A handler registered on a viewer's own event emitter. Dropping it calls
/// the emitter's remove method before the closure is freed.
pub(crate) struct Subscription {
    target: JsValue,
    remove: &'static str,
    event: &'static str,
    handler: Closure<dyn FnMut(JsValue)>,
}

impl Subscription {
    /// Wraps `handler` without registering it anywhere yet.
    pub(crate) fn new<F>(target: &JsValue, remove: &'static str, event: &'static str, handler: F) -> Self
    where
        F: FnMut(JsValue) + 'static,
    {
        Self {
            target: target.clone(),
            remove,
            event,
            handler: Closure::wrap(Box::new(handler) as Box<dyn FnMut(JsValue)>),
        }
    }

    /// Registers `handler` with `target[add](event, handler)`.
    pub(crate) fn add<F>(
        target: &JsValue,
        add: &'static str,
        remove: &'static str,
        event: &'static str,
        handler: F,
    ) -> Result<Self, BindError>
    where
        F: FnMut(JsValue) + 'static,
    {
        let subscription = Self::new(target, remove, event, handler);
        js::call(
            target,
            add,
            &[JsValue::from_str(event), subscription.function()],
        )?;
        Ok(subscription)
    }

    pub(crate) fn function(&self) -> JsValue {
        self.handler.as_ref().clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = js::call(
            &self.target,
            self.remove,
            &[JsValue::from_str(self.event), self.function()],
        );
    }
}

/// Everything one viewer binding keeps alive: the synchronizer, the
/// `hashchange` listener and the viewer event handlers.
pub(crate) struct Binding<V>
where
    V: ViewerControl + 'static,
{
    sync: Rc<BrowserSync<V>>,
    navigation: RefCell<Option<EventListener>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<V> Binding<V>
where
    V: ViewerControl + 'static,
{
    pub(crate) fn new(viewer: V, config: SyncConfig) -> Result<Rc<Self>, BindError> {
        let location = BrowserLocation::new()?;
        let sync = FragmentSync::new(viewer, location, TimeoutScheduler, config);
        Ok(Rc::new(Self {
            sync,
            navigation: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
        }))
    }

    pub(crate) fn sync(&self) -> &Rc<BrowserSync<V>> {
        &self.sync
    }

    pub(crate) fn listen_for_navigation(&self) {
        let sync = Rc::downgrade(&self.sync);
        let listener = self.sync.location().listen(move || {
            if let Some(sync) = sync.upgrade() {
                sync.fragment_changed();
            }
        });
        *self.navigation.borrow_mut() = Some(listener);
    }

    /// Treats each of `events` on `target` as a view change.
    pub(crate) fn watch_view(
        &self,
        target: &JsValue,
        add: &'static str,
        remove: &'static str,
        events: &[&'static str],
    ) -> Result<(), BindError> {
        for &event in events {
            let sync = Rc::downgrade(&self.sync);
            let subscription = Subscription::add(target, add, remove, event, move |_| {
                if let Some(sync) = sync.upgrade() {
                    sync.view_changed();
                }
            })?;
            self.keep(subscription);
        }
        Ok(())
    }

    pub(crate) fn keep(&self, subscription: Subscription) {
        self.subscriptions.borrow_mut().push(subscription);
    }

    /// Writes any pending view, then removes every listener.
    pub(crate) fn detach(&self) {
        self.sync.flush();
        let subscriptions = std::mem::take(&mut *self.subscriptions.borrow_mut());
        drop(subscriptions);
        self.navigation.borrow_mut().take();
    }
}
