use gloo::timers::callback::Timeout;

use viewmark_core::Scheduler;

/// `setTimeout`-backed scheduler; dropping the `Timeout` clears it.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}
