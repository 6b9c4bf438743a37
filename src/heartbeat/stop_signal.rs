use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn new() -> (Stopper, StopCheck) {
    let stop_requested = Arc::new(AtomicBool::new(false));

    let stopper = Stopper {
        stop_requested: Arc::clone(&stop_requested),
    };
    let stop_check = StopCheck { stop_requested };

    (stopper, stop_check)
}

/// Cooperative shutdown for cadence-driven loops. The loop holds the
/// StopCheck and polls it between beats; whoever holds the Stopper winds the
/// loop down by dropping it. No cancellation plumbing at await points.
pub struct Stopper {
    stop_requested: Arc<AtomicBool>,
}

impl Drop for Stopper {
    fn drop(&mut self) {
        self.stop_requested.store(true, Ordering::Release);
    }
}

pub struct StopCheck {
    stop_requested: Arc<AtomicBool>,
}

impl StopCheck {
    pub fn should_stop(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }
}
