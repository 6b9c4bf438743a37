mod watchdog;
mod worker;

pub use watchdog::spawn_watchdog;
pub use watchdog::Watchdog;
pub use watchdog::WorkerControl;
pub use watchdog::WorkerHandle;
pub use worker::FeedWorkerControl;
