use crate::heartbeat::{self, Clock, LivenessProbe, RealClock, StopCheck, Stopper};
use crate::options::{FeedOptions, FeedOptionsValidated};
use std::any::Any;
use std::convert::TryFrom;
use tokio::time::Duration;

/// Owns whatever keeps a worker alive. Dropping the handle tears the worker
/// down.
pub struct WorkerHandle {
    _teardown: Box<dyn Any + Send>,
}

impl WorkerHandle {
    pub fn new(teardown: impl Any + Send) -> Self {
        WorkerHandle {
            _teardown: Box::new(teardown),
        }
    }
}

/// The seam between the watchdog and the worker it supervises: how to launch
/// a fresh worker with identical configuration, and how to reach its
/// liveness stream. Implementations may retry internally, but must give up
/// and return None once the stop check fires, so a requested shutdown is
/// honored even while the worker is down.
#[async_trait::async_trait]
pub trait WorkerControl: Send + 'static {
    type Probe: LivenessProbe;

    async fn spawn_worker(&mut self, stop_check: &StopCheck) -> Option<WorkerHandle>;
    async fn connect_probe(&mut self, stop_check: &StopCheck) -> Option<Self::Probe>;
}

/// The standby half of a supervision pair. Pings the worker on a fixed
/// cadence; a missed beat tears the worker down and launches a replacement
/// with the same identity after a grace period. Single-level supervision:
/// one replacement attempt per failure, then back to watching.
pub struct Watchdog<W: WorkerControl, C: Clock = RealClock> {
    logger: slog::Logger,
    control: W,
    clock: C,
    heartbeat_interval: Duration,
    promotion_grace: Duration,
    stop_check: StopCheck,
}

#[derive(Debug)]
enum WatchState {
    Watching,
    Promoting,
}

/// Validates options and runs a watchdog over the real clock. The returned
/// stopper winds the watchdog (and its current worker) down when dropped.
pub fn spawn_watchdog<W: WorkerControl>(
    logger: slog::Logger,
    control: W,
    options: FeedOptions,
) -> Result<Stopper, &'static str> {
    let validated = FeedOptionsValidated::try_from(options)?;
    let (stopper, stop_check) = heartbeat::new_stop_signal();

    let watchdog = Watchdog::new(
        logger,
        control,
        RealClock,
        validated.heartbeat_interval,
        validated.promotion_grace,
        stop_check,
    );
    tokio::spawn(watchdog.run());

    Ok(stopper)
}

impl<W: WorkerControl, C: Clock> Watchdog<W, C> {
    pub(crate) fn new(
        logger: slog::Logger,
        control: W,
        clock: C,
        heartbeat_interval: Duration,
        promotion_grace: Duration,
        stop_check: StopCheck,
    ) -> Self {
        Watchdog {
            logger,
            control,
            clock,
            heartbeat_interval,
            promotion_grace,
            stop_check,
        }
    }

    pub(crate) async fn run(mut self) {
        let mut worker = match self.control.spawn_worker(&self.stop_check).await {
            Some(worker) => worker,
            None => return,
        };
        let mut state = WatchState::Watching;

        loop {
            match state {
                WatchState::Watching => {
                    let mut probe = match self.control.connect_probe(&self.stop_check).await {
                        Some(probe) => probe,
                        None => return,
                    };
                    slog::info!(self.logger, "Watching worker heartbeat");

                    state = loop {
                        self.clock.sleep(self.heartbeat_interval).await;
                        if self.stop_check.should_stop() {
                            return;
                        }
                        if !probe.check().await {
                            break WatchState::Promoting;
                        }
                    };
                }
                WatchState::Promoting => {
                    slog::warn!(self.logger, "Worker missed its beat, promoting a replacement");
                    drop(worker);

                    self.clock.sleep(self.promotion_grace).await;
                    if self.stop_check.should_stop() {
                        return;
                    }

                    worker = match self.control.spawn_worker(&self.stop_check).await {
                        Some(worker) => worker,
                        None => return,
                    };
                    slog::info!(self.logger, "Replacement worker launched");
                    state = WatchState::Watching;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heartbeat::mocked_clock;
    use std::collections::VecDeque;
    use std::fmt::Debug;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    #[derive(Debug, Eq, PartialEq)]
    enum ControlEvent {
        WorkerSpawned,
        WorkerTornDown,
        ProbeConnected,
    }

    // Notifies the test when the watchdog tears a worker down.
    struct DropGuard {
        events: mpsc::UnboundedSender<ControlEvent>,
    }

    impl Drop for DropGuard {
        fn drop(&mut self) {
            let _ = self.events.send(ControlEvent::WorkerTornDown);
        }
    }

    struct ScriptedProbe {
        script: Arc<Mutex<VecDeque<bool>>>,
    }

    #[async_trait::async_trait]
    impl LivenessProbe for ScriptedProbe {
        async fn check(&mut self) -> bool {
            self.script.lock().unwrap().pop_front().unwrap_or(true)
        }
    }

    struct ScriptedControl {
        script: Arc<Mutex<VecDeque<bool>>>,
        events: mpsc::UnboundedSender<ControlEvent>,
    }

    #[async_trait::async_trait]
    impl WorkerControl for ScriptedControl {
        type Probe = ScriptedProbe;

        async fn spawn_worker(&mut self, _stop_check: &StopCheck) -> Option<WorkerHandle> {
            self.events.send(ControlEvent::WorkerSpawned).unwrap();
            Some(WorkerHandle::new(DropGuard {
                events: self.events.clone(),
            }))
        }

        async fn connect_probe(&mut self, _stop_check: &StopCheck) -> Option<ScriptedProbe> {
            self.events.send(ControlEvent::ProbeConnected).unwrap();
            Some(ScriptedProbe {
                script: Arc::clone(&self.script),
            })
        }
    }

    async fn expect_event(rx: &mut mpsc::UnboundedReceiver<ControlEvent>, expected: ControlEvent) {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("Timed out waiting for watchdog event")
            .expect("Event channel closed");
        assert_eq!(event, expected);
    }

    async fn expect_no_event(rx: &mut mpsc::UnboundedReceiver<ControlEvent>) {
        tokio::time::timeout(Duration::from_millis(20), rx.recv())
            .await
            .expect_err("Expected no watchdog event");
    }

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    #[tokio::test]
    async fn missed_beat_promotes_a_replacement_worker() {
        let interval = Duration::from_millis(100);
        let grace = Duration::from_millis(200);
        let script = Arc::new(Mutex::new(VecDeque::from(vec![true, true, false])));
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let (mock_clock, mut clock_controller) = mocked_clock();
        let (_stopper, stop_check) = heartbeat::new_stop_signal();

        let control = ScriptedControl {
            script,
            events: events_tx,
        };
        let watchdog = Watchdog::new(test_logger(), control, mock_clock, interval, grace, stop_check);
        tokio::spawn(watchdog.run());

        expect_event(&mut events, ControlEvent::WorkerSpawned).await;
        expect_event(&mut events, ControlEvent::ProbeConnected).await;

        // Two healthy beats: nothing happens. Yield between advances so the
        // watchdog observes each one; back-to-back sends coalesce on the
        // mock clock's watch channel.
        clock_controller.advance(interval);
        tokio::task::yield_now().await;
        clock_controller.advance(interval);
        expect_no_event(&mut events).await;

        // Third beat misses: worker torn down, replacement after grace.
        clock_controller.advance(interval);
        expect_event(&mut events, ControlEvent::WorkerTornDown).await;
        expect_no_event(&mut events).await;

        clock_controller.advance(grace);
        expect_event(&mut events, ControlEvent::WorkerSpawned).await;
        expect_event(&mut events, ControlEvent::ProbeConnected).await;

        // Replacement is healthy; back to quiet watching.
        clock_controller.advance(interval);
        expect_no_event(&mut events).await;
    }

    #[tokio::test]
    async fn dropping_the_stopper_ends_the_watch() {
        let interval = Duration::from_millis(100);
        let script = Arc::new(Mutex::new(VecDeque::new()));
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let (mock_clock, mut clock_controller) = mocked_clock();
        let (stopper, stop_check) = heartbeat::new_stop_signal();

        let control = ScriptedControl {
            script,
            events: events_tx,
        };
        let watchdog = Watchdog::new(test_logger(), control, mock_clock, interval, interval, stop_check);
        let join = tokio::spawn(watchdog.run());

        expect_event(&mut events, ControlEvent::WorkerSpawned).await;
        expect_event(&mut events, ControlEvent::ProbeConnected).await;

        drop(stopper);
        clock_controller.advance(interval);

        join.await.unwrap();
        // The watchdog's worker went down with it.
        expect_event(&mut events, ControlEvent::WorkerTornDown).await;
    }
}
