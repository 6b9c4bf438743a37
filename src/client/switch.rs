use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Rendezvous coordinating the timeline loops through a server switch. The
/// controller trips the barrier after re-homing the connection; each loop
/// observes the new generation on its own cadence, acknowledges, and breaks
/// out to reconnect. Once every participant has acknowledged, the barrier is
/// idle again.
pub struct SwitchBarrier {
    generation: AtomicU64,
    outstanding: AtomicUsize,
    participants: usize,
    notify: Notify,
}

impl SwitchBarrier {
    pub fn new(participants: usize) -> Self {
        SwitchBarrier {
            generation: AtomicU64::new(0),
            outstanding: AtomicUsize::new(0),
            participants,
            notify: Notify::new(),
        }
    }

    /// Publishes a new switch generation and wakes every waiting loop.
    pub fn trip(&self) {
        self.outstanding.store(self.participants, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Called once per loop per observed generation.
    pub fn acknowledge(&self) {
        let _ = self
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// True when no switch is in flight.
    pub fn is_idle(&self) -> bool {
        self.outstanding.load(Ordering::SeqCst) == 0
    }

    /// Resolves with the current generation once it differs from
    /// `last_seen`.
    pub async fn tripped(&self, last_seen: u64) -> u64 {
        loop {
            // Register interest before re-checking, so a concurrent trip()
            // between check and await cannot be missed.
            let notified = self.notify.notified();

            let generation = self.generation();
            if generation != last_seen {
                return generation;
            }

            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn trip_and_full_acknowledgement_resets_to_idle() {
        let barrier = SwitchBarrier::new(3);
        assert!(barrier.is_idle());
        assert_eq!(barrier.generation(), 0);

        barrier.trip();
        assert!(!barrier.is_idle());
        assert_eq!(barrier.generation(), 1);

        barrier.acknowledge();
        barrier.acknowledge();
        assert!(!barrier.is_idle());
        barrier.acknowledge();
        assert!(barrier.is_idle());
    }

    #[test]
    fn extra_acknowledgements_do_not_underflow() {
        let barrier = SwitchBarrier::new(1);
        barrier.trip();
        barrier.acknowledge();
        barrier.acknowledge();

        assert!(barrier.is_idle());
        barrier.trip();
        assert!(!barrier.is_idle());
    }

    #[tokio::test]
    async fn tripped_wakes_a_waiting_loop() {
        let barrier = Arc::new(SwitchBarrier::new(1));
        let seen = barrier.generation();

        let waiter = {
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move { barrier.tripped(seen).await })
        };

        // Give the waiter time to park before tripping.
        tokio::time::sleep(Duration::from_millis(20)).await;
        barrier.trip();

        let generation = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("Waiter never woke")
            .unwrap();
        assert_eq!(generation, 1);
    }

    #[tokio::test]
    async fn tripped_returns_immediately_for_stale_observer() {
        let barrier = SwitchBarrier::new(1);
        barrier.trip();
        barrier.trip();

        let generation = barrier.tripped(0).await;
        assert_eq!(generation, 2);
    }
}
