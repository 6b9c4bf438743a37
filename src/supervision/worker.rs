use crate::heartbeat::{Clock, PingProbe, RealClock, StopCheck};
use crate::options::FeedOptionsValidated;
use crate::server::{try_create_feed_server, FeedServerConfig};
use crate::supervision::watchdog::{WorkerControl, WorkerHandle};
use std::convert::TryFrom;
use tokio::time::Duration;

/// WorkerControl for the real deployment: the worker is a full feed server
/// (engine actor + RPC server + registration stream) and the probe is a Ping
/// stream dialed at the server's own listen address.
pub struct FeedWorkerControl {
    logger: slog::Logger,
    config: FeedServerConfig,
    liveness_timeout: Duration,
    retry_interval: Duration,
}

impl FeedWorkerControl {
    pub fn new(logger: slog::Logger, config: FeedServerConfig) -> Result<Self, &'static str> {
        let validated = FeedOptionsValidated::try_from(config.options.clone())?;

        Ok(FeedWorkerControl {
            logger,
            config,
            liveness_timeout: validated.liveness_timeout,
            retry_interval: validated.heartbeat_interval,
        })
    }

    fn probe_uri(&self) -> String {
        format!("http://{}", self.config.listen_addr)
    }
}

#[async_trait::async_trait]
impl WorkerControl for FeedWorkerControl {
    type Probe = PingProbe;

    // Spawning replays the WAL from the shared path, so the replacement
    // worker comes up with the dead one's state. Retries stop as soon as a
    // shutdown is requested; a server must never launch after that point.
    async fn spawn_worker(&mut self, stop_check: &StopCheck) -> Option<WorkerHandle> {
        let mut clock = RealClock;
        loop {
            if stop_check.should_stop() {
                return None;
            }
            match try_create_feed_server(self.logger.clone(), self.config.clone()).await {
                Ok(handle) => return Some(WorkerHandle::new(handle)),
                Err(e) => {
                    slog::error!(self.logger, "Failed to launch feed server: {}; retrying", e);
                    clock.sleep(self.retry_interval).await;
                }
            }
        }
    }

    async fn connect_probe(&mut self, stop_check: &StopCheck) -> Option<PingProbe> {
        let mut clock = RealClock;
        loop {
            if stop_check.should_stop() {
                return None;
            }
            match PingProbe::connect(self.probe_uri(), self.liveness_timeout).await {
                Ok(probe) => return Some(probe),
                Err(e) => {
                    slog::warn!(self.logger, "Liveness stream not up yet: {}; retrying", e);
                    clock.sleep(self.retry_interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heartbeat;
    use crate::options::FeedOptions;
    use crate::router::ServerAddress;

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    // Nothing listens at port 1, so every probe connect fails.
    fn unreachable_config() -> FeedServerConfig {
        FeedServerConfig {
            listen_addr: "127.0.0.1:1".parse().unwrap(),
            advertised: ServerAddress::new("127.0.0.1", 1),
            router_uri: "http://127.0.0.1:1".to_string(),
            wal_path: std::env::temp_dir().join(format!("feedmesh-worker-{}.wal", std::process::id())),
            options: FeedOptions {
                heartbeat_interval: Some(Duration::from_millis(50)),
                liveness_timeout: Some(Duration::from_millis(50)),
                ..FeedOptions::default()
            },
        }
    }

    #[tokio::test]
    async fn probe_retry_ends_when_shutdown_is_requested() {
        let (stopper, stop_check) = heartbeat::new_stop_signal();
        let mut control = FeedWorkerControl::new(test_logger(), unreachable_config()).unwrap();

        drop(stopper);
        assert!(control.connect_probe(&stop_check).await.is_none());
    }

    #[tokio::test]
    async fn spawn_retry_ends_when_shutdown_is_requested() {
        let (stopper, stop_check) = heartbeat::new_stop_signal();
        // Pointing the log at a directory makes every launch attempt fail,
        // keeping the control stuck in its retry loop.
        let mut config = unreachable_config();
        config.wal_path = std::env::temp_dir();
        let mut control = FeedWorkerControl::new(test_logger(), config).unwrap();

        let task = tokio::spawn(async move { control.spawn_worker(&stop_check).await.is_none() });

        // Let at least one launch attempt fail before requesting shutdown.
        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(stopper);

        let gave_up = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("Retry loop ignored the stop signal")
            .unwrap();
        assert!(gave_up);
    }
}
