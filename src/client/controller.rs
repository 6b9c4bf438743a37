use crate::client::discovery::{Discovery, DiscoveryError};
use crate::client::feed::{ClientError, CommandStatus, FeedClient};
use crate::client::switch::SwitchBarrier;
use crate::client::timeline::{self, TimelineLoops, TimelineWiring, TIMELINE_PARTICIPANTS};
use crate::engine::Post;
use crate::heartbeat::{Clock, LivenessProbe, PingProbe, RealClock};
use crate::options::{FeedOptions, FeedOptionsValidated};
use crate::router::ServerAddress;
use crate::server::END_MARKER;
use std::convert::TryFrom;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::Duration;

#[derive(Clone)]
pub struct ControllerConfig {
    pub router_uri: String,
    pub username: String,
    pub options: FeedOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("'{0}' is not a legal username")]
    InvalidUsername(String),
    #[error("illegal options: {0}")]
    IllegalOptions(&'static str),
    #[error(transparent)]
    Router(#[from] DiscoveryError),
    #[error(transparent)]
    Connect(#[from] ClientError),
    #[error("feed server rejected login: {0:?}")]
    Rejected(CommandStatus),
}

/// Why a running controller gave up. Both are fatal: with no router or no
/// servers, the session cannot continue.
#[derive(Debug, Eq, PartialEq)]
pub enum ControllerExit {
    NoServers,
    RouterUnreachable,
}

/// The client-side failover brain. Owns the liveness probe on the current
/// server; on a missed beat it asks the router for the new primary, logs the
/// session in there, publishes the new address, and trips the switch barrier
/// so the timeline loops re-home.
pub struct FailoverController {
    logger: slog::Logger,
    discovery: Discovery,
    username: String,
    current: ServerAddress,
    address_tx: watch::Sender<ServerAddress>,
    barrier: Arc<SwitchBarrier>,
    heartbeat_interval: Duration,
    liveness_timeout: Duration,
}

impl FailoverController {
    /// Discovers the primary, establishes the session, and spawns the
    /// timeline loops. `post_rx` carries composed post bodies in;
    /// `delivered_tx` carries timeline posts out.
    pub async fn start(
        logger: slog::Logger,
        config: ControllerConfig,
        post_rx: mpsc::Receiver<String>,
        delivered_tx: mpsc::Sender<Post>,
    ) -> Result<(FailoverController, TimelineLoops), ControllerError> {
        // The end marker is load-bearing on the wire and cannot name a user.
        if config.username == END_MARKER || config.username.is_empty() {
            return Err(ControllerError::InvalidUsername(config.username));
        }
        let validated = FeedOptionsValidated::try_from(config.options).map_err(ControllerError::IllegalOptions)?;

        let mut discovery = Discovery::connect(config.router_uri).await?;
        let current = discovery.next_server(&ServerAddress::unknown()).await?;
        slog::info!(logger, "Connecting to feed server '{}'", current);

        let mut feed = FeedClient::connect(&current).await?;
        match feed.initialize(config.username.clone()).await? {
            CommandStatus::Success => {}
            status => return Err(ControllerError::Rejected(status)),
        }

        let (address_tx, address_rx) = watch::channel(current.clone());
        let barrier = Arc::new(SwitchBarrier::new(TIMELINE_PARTICIPANTS));

        let loops = timeline::spawn_timeline_loops(
            TimelineWiring {
                logger: logger.new(slog::o!("Component" => "Timeline")),
                username: config.username.clone(),
                address_rx,
                barrier: Arc::clone(&barrier),
                update_poll_interval: validated.update_poll_interval,
                retry_interval: validated.heartbeat_interval,
            },
            post_rx,
            delivered_tx,
        );

        let controller = FailoverController {
            logger,
            discovery,
            username: config.username,
            current,
            address_tx,
            barrier,
            heartbeat_interval: validated.heartbeat_interval,
            liveness_timeout: validated.liveness_timeout,
        };

        Ok((controller, loops))
    }

    /// Always holds the address of the server currently serving the
    /// session. Command issuers dial whatever this names at call time.
    pub fn address_watch(&self) -> watch::Receiver<ServerAddress> {
        self.address_tx.subscribe()
    }

    /// Watches the current server until the session can no longer be served
    /// anywhere. Runs for the life of the client.
    pub async fn run(mut self) -> ControllerExit {
        let mut clock = RealClock;

        loop {
            if let Ok(mut probe) = PingProbe::connect(self.current.uri(), self.liveness_timeout).await {
                loop {
                    clock.sleep(self.heartbeat_interval).await;
                    if !probe.check().await {
                        break;
                    }
                }
                slog::warn!(self.logger, "Feed server '{}' missed its beat", self.current);
            }

            match self.discovery.next_server(&self.current).await {
                Ok(address) => self.switch_to(address, &mut clock).await,
                Err(DiscoveryError::NoServers) => {
                    slog::error!(self.logger, "No feed servers are online; giving up");
                    return ControllerExit::NoServers;
                }
                Err(DiscoveryError::RouterUnreachable(e)) => {
                    slog::error!(self.logger, "Router unreachable: {}; giving up", e);
                    return ControllerExit::RouterUnreachable;
                }
            }
        }
    }

    /// Re-homes the session. Initialize on the replacement is idempotent:
    /// the server may already hold the user from its recovered log.
    async fn switch_to(&mut self, address: ServerAddress, clock: &mut RealClock) {
        slog::warn!(self.logger, "Switching to feed server '{}'", address);

        match FeedClient::connect(&address).await {
            Ok(mut feed) => {
                if let Err(e) = feed.initialize(self.username.clone()).await {
                    slog::warn!(self.logger, "Login on '{}' failed: {}; retrying discovery", address, e);
                    clock.sleep(self.heartbeat_interval).await;
                    return;
                }
                self.current = address.clone();
                let _ = self.address_tx.send(address);
                self.barrier.trip();
            }
            Err(e) => {
                // The elected replacement may still be coming up. The next
                // pass re-runs discovery against the same dead `current`.
                slog::warn!(self.logger, "Cannot reach '{}': {}; retrying discovery", address, e);
                clock.sleep(self.heartbeat_interval).await;
            }
        }
    }
}
