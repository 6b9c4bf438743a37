use std::convert::TryFrom;
use tokio::time::Duration;

/// Cadences for the liveness and failover protocols. All fields default to
/// the 0.5s-2s range the protocols were designed around; tests shrink them.
#[derive(Clone, Default)]
pub struct FeedOptions {
    /// How often a liveness token is pushed on a Ping stream, by both the
    /// standby watchdog and the client controller.
    pub heartbeat_interval: Option<Duration>,
    /// How long to wait for the liveness ack before declaring the peer dead.
    pub liveness_timeout: Option<Duration>,
    /// Pause between tearing down a dead worker and spawning its replacement.
    pub promotion_grace: Option<Duration>,
    /// How often the client's update poller asks for its timeline backlog.
    pub update_poll_interval: Option<Duration>,
    /// How often a server re-announces itself to the router.
    pub registration_interval: Option<Duration>,
}

pub(crate) struct FeedOptionsValidated {
    pub heartbeat_interval: Duration,
    pub liveness_timeout: Duration,
    pub promotion_grace: Duration,
    pub update_poll_interval: Duration,
    pub registration_interval: Duration,
}

impl FeedOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.liveness_timeout < self.heartbeat_interval {
            return Err("Liveness timeout must be at least the heartbeat interval");
        }
        if self.heartbeat_interval.is_zero() {
            return Err("Heartbeat interval must be non-zero");
        }
        if self.registration_interval.is_zero() {
            return Err("Registration interval must be non-zero");
        }

        Ok(())
    }
}

impl TryFrom<FeedOptions> for FeedOptionsValidated {
    type Error = &'static str;

    fn try_from(options: FeedOptions) -> Result<Self, Self::Error> {
        let values = FeedOptionsValidated {
            heartbeat_interval: options.heartbeat_interval.unwrap_or(Duration::from_millis(500)),
            liveness_timeout: options.liveness_timeout.unwrap_or(Duration::from_millis(2000)),
            promotion_grace: options.promotion_grace.unwrap_or(Duration::from_millis(2000)),
            update_poll_interval: options.update_poll_interval.unwrap_or(Duration::from_millis(1000)),
            registration_interval: options.registration_interval.unwrap_or(Duration::from_millis(2000)),
        };

        values.validate()?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let validated = FeedOptionsValidated::try_from(FeedOptions::default());
        assert!(validated.is_ok());
    }

    #[test]
    fn liveness_timeout_shorter_than_heartbeat_is_rejected() {
        let options = FeedOptions {
            heartbeat_interval: Some(Duration::from_millis(500)),
            liveness_timeout: Some(Duration::from_millis(100)),
            ..FeedOptions::default()
        };

        assert!(FeedOptionsValidated::try_from(options).is_err());
    }
}
