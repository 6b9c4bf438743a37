use std::fmt;
use std::sync::Mutex;

/// Identity of a reachable feed server process. Equality is by value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

// Advertised when no server is online.
const ERROR_HOST: &str = "ERROR";

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ServerAddress {
            host: host.into(),
            port,
        }
    }

    /// Sentinel advertised by the router when the registry is empty.
    pub fn error() -> Self {
        ServerAddress {
            host: ERROR_HOST.to_string(),
            port: 0,
        }
    }

    /// Placeholder for a client that has not connected anywhere yet.
    pub fn unknown() -> Self {
        ServerAddress {
            host: String::new(),
            port: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.host == ERROR_HOST
    }

    pub fn uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

struct RegistryState {
    primary: ServerAddress,
    // Insertion order is election priority: oldest surviving standby wins.
    standbys: Vec<ServerAddress>,
}

/// Tracks which feed servers are online and which one is advertised as
/// primary. Mutated from every registration stream and every discovery
/// call; the mutex keeps elections single-writer.
pub struct Registry {
    logger: slog::Logger,
    state: Mutex<RegistryState>,
}

impl Registry {
    pub fn new(logger: slog::Logger) -> Self {
        Registry {
            logger,
            state: Mutex::new(RegistryState {
                primary: ServerAddress::error(),
                standbys: Vec::new(),
            }),
        }
    }

    /// Registers a heartbeating server. The first server ever seen becomes
    /// primary immediately; later ones queue as standbys in arrival order.
    pub fn observe_online(&self, address: ServerAddress) {
        let mut state = self.state.lock().expect("Registry mutex poisoned");

        if state.standbys.contains(&address) {
            return;
        }
        if state.standbys.is_empty() {
            slog::info!(self.logger, "First server online, advertising '{}' as primary", address);
            state.primary = address.clone();
        } else {
            slog::info!(self.logger, "Server '{}' registered as standby", address);
        }
        state.standbys.push(address);
    }

    /// Deregisters a server whose heartbeat stream stopped. Losing the
    /// primary triggers an election; losing a standby is just bookkeeping.
    pub fn observe_offline(&self, address: &ServerAddress) {
        let mut state = self.state.lock().expect("Registry mutex poisoned");

        state.standbys.retain(|s| s != address);
        if state.primary == *address {
            Self::elect(&self.logger, &mut state);
        } else {
            slog::info!(self.logger, "Standby '{}' went offline", address);
        }
    }

    /// Client discovery. A client reporting that its known server *is* the
    /// advertised primary means the client saw the death before we did, so
    /// re-elect before answering.
    pub fn discover(&self, client_known_server: &ServerAddress) -> ServerAddress {
        let mut state = self.state.lock().expect("Registry mutex poisoned");

        if *client_known_server == state.primary && !state.primary.is_error() {
            slog::warn!(
                self.logger,
                "Client reported primary '{}' dead, running election",
                client_known_server
            );
            state.standbys.retain(|s| s != client_known_server);
            Self::elect(&self.logger, &mut state);
        }

        state.primary.clone()
    }

    pub fn current_primary(&self) -> ServerAddress {
        self.state.lock().expect("Registry mutex poisoned").primary.clone()
    }

    // Pure FIFO: the oldest-registered surviving standby wins, no load or
    // health weighting. Caller must have already removed the dead address.
    fn elect(logger: &slog::Logger, state: &mut RegistryState) {
        match state.standbys.first() {
            Some(next) => {
                state.primary = next.clone();
                slog::info!(logger, "Elected '{}' as the new primary", state.primary);
            }
            None => {
                state.primary = ServerAddress::error();
                slog::error!(logger, "No servers left online, advertising the error sentinel");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn addr(n: u16) -> ServerAddress {
        ServerAddress::new("10.0.0.1", 3000 + n)
    }

    #[test]
    fn first_server_becomes_primary() {
        let registry = Registry::new(test_logger());

        registry.observe_online(addr(0));
        registry.observe_online(addr(1));

        assert_eq!(registry.current_primary(), addr(0));
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let registry = Registry::new(test_logger());

        registry.observe_online(addr(0));
        registry.observe_online(addr(0));
        registry.observe_online(addr(1));

        // Killing the primary must not find a duplicate of it waiting.
        registry.observe_offline(&addr(0));
        assert_eq!(registry.current_primary(), addr(1));
    }

    #[test]
    fn election_is_fifo_over_surviving_standbys() {
        let registry = Registry::new(test_logger());
        for n in 0..4 {
            registry.observe_online(addr(n));
        }

        registry.observe_offline(&addr(0));
        assert_eq!(registry.current_primary(), addr(1));

        registry.observe_offline(&addr(1));
        assert_eq!(registry.current_primary(), addr(2));
    }

    #[test]
    fn standby_death_does_not_change_primary() {
        let registry = Registry::new(test_logger());
        for n in 0..3 {
            registry.observe_online(addr(n));
        }

        registry.observe_offline(&addr(1));
        assert_eq!(registry.current_primary(), addr(0));

        // The dead standby is out of the line of succession.
        registry.observe_offline(&addr(0));
        assert_eq!(registry.current_primary(), addr(2));
    }

    #[test]
    fn last_server_dying_yields_error_sentinel() {
        let registry = Registry::new(test_logger());
        registry.observe_online(addr(0));

        registry.observe_offline(&addr(0));

        assert!(registry.current_primary().is_error());
    }

    #[test]
    fn discover_with_stale_address_returns_primary() {
        let registry = Registry::new(test_logger());
        registry.observe_online(addr(0));
        registry.observe_online(addr(1));

        assert_eq!(registry.discover(&ServerAddress::unknown()), addr(0));
        assert_eq!(registry.discover(&addr(1)), addr(0));
        assert_eq!(registry.current_primary(), addr(0));
    }

    #[test]
    fn discover_reporting_the_primary_triggers_election() {
        let registry = Registry::new(test_logger());
        registry.observe_online(addr(0));
        registry.observe_online(addr(1));

        assert_eq!(registry.discover(&addr(0)), addr(1));
        assert_eq!(registry.current_primary(), addr(1));
    }

    #[test]
    fn discover_with_no_servers_yields_error_sentinel() {
        let registry = Registry::new(test_logger());

        let answer = registry.discover(&ServerAddress::unknown());
        assert!(answer.is_error());

        // Repeated reports of the sentinel must not loop into elections.
        let answer = registry.discover(&ServerAddress::error());
        assert!(answer.is_error());
    }

    #[test]
    fn server_returning_after_total_outage_becomes_primary() {
        let registry = Registry::new(test_logger());
        registry.observe_online(addr(0));
        registry.observe_offline(&addr(0));
        assert!(registry.current_primary().is_error());

        registry.observe_online(addr(5));
        assert_eq!(registry.current_primary(), addr(5));
    }
}
