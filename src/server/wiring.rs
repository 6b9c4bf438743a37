use crate::actor::{self, EngineClient};
use crate::heartbeat::{self, RealClock, Stopper};
use crate::options::{FeedOptions, FeedOptionsValidated};
use crate::router::ServerAddress;
use crate::server::registration::run_registration_stream;
use crate::server::rpc::FeedRpcServer;
use crate::server::shutdown::{shutdown_signal, RpcServerShutdownHandle};
use crate::wal::{self, WalError};
use std::convert::TryFrom;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone)]
pub struct FeedServerConfig {
    /// Socket the RPC server binds.
    pub listen_addr: SocketAddr,
    /// Address announced to the router; what clients will dial.
    pub advertised: ServerAddress,
    pub router_uri: String,
    pub wal_path: PathBuf,
    pub options: FeedOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerCreationError {
    #[error("write-ahead log recovery failed: {0}")]
    WalRecovery(#[from] WalError),
    #[error("illegal options for configuring server: {0}")]
    IllegalOptions(&'static str),
}

/// Owns every task of one running feed server. Dropping the handle shuts
/// down the RPC server, the registration stream, and (once all clients are
/// gone) the engine actor.
pub struct FeedServerHandle {
    _engine: EngineClient,
    _rpc_shutdown: RpcServerShutdownHandle,
    _registration_stopper: Stopper,
}

/// Recovers state from the write-ahead log, then brings up the engine actor,
/// the RPC server, and the router registration stream.
pub async fn try_create_feed_server(
    logger: slog::Logger,
    config: FeedServerConfig,
) -> Result<FeedServerHandle, ServerCreationError> {
    let options = FeedOptionsValidated::try_from(config.options).map_err(ServerCreationError::IllegalOptions)?;

    let (graph, wal) = wal::recover(&config.wal_path, &logger)?;

    let (engine_client, engine_actor) = actor::create(32, logger.clone(), graph, wal);
    tokio::spawn(engine_actor.run_event_loop());

    let (rpc_shutdown, rpc_shutdown_signal) = shutdown_signal();
    let rpc_server = FeedRpcServer::new(logger.clone(), engine_client.clone());
    tokio::spawn(rpc_server.run(config.listen_addr, rpc_shutdown_signal));

    let (registration_stopper, registration_stop_check) = heartbeat::new_stop_signal();
    tokio::spawn(run_registration_stream(
        logger,
        config.router_uri,
        config.advertised,
        options.registration_interval,
        RealClock,
        registration_stop_check,
    ));

    Ok(FeedServerHandle {
        _engine: engine_client,
        _rpc_shutdown: rpc_shutdown,
        _registration_stopper: registration_stopper,
    })
}
