mod actor;
mod client;
mod engine;
mod heartbeat;
mod logging;
mod options;
mod router;
mod server;
mod supervision;
mod wal;
mod grpc {
    include!("../generated/feedmesh.rs");
}

pub use client::ClientError;
pub use client::CommandStatus;
pub use client::ControllerConfig;
pub use client::ControllerError;
pub use client::ControllerExit;
pub use client::Discovery;
pub use client::DiscoveryError;
pub use client::FailoverController;
pub use client::FeedClient;
pub use client::ListReply;
pub use client::SwitchBarrier;
pub use client::TimelineLoops;
pub use engine::Post;
pub use logging::stdout_root_logger;
pub use options::FeedOptions;
pub use router::Registry;
pub use router::RouterRpcServer;
pub use router::ServerAddress;
pub use server::shutdown_signal;
pub use server::try_create_feed_server;
pub use server::RpcServerShutdownHandle;
pub use server::RpcServerShutdownSignal;
pub use server::FeedServerConfig;
pub use server::FeedServerHandle;
pub use server::ServerCreationError;
pub use server::END_MARKER;
pub use supervision::spawn_watchdog;
pub use supervision::FeedWorkerControl;
pub use supervision::WorkerControl;
pub use supervision::WorkerHandle;
