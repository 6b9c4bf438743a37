mod registration;
mod rpc;
mod shutdown;
mod wiring;

pub use rpc::FeedRpcServer;
pub use rpc::END_MARKER;
pub use shutdown::shutdown_signal;
pub use shutdown::RpcServerShutdownHandle;
pub use shutdown::RpcServerShutdownSignal;
pub use wiring::try_create_feed_server;
pub use wiring::FeedServerConfig;
pub use wiring::FeedServerHandle;
pub use wiring::ServerCreationError;
