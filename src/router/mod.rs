mod registry;
mod rpc;

pub use registry::Registry;
pub use registry::ServerAddress;
pub use rpc::RouterRpcServer;
