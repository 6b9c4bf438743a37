mod controller;
mod discovery;
mod feed;
mod switch;
mod timeline;

pub use controller::ControllerConfig;
pub use controller::ControllerError;
pub use controller::ControllerExit;
pub use controller::FailoverController;
pub use discovery::Discovery;
pub use discovery::DiscoveryError;
pub use feed::ClientError;
pub use feed::CommandStatus;
pub use feed::FeedClient;
pub use feed::ListReply;
pub use switch::SwitchBarrier;
pub use timeline::TimelineLoops;
