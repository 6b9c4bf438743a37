mod entry;
mod log;

pub use entry::LogEntry;
pub use log::recover;
pub use log::WalError;
pub use log::WriteAheadLog;
