mod probe;
mod stop_signal;
mod time;

pub use probe::LivenessProbe;
pub use probe::PingProbe;
pub use probe::ProbeError;
pub use stop_signal::new as new_stop_signal;
pub use stop_signal::StopCheck;
pub use stop_signal::Stopper;
pub use time::Clock;
pub use time::RealClock;

#[cfg(test)]
pub(crate) use time::mocked_clock;
