use slog::Drain;

/// Builds the process root logger. Every binary tags its log lines with the
/// role it plays and an identity (listen address or username).
pub fn stdout_root_logger(role: &'static str, identity: String) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!("Role" => role, "Id" => identity))
}
