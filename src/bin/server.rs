use feedmesh::{spawn_watchdog, stdout_root_logger, FeedOptions, FeedServerConfig, FeedWorkerControl, ServerAddress};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_LISTEN: &str = "127.0.0.1:9100";
const DEFAULT_ROUTER: &str = "http://127.0.0.1:9000";

fn flag_value(name: &str) -> Option<String> {
    let mut args = std::env::args();
    while let Some(arg) = args.next() {
        if arg == name {
            return args.next();
        }
    }
    None
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let listen: SocketAddr = flag_value("--listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string())
        .parse()?;
    let router_uri = flag_value("--router").unwrap_or_else(|| DEFAULT_ROUTER.to_string());
    let wal_path = PathBuf::from(
        flag_value("--log-file").unwrap_or_else(|| format!("feedmesh-{}.wal", listen.port())),
    );

    let logger = stdout_root_logger("server", listen.to_string());
    let config = FeedServerConfig {
        listen_addr: listen,
        advertised: ServerAddress::new(listen.ip().to_string(), listen.port()),
        router_uri,
        wal_path,
        options: FeedOptions::default(),
    };

    // The watchdog runs the feed server as its worker: it launches the
    // server (replaying the log), watches its liveness stream, and launches
    // a replacement from the same log if it ever misses a beat.
    let control = FeedWorkerControl::new(logger.clone(), config).map_err(String::from)?;
    let stopper = spawn_watchdog(logger.clone(), control, FeedOptions::default()).map_err(String::from)?;

    tokio::signal::ctrl_c().await?;
    slog::info!(logger, "Interrupted, shutting down");
    drop(stopper);

    Ok(())
}
