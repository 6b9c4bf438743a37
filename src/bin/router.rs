use feedmesh::{shutdown_signal, stdout_root_logger, Registry, RouterRpcServer};
use std::net::SocketAddr;
use std::sync::Arc;

const DEFAULT_LISTEN: &str = "127.0.0.1:9000";

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

    let logger = stdout_root_logger("router", listen.to_string());
    let registry = Arc::new(Registry::new(logger.clone()));
    let rpc = RouterRpcServer::new(logger.clone(), registry);

    let (shutdown_handle, signal) = shutdown_signal();
    let server = tokio::spawn(rpc.run(listen, signal));

    tokio::signal::ctrl_c().await?;
    slog::info!(logger, "Interrupted, shutting down");
    drop(shutdown_handle);
    server.await?;

    Ok(())
}
