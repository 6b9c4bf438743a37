use crate::grpc::grpc_router_client::GrpcRouterClient;
use crate::grpc::ProtoServerAnnouncement;
use crate::heartbeat::{Clock, StopCheck};
use crate::router::ServerAddress;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_stream::wrappers::ReceiverStream;

/// Keeps a registration stream open to the router for the life of the
/// server: push `{address, online}` every interval, read back the primary
/// announcement the router echoes. A broken stream is re-established until
/// the stop signal fires.
pub(crate) async fn run_registration_stream<C: Clock>(
    logger: slog::Logger,
    router_uri: String,
    advertised: ServerAddress,
    interval: Duration,
    mut clock: C,
    stop_check: StopCheck,
) {
    while !stop_check.should_stop() {
        match register_until_broken(&logger, &router_uri, &advertised, interval, &mut clock, &stop_check).await {
            Ok(()) => return, // stop signal observed
            Err(e) => {
                slog::warn!(logger, "Registration stream to '{}' broke: {}; retrying", router_uri, e);
                clock.sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RegistrationError {
    #[error("router connection failed: {0}")]
    Connect(#[from] tonic::transport::Error),
    #[error("registration stream rejected: {0}")]
    Rpc(#[from] tonic::Status),
    #[error("router closed the registration stream")]
    StreamClosed,
}

async fn register_until_broken<C: Clock>(
    logger: &slog::Logger,
    router_uri: &str,
    advertised: &ServerAddress,
    interval: Duration,
    clock: &mut C,
    stop_check: &StopCheck,
) -> Result<(), RegistrationError> {
    let mut client = GrpcRouterClient::connect(router_uri.to_string()).await?;
    let (tx, rx) = mpsc::channel(1);
    let mut inbound = client.register_server(ReceiverStream::new(rx)).await?.into_inner();

    slog::info!(logger, "Registered with router at '{}'", router_uri);

    loop {
        if stop_check.should_stop() {
            // Dropping tx closes the stream; the router will deregister us.
            return Ok(());
        }

        let announcement = ProtoServerAnnouncement {
            host: advertised.host.clone(),
            port: advertised.port as u32,
            online: true,
        };
        if tx.send(announcement).await.is_err() {
            return Err(RegistrationError::StreamClosed);
        }

        match inbound.message().await? {
            Some(primary) => {
                slog::debug!(logger, "Router advertises primary '{}:{}'", primary.host, primary.port);
            }
            None => return Err(RegistrationError::StreamClosed),
        }

        clock.sleep(interval).await;
    }
}
