use crate::grpc::grpc_feed_client::GrpcFeedClient;
use crate::grpc::ProtoLiveness;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Streaming;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to connect liveness stream: {0}")]
    Connect(#[from] tonic::transport::Error),
    #[error("liveness stream rejected: {0}")]
    Rpc(#[from] tonic::Status),
}

/// One liveness observation. `false` means the peer missed its beat and
/// should be declared dead.
#[async_trait::async_trait]
pub trait LivenessProbe: Send + 'static {
    async fn check(&mut self) -> bool;
}

/// Liveness over the feed server's Ping stream: push a token, expect the ack
/// within the configured timeout. Used by both the standby watchdog and the
/// client failover controller.
pub struct PingProbe {
    outbound: mpsc::Sender<ProtoLiveness>,
    inbound: Streaming<ProtoLiveness>,
    ack_timeout: Duration,
}

impl PingProbe {
    pub async fn connect(server_uri: String, ack_timeout: Duration) -> Result<Self, ProbeError> {
        let mut client = GrpcFeedClient::connect(server_uri).await?;
        let (outbound, rx) = mpsc::channel(1);
        let inbound = client.ping(ReceiverStream::new(rx)).await?.into_inner();

        Ok(PingProbe {
            outbound,
            inbound,
            ack_timeout,
        })
    }
}

#[async_trait::async_trait]
impl LivenessProbe for PingProbe {
    async fn check(&mut self) -> bool {
        if self.outbound.send(ProtoLiveness { alive: true }).await.is_err() {
            return false;
        }

        match tokio::time::timeout(self.ack_timeout, self.inbound.message()).await {
            Ok(Ok(Some(ack))) => ack.alive,
            // Stream closed, errored, or no ack within the window.
            _ => false,
        }
    }
}
