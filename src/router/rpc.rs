use crate::grpc::grpc_router_server::{GrpcRouter, GrpcRouterServer};
use crate::grpc::{ProtoDiscoveryReq, ProtoDiscoveryResp, ProtoServerAnnouncement};
use crate::router::registry::{Registry, ServerAddress};
use crate::server::RpcServerShutdownSignal;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status, Streaming};

/// RouterRpcServer exposes the registry over gRPC: a long-lived registration
/// stream per server, and unary discovery for clients.
pub struct RouterRpcServer {
    logger: slog::Logger,
    registry: Arc<Registry>,
}

impl RouterRpcServer {
    pub fn new(logger: slog::Logger, registry: Arc<Registry>) -> Self {
        RouterRpcServer { logger, registry }
    }

    pub async fn run(self, socket_addr: SocketAddr, shutdown_signal: RpcServerShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Router listening on '{:?}'", socket_addr);

        let result = Server::builder()
            .add_service(GrpcRouterServer::new(self))
            .serve_with_shutdown(socket_addr, shutdown_signal)
            .await;

        slog::info!(logger, "Router run() has exited: {:?}", result);
    }
}

fn announcement_of(address: &ServerAddress) -> ProtoServerAnnouncement {
    ProtoServerAnnouncement {
        host: address.host.clone(),
        port: address.port as u32,
        online: true,
    }
}

#[async_trait::async_trait]
impl GrpcRouter for RouterRpcServer {
    type RegisterServerStream = ReceiverStream<Result<ProtoServerAnnouncement, Status>>;

    async fn register_server(
        &self,
        request: Request<Streaming<ProtoServerAnnouncement>>,
    ) -> Result<Response<Self::RegisterServerStream>, Status> {
        let mut inbound = request.into_inner();
        let registry = Arc::clone(&self.registry);
        let logger = self.logger.clone();
        let (tx, rx) = mpsc::channel(4);

        tokio::spawn(async move {
            let mut registered: Option<ServerAddress> = None;

            loop {
                let announcement = match inbound.message().await {
                    Ok(Some(announcement)) => announcement,
                    // Stream closed or broken: the server missed its beat.
                    Ok(None) | Err(_) => break,
                };
                if !announcement.online {
                    break;
                }

                let address = ServerAddress::new(announcement.host, announcement.port as u16);
                registry.observe_online(address.clone());
                registered = Some(address);

                // Echo the current primary back on every push.
                let primary = registry.current_primary();
                if tx.send(Ok(announcement_of(&primary))).await.is_err() {
                    break;
                }
            }

            if let Some(address) = registered {
                slog::warn!(logger, "Registration stream from '{}' ended", address);
                registry.observe_offline(&address);
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn request_for_server(
        &self,
        request: Request<ProtoDiscoveryReq>,
    ) -> Result<Response<ProtoDiscoveryResp>, Status> {
        let req = request.into_inner();
        let known = ServerAddress::new(req.known_host, req.known_port as u16);

        let primary = self.registry.discover(&known);
        slog::debug!(self.logger, "Discovery: known '{}' -> primary '{}'", known, primary);

        Ok(Response::new(ProtoDiscoveryResp {
            host: primary.host,
            port: primary.port as u32,
        }))
    }
}
