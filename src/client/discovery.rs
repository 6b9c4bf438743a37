use crate::grpc::grpc_router_client::GrpcRouterClient;
use crate::grpc::ProtoDiscoveryReq;
use crate::router::ServerAddress;
use tonic::transport::Channel;
use tonic::Request;

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("router unreachable: {0}")]
    RouterUnreachable(String),
    #[error("no feed servers are online")]
    NoServers,
}

/// Client-side handle on the router's discovery surface.
pub struct Discovery {
    inner: GrpcRouterClient<Channel>,
}

impl Discovery {
    pub async fn connect(router_uri: String) -> Result<Self, DiscoveryError> {
        let inner = GrpcRouterClient::connect(router_uri)
            .await
            .map_err(|e| DiscoveryError::RouterUnreachable(e.to_string()))?;

        Ok(Discovery { inner })
    }

    /// Asks the router for the current primary. Reporting the server we last
    /// talked to lets the router re-elect if that server was still the
    /// advertised primary.
    pub async fn next_server(&mut self, known: &ServerAddress) -> Result<ServerAddress, DiscoveryError> {
        let request = Request::new(ProtoDiscoveryReq {
            known_host: known.host.clone(),
            known_port: u32::from(known.port),
        });

        let reply = self
            .inner
            .request_for_server(request)
            .await
            .map_err(|e| DiscoveryError::RouterUnreachable(e.to_string()))?
            .into_inner();

        let address = ServerAddress::new(reply.host, reply.port as u16);
        if address.is_error() {
            return Err(DiscoveryError::NoServers);
        }

        Ok(address)
    }
}
