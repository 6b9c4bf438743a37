#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoUserReq {
    #[prost(string, tag = "1")]
    pub username: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRelationReq {
    #[prost(string, tag = "1")]
    pub username: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub other_username: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoCommandResult {
    #[prost(enumeration = "ProtoStatus", tag = "1")]
    pub status: i32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoListEntry {
    /// A follower of the requesting user, or the end marker once the follower
    /// list is exhausted.
    #[prost(string, tag = "1")]
    pub follower: ::prost::alloc::string::String,
    /// The next entry of the global all-users sequence, in creation order.
    #[prost(string, tag = "2")]
    pub all_users_entry: ::prost::alloc::string::String,
    #[prost(enumeration = "ProtoStatus", tag = "3")]
    pub status: i32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoTimelineMsg {
    #[prost(string, tag = "1")]
    pub username: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub time: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub content: ::prost::alloc::string::String,
    /// true: drain the backlog for `username`. false: this is a new post.
    #[prost(bool, tag = "4")]
    pub requesting_update: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoLiveness {
    #[prost(bool, tag = "1")]
    pub alive: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoServerAnnouncement {
    #[prost(string, tag = "1")]
    pub host: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub port: u32,
    #[prost(bool, tag = "3")]
    pub online: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDiscoveryReq {
    /// The server the client currently believes it is connected to. If this
    /// equals the advertised primary, the router treats the call as a death
    /// report and re-elects before answering.
    #[prost(string, tag = "1")]
    pub known_host: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub known_port: u32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDiscoveryResp {
    #[prost(string, tag = "1")]
    pub host: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub port: u32,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ProtoStatus {
    Unknown = 0,
    Success = 1,
    AlreadyExists = 2,
    NotExists = 3,
    Invalid = 4,
    NotFollowing = 5,
    Corrupted = 6,
}
#[doc = r" Generated client implementations."]
pub mod grpc_feed_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Feed server surface. Unary user-graph commands, a server-streamed listing,"]
    #[doc = " a bidirectional timeline stream, and a liveness echo stream."]
    pub struct GrpcFeedClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcFeedClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcFeedClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn initialize(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoUserReq>,
        ) -> Result<tonic::Response<super::ProtoCommandResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/feedmesh.GrpcFeed/Initialize");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn follow(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoRelationReq>,
        ) -> Result<tonic::Response<super::ProtoCommandResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/feedmesh.GrpcFeed/Follow");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn unfollow(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoRelationReq>,
        ) -> Result<tonic::Response<super::ProtoCommandResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/feedmesh.GrpcFeed/Unfollow");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn list(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoUserReq>,
        ) -> Result<tonic::Response<tonic::codec::Streaming<super::ProtoListEntry>>, tonic::Status>
        {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/feedmesh.GrpcFeed/List");
            self.inner
                .server_streaming(request.into_request(), path, codec)
                .await
        }
        pub async fn timeline(
            &mut self,
            request: impl tonic::IntoStreamingRequest<Message = super::ProtoTimelineMsg>,
        ) -> Result<tonic::Response<tonic::codec::Streaming<super::ProtoTimelineMsg>>, tonic::Status>
        {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/feedmesh.GrpcFeed/Timeline");
            self.inner
                .streaming(request.into_streaming_request(), path, codec)
                .await
        }
        pub async fn ping(
            &mut self,
            request: impl tonic::IntoStreamingRequest<Message = super::ProtoLiveness>,
        ) -> Result<tonic::Response<tonic::codec::Streaming<super::ProtoLiveness>>, tonic::Status>
        {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/feedmesh.GrpcFeed/Ping");
            self.inner
                .streaming(request.into_streaming_request(), path, codec)
                .await
        }
    }
    impl<T: Clone> Clone for GrpcFeedClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcFeedClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcFeedClient {{ ... }}")
        }
    }
}
#[doc = r" Generated client implementations."]
pub mod grpc_router_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Discovery/failover router surface. Servers hold a long-lived registration"]
    #[doc = " stream open; clients ask for the current primary."]
    pub struct GrpcRouterClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcRouterClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcRouterClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn register_server(
            &mut self,
            request: impl tonic::IntoStreamingRequest<Message = super::ProtoServerAnnouncement>,
        ) -> Result<
            tonic::Response<tonic::codec::Streaming<super::ProtoServerAnnouncement>>,
            tonic::Status,
        > {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/feedmesh.GrpcRouter/RegisterServer");
            self.inner
                .streaming(request.into_streaming_request(), path, codec)
                .await
        }
        pub async fn request_for_server(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoDiscoveryReq>,
        ) -> Result<tonic::Response<super::ProtoDiscoveryResp>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path =
                http::uri::PathAndQuery::from_static("/feedmesh.GrpcRouter/RequestForServer");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcRouterClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcRouterClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcRouterClient {{ ... }}")
        }
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_feed_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcFeedServer."]
    #[async_trait]
    pub trait GrpcFeed: Send + Sync + 'static {
        async fn initialize(
            &self,
            request: tonic::Request<super::ProtoUserReq>,
        ) -> Result<tonic::Response<super::ProtoCommandResult>, tonic::Status>;
        async fn follow(
            &self,
            request: tonic::Request<super::ProtoRelationReq>,
        ) -> Result<tonic::Response<super::ProtoCommandResult>, tonic::Status>;
        async fn unfollow(
            &self,
            request: tonic::Request<super::ProtoRelationReq>,
        ) -> Result<tonic::Response<super::ProtoCommandResult>, tonic::Status>;
        #[doc = "Server streaming response type for the List method."]
        type ListStream: futures_core::Stream<Item = Result<super::ProtoListEntry, tonic::Status>>
            + Send
            + Sync
            + 'static;
        async fn list(
            &self,
            request: tonic::Request<super::ProtoUserReq>,
        ) -> Result<tonic::Response<Self::ListStream>, tonic::Status>;
        #[doc = "Server streaming response type for the Timeline method."]
        type TimelineStream: futures_core::Stream<Item = Result<super::ProtoTimelineMsg, tonic::Status>>
            + Send
            + Sync
            + 'static;
        async fn timeline(
            &self,
            request: tonic::Request<tonic::Streaming<super::ProtoTimelineMsg>>,
        ) -> Result<tonic::Response<Self::TimelineStream>, tonic::Status>;
        #[doc = "Server streaming response type for the Ping method."]
        type PingStream: futures_core::Stream<Item = Result<super::ProtoLiveness, tonic::Status>>
            + Send
            + Sync
            + 'static;
        async fn ping(
            &self,
            request: tonic::Request<tonic::Streaming<super::ProtoLiveness>>,
        ) -> Result<tonic::Response<Self::PingStream>, tonic::Status>;
    }
    #[doc = " Feed server surface. Unary user-graph commands, a server-streamed listing,"]
    #[doc = " a bidirectional timeline stream, and a liveness echo stream."]
    #[derive(Debug)]
    pub struct GrpcFeedServer<T: GrpcFeed> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcFeed> GrpcFeedServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcFeedServer<T>
    where
        T: GrpcFeed,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/feedmesh.GrpcFeed/Initialize" => {
                    #[allow(non_camel_case_types)]
                    struct InitializeSvc<T: GrpcFeed>(pub Arc<T>);
                    impl<T: GrpcFeed> tonic::server::UnaryService<super::ProtoUserReq> for InitializeSvc<T> {
                        type Response = super::ProtoCommandResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoUserReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).initialize(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = InitializeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/feedmesh.GrpcFeed/Follow" => {
                    #[allow(non_camel_case_types)]
                    struct FollowSvc<T: GrpcFeed>(pub Arc<T>);
                    impl<T: GrpcFeed> tonic::server::UnaryService<super::ProtoRelationReq> for FollowSvc<T> {
                        type Response = super::ProtoCommandResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoRelationReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).follow(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = FollowSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/feedmesh.GrpcFeed/Unfollow" => {
                    #[allow(non_camel_case_types)]
                    struct UnfollowSvc<T: GrpcFeed>(pub Arc<T>);
                    impl<T: GrpcFeed> tonic::server::UnaryService<super::ProtoRelationReq> for UnfollowSvc<T> {
                        type Response = super::ProtoCommandResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoRelationReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).unfollow(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = UnfollowSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/feedmesh.GrpcFeed/List" => {
                    #[allow(non_camel_case_types)]
                    struct ListSvc<T: GrpcFeed>(pub Arc<T>);
                    impl<T: GrpcFeed> tonic::server::ServerStreamingService<super::ProtoUserReq> for ListSvc<T> {
                        type Response = super::ProtoListEntry;
                        type ResponseStream = T::ListStream;
                        type Future =
                            BoxFuture<tonic::Response<Self::ResponseStream>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoUserReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).list(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1;
                        let inner = inner.0;
                        let method = ListSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.server_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/feedmesh.GrpcFeed/Timeline" => {
                    #[allow(non_camel_case_types)]
                    struct TimelineSvc<T: GrpcFeed>(pub Arc<T>);
                    impl<T: GrpcFeed> tonic::server::StreamingService<super::ProtoTimelineMsg> for TimelineSvc<T> {
                        type Response = super::ProtoTimelineMsg;
                        type ResponseStream = T::TimelineStream;
                        type Future =
                            BoxFuture<tonic::Response<Self::ResponseStream>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<tonic::Streaming<super::ProtoTimelineMsg>>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).timeline(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1;
                        let inner = inner.0;
                        let method = TimelineSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/feedmesh.GrpcFeed/Ping" => {
                    #[allow(non_camel_case_types)]
                    struct PingSvc<T: GrpcFeed>(pub Arc<T>);
                    impl<T: GrpcFeed> tonic::server::StreamingService<super::ProtoLiveness> for PingSvc<T> {
                        type Response = super::ProtoLiveness;
                        type ResponseStream = T::PingStream;
                        type Future =
                            BoxFuture<tonic::Response<Self::ResponseStream>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<tonic::Streaming<super::ProtoLiveness>>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).ping(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1;
                        let inner = inner.0;
                        let method = PingSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcFeed> Clone for GrpcFeedServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcFeed> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcFeed> tonic::transport::NamedService for GrpcFeedServer<T> {
        const NAME: &'static str = "feedmesh.GrpcFeed";
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_router_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcRouterServer."]
    #[async_trait]
    pub trait GrpcRouter: Send + Sync + 'static {
        #[doc = "Server streaming response type for the RegisterServer method."]
        type RegisterServerStream: futures_core::Stream<Item = Result<super::ProtoServerAnnouncement, tonic::Status>>
            + Send
            + Sync
            + 'static;
        async fn register_server(
            &self,
            request: tonic::Request<tonic::Streaming<super::ProtoServerAnnouncement>>,
        ) -> Result<tonic::Response<Self::RegisterServerStream>, tonic::Status>;
        async fn request_for_server(
            &self,
            request: tonic::Request<super::ProtoDiscoveryReq>,
        ) -> Result<tonic::Response<super::ProtoDiscoveryResp>, tonic::Status>;
    }
    #[doc = " Discovery/failover router surface. Servers hold a long-lived registration"]
    #[doc = " stream open; clients ask for the current primary."]
    #[derive(Debug)]
    pub struct GrpcRouterServer<T: GrpcRouter> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcRouter> GrpcRouterServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcRouterServer<T>
    where
        T: GrpcRouter,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/feedmesh.GrpcRouter/RegisterServer" => {
                    #[allow(non_camel_case_types)]
                    struct RegisterServerSvc<T: GrpcRouter>(pub Arc<T>);
                    impl<T: GrpcRouter>
                        tonic::server::StreamingService<super::ProtoServerAnnouncement>
                        for RegisterServerSvc<T>
                    {
                        type Response = super::ProtoServerAnnouncement;
                        type ResponseStream = T::RegisterServerStream;
                        type Future =
                            BoxFuture<tonic::Response<Self::ResponseStream>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<
                                tonic::Streaming<super::ProtoServerAnnouncement>,
                            >,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).register_server(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1;
                        let inner = inner.0;
                        let method = RegisterServerSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/feedmesh.GrpcRouter/RequestForServer" => {
                    #[allow(non_camel_case_types)]
                    struct RequestForServerSvc<T: GrpcRouter>(pub Arc<T>);
                    impl<T: GrpcRouter> tonic::server::UnaryService<super::ProtoDiscoveryReq>
                        for RequestForServerSvc<T>
                    {
                        type Response = super::ProtoDiscoveryResp;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoDiscoveryReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).request_for_server(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = RequestForServerSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcRouter> Clone for GrpcRouterServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcRouter> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcRouter> tonic::transport::NamedService for GrpcRouterServer<T> {
        const NAME: &'static str = "feedmesh.GrpcRouter";
    }
}
