use crate::actor::EngineClient;
use crate::engine::{FollowError, InitializeOutcome, ListError, Post, UnfollowError};
use crate::grpc::grpc_feed_server::{GrpcFeed, GrpcFeedServer};
use crate::grpc::{
    ProtoCommandResult, ProtoListEntry, ProtoLiveness, ProtoRelationReq, ProtoStatus, ProtoTimelineMsg, ProtoUserReq,
};
use crate::server::RpcServerShutdownSignal;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status, Streaming};

/// Sentinel username used on the wire to mark the end of a follower list,
/// an all-users list, or a drained timeline backlog.
pub const END_MARKER: &str = "END";

/// FeedRpcServer is a stateless wrapper mapping each RPC onto an engine
/// actor operation.
pub struct FeedRpcServer {
    logger: slog::Logger,
    engine: EngineClient,
}

impl FeedRpcServer {
    pub fn new(logger: slog::Logger, engine: EngineClient) -> Self {
        FeedRpcServer { logger, engine }
    }

    pub async fn run(self, socket_addr: SocketAddr, shutdown_signal: RpcServerShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Feed server listening on '{:?}'", socket_addr);

        let result = Server::builder()
            .add_service(GrpcFeedServer::new(self))
            .serve_with_shutdown(socket_addr, shutdown_signal)
            .await;

        slog::info!(logger, "Feed server run() has exited: {:?}", result);
    }
}

fn command_result(status: ProtoStatus) -> Response<ProtoCommandResult> {
    Response::new(ProtoCommandResult { status: status as i32 })
}

fn follow_status(result: Result<(), FollowError>) -> ProtoStatus {
    match result {
        Ok(()) => ProtoStatus::Success,
        Err(FollowError::NotFound(_)) => ProtoStatus::NotExists,
        Err(FollowError::SelfFollow) => ProtoStatus::Invalid,
    }
}

fn unfollow_status(result: Result<(), UnfollowError>) -> ProtoStatus {
    match result {
        Ok(()) => ProtoStatus::Success,
        Err(UnfollowError::NotFound(_)) => ProtoStatus::NotExists,
        Err(UnfollowError::SelfUnfollow) => ProtoStatus::Invalid,
        Err(UnfollowError::NotFollowing) => ProtoStatus::NotFollowing,
    }
}

fn list_entry(follower: String, all_users_entry: String) -> ProtoListEntry {
    ProtoListEntry {
        follower,
        all_users_entry,
        status: ProtoStatus::Success as i32,
    }
}

fn list_failure(status: ProtoStatus) -> ProtoListEntry {
    ProtoListEntry {
        follower: String::new(),
        all_users_entry: String::new(),
        status: status as i32,
    }
}

// The listing pairs the follower list with the global all-users sequence,
// one entry per all-users element. The follower column switches to the end
// marker once the (never longer) follower list runs out; equal-length lists
// get a trailing end/end entry so the client always sees both terminators.
fn frame_list_entries(followers: &[String], all_users: &[String]) -> Vec<ProtoListEntry> {
    let mut entries = Vec::with_capacity(all_users.len() + 1);

    for (i, all_users_entry) in all_users.iter().enumerate() {
        let follower = match followers.get(i) {
            Some(follower) => follower.clone(),
            None => END_MARKER.to_string(),
        };
        entries.push(list_entry(follower, all_users_entry.clone()));
    }
    if followers.len() == all_users.len() {
        entries.push(list_entry(END_MARKER.to_string(), END_MARKER.to_string()));
    }

    entries
}

fn timeline_post(post: Post) -> ProtoTimelineMsg {
    ProtoTimelineMsg {
        username: post.author,
        time: post.timestamp,
        content: post.content,
        requesting_update: false,
    }
}

fn timeline_end_marker() -> ProtoTimelineMsg {
    ProtoTimelineMsg {
        username: END_MARKER.to_string(),
        time: String::new(),
        content: String::new(),
        requesting_update: false,
    }
}

#[async_trait::async_trait]
impl GrpcFeed for FeedRpcServer {
    async fn initialize(&self, request: Request<ProtoUserReq>) -> Result<Response<ProtoCommandResult>, Status> {
        let username = request.into_inner().username;
        slog::debug!(self.logger, "Initialize '{}'", username);

        let status = match self.engine.initialize(username).await {
            InitializeOutcome::Created => ProtoStatus::Success,
            InitializeOutcome::AlreadyExists => ProtoStatus::AlreadyExists,
        };
        Ok(command_result(status))
    }

    async fn follow(&self, request: Request<ProtoRelationReq>) -> Result<Response<ProtoCommandResult>, Status> {
        let req = request.into_inner();
        slog::debug!(self.logger, "Follow '{}' -> '{}'", req.username, req.other_username);

        let result = self.engine.follow(req.username, req.other_username).await;
        Ok(command_result(follow_status(result)))
    }

    async fn unfollow(&self, request: Request<ProtoRelationReq>) -> Result<Response<ProtoCommandResult>, Status> {
        let req = request.into_inner();
        slog::debug!(self.logger, "Unfollow '{}' -> '{}'", req.username, req.other_username);

        let result = self.engine.unfollow(req.username, req.other_username).await;
        Ok(command_result(unfollow_status(result)))
    }

    type ListStream = ReceiverStream<Result<ProtoListEntry, Status>>;

    async fn list(&self, request: Request<ProtoUserReq>) -> Result<Response<Self::ListStream>, Status> {
        let username = request.into_inner().username;

        let entries = match self.engine.list(username).await {
            Ok((followers, all_users)) => frame_list_entries(&followers, &all_users),
            Err(ListError::NotFound(_)) => vec![list_failure(ProtoStatus::NotExists)],
            Err(ListError::Corrupted) => {
                // Internal-consistency fault. Abort this request distinctly,
                // keep the process running.
                slog::error!(self.logger, "All-users sequence shorter than a follower list");
                vec![list_failure(ProtoStatus::Corrupted)]
            }
        };

        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            for entry in entries {
                if tx.send(Ok(entry)).await.is_err() {
                    return;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    type TimelineStream = ReceiverStream<Result<ProtoTimelineMsg, Status>>;

    async fn timeline(
        &self,
        request: Request<Streaming<ProtoTimelineMsg>>,
    ) -> Result<Response<Self::TimelineStream>, Status> {
        let mut inbound = request.into_inner();
        let engine = self.engine.clone();
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            while let Ok(Some(msg)) = inbound.message().await {
                if msg.requesting_update {
                    let backlog = engine.drain_timeline(msg.username).await;
                    for post in backlog {
                        if tx.send(Ok(timeline_post(post))).await.is_err() {
                            return;
                        }
                    }
                    if tx.send(Ok(timeline_end_marker())).await.is_err() {
                        return;
                    }
                } else {
                    engine.post(msg.username, msg.time, msg.content).await;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    type PingStream = ReceiverStream<Result<ProtoLiveness, Status>>;

    async fn ping(
        &self,
        request: Request<Streaming<ProtoLiveness>>,
    ) -> Result<Response<Self::PingStream>, Status> {
        let mut inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(1);

        // Ack each liveness token. Watchdogs and clients treat a missing ack
        // within their timeout as a missed beat.
        tokio::spawn(async move {
            while let Ok(Some(_)) = inbound.message().await {
                if tx.send(Ok(ProtoLiveness { alive: true })).await.is_err() {
                    return;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
