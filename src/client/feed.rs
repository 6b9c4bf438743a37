use crate::grpc::grpc_feed_client::GrpcFeedClient;
use crate::grpc::{ProtoRelationReq, ProtoStatus, ProtoTimelineMsg, ProtoUserReq};
use crate::router::ServerAddress;
use crate::server::END_MARKER;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;
use tonic::{Request, Streaming};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to connect to feed server: {0}")]
    Connect(#[from] tonic::transport::Error),
    #[error("feed server rejected the call: {0}")]
    Rpc(#[from] tonic::Status),
}

/// Application-level outcome of a user-graph command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandStatus {
    Success,
    AlreadyExists,
    NotExists,
    Invalid,
    NotFollowing,
    Corrupted,
    Unknown,
}

impl CommandStatus {
    fn from_wire(raw: i32) -> Self {
        match ProtoStatus::from_i32(raw) {
            Some(ProtoStatus::Success) => CommandStatus::Success,
            Some(ProtoStatus::AlreadyExists) => CommandStatus::AlreadyExists,
            Some(ProtoStatus::NotExists) => CommandStatus::NotExists,
            Some(ProtoStatus::Invalid) => CommandStatus::Invalid,
            Some(ProtoStatus::NotFollowing) => CommandStatus::NotFollowing,
            Some(ProtoStatus::Corrupted) => CommandStatus::Corrupted,
            Some(ProtoStatus::Unknown) | None => CommandStatus::Unknown,
        }
    }
}

/// Collected result of a List call, with end markers stripped.
#[derive(Debug)]
pub struct ListReply {
    pub followers: Vec<String>,
    pub all_users: Vec<String>,
    pub status: CommandStatus,
}

/// Thin typed wrapper around one feed server connection.
pub struct FeedClient {
    inner: GrpcFeedClient<Channel>,
}

impl FeedClient {
    pub async fn connect(address: &ServerAddress) -> Result<Self, ClientError> {
        let inner = GrpcFeedClient::connect(address.uri()).await?;
        Ok(FeedClient { inner })
    }

    pub async fn initialize(&mut self, username: impl Into<String>) -> Result<CommandStatus, ClientError> {
        let reply = self
            .inner
            .initialize(Request::new(ProtoUserReq {
                username: username.into(),
            }))
            .await?
            .into_inner();

        Ok(CommandStatus::from_wire(reply.status))
    }

    pub async fn follow(
        &mut self,
        username: impl Into<String>,
        other_username: impl Into<String>,
    ) -> Result<CommandStatus, ClientError> {
        let reply = self
            .inner
            .follow(Request::new(ProtoRelationReq {
                username: username.into(),
                other_username: other_username.into(),
            }))
            .await?
            .into_inner();

        Ok(CommandStatus::from_wire(reply.status))
    }

    pub async fn unfollow(
        &mut self,
        username: impl Into<String>,
        other_username: impl Into<String>,
    ) -> Result<CommandStatus, ClientError> {
        let reply = self
            .inner
            .unfollow(Request::new(ProtoRelationReq {
                username: username.into(),
                other_username: other_username.into(),
            }))
            .await?
            .into_inner();

        Ok(CommandStatus::from_wire(reply.status))
    }

    /// Streams the listing to completion and strips the end markers from
    /// both columns.
    pub async fn list(&mut self, username: impl Into<String>) -> Result<ListReply, ClientError> {
        let mut stream = self
            .inner
            .list(Request::new(ProtoUserReq {
                username: username.into(),
            }))
            .await?
            .into_inner();

        let mut reply = ListReply {
            followers: Vec::new(),
            all_users: Vec::new(),
            status: CommandStatus::Success,
        };
        while let Some(entry) = stream.message().await? {
            let status = CommandStatus::from_wire(entry.status);
            if status != CommandStatus::Success {
                reply.status = status;
                continue;
            }
            if entry.follower != END_MARKER {
                reply.followers.push(entry.follower);
            }
            if entry.all_users_entry != END_MARKER {
                reply.all_users.push(entry.all_users_entry);
            }
        }

        Ok(reply)
    }

    /// Opens the bidirectional timeline stream. The sender half carries new
    /// posts and update requests; the inbound half carries drained backlogs.
    pub async fn open_timeline(
        &mut self,
    ) -> Result<(mpsc::Sender<ProtoTimelineMsg>, Streaming<ProtoTimelineMsg>), ClientError> {
        let (outbound, rx) = mpsc::channel(32);
        let inbound = self.inner.timeline(ReceiverStream::new(rx)).await?.into_inner();

        Ok((outbound, inbound))
    }
}
