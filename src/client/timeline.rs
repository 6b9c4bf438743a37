use crate::client::feed::FeedClient;
use crate::client::switch::SwitchBarrier;
use crate::engine::Post;
use crate::grpc::ProtoTimelineMsg;
use crate::router::ServerAddress;
use crate::server::END_MARKER;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tonic::Streaming;

/// The loops that participate in the switch barrier: post writer, update
/// poller, backlog reader.
pub(crate) const TIMELINE_PARTICIPANTS: usize = 3;

/// Join handles for the three long-lived timeline loops. The writer ends
/// when the post channel closes; the reader ends when the delivery channel
/// closes; the poller ends when the reader is gone.
pub struct TimelineLoops {
    pub writer: JoinHandle<()>,
    pub poller: JoinHandle<()>,
    pub reader: JoinHandle<()>,
}

pub(crate) struct TimelineWiring {
    pub logger: slog::Logger,
    pub username: String,
    pub address_rx: watch::Receiver<ServerAddress>,
    pub barrier: Arc<SwitchBarrier>,
    pub update_poll_interval: Duration,
    pub retry_interval: Duration,
}

/// Spawns the three loops. `post_rx` carries composed post bodies in;
/// `delivered_tx` carries timeline posts out.
pub(crate) fn spawn_timeline_loops(
    wiring: TimelineWiring,
    post_rx: mpsc::Receiver<String>,
    delivered_tx: mpsc::Sender<Post>,
) -> TimelineLoops {
    let (inbound_tx, inbound_rx) = mpsc::channel(4);

    let writer = tokio::spawn(run_post_writer(
        wiring.logger.clone(),
        wiring.username.clone(),
        wiring.address_rx.clone(),
        Arc::clone(&wiring.barrier),
        post_rx,
        wiring.retry_interval,
    ));
    let poller = tokio::spawn(run_update_poller(
        wiring.logger.clone(),
        wiring.username,
        wiring.address_rx,
        Arc::clone(&wiring.barrier),
        inbound_tx,
        wiring.update_poll_interval,
        wiring.retry_interval,
    ));
    let reader = tokio::spawn(run_backlog_reader(
        wiring.barrier,
        inbound_rx,
        delivered_tx,
    ));

    TimelineLoops {
        writer,
        poller,
        reader,
    }
}

fn new_post(username: &str, content: String) -> ProtoTimelineMsg {
    ProtoTimelineMsg {
        username: username.to_string(),
        time: chrono::Utc::now().format("%a %b %d %T %Y").to_string(),
        content,
        requesting_update: false,
    }
}

fn update_request(username: &str) -> ProtoTimelineMsg {
    ProtoTimelineMsg {
        username: username.to_string(),
        time: String::new(),
        content: String::new(),
        requesting_update: true,
    }
}

/// Blocks a broken loop until either a switch lands (acknowledged here) or a
/// retry delay elapses. Returns the latest observed generation.
async fn wait_out_failure(barrier: &SwitchBarrier, seen: u64, retry: Duration) -> u64 {
    tokio::select! {
        generation = barrier.tripped(seen) => {
            barrier.acknowledge();
            generation
        }
        _ = tokio::time::sleep(retry) => seen,
    }
}

/// Owns a dedicated timeline stream used only for publishing posts. Breaks
/// out and redials whenever the barrier trips or the stream dies.
async fn run_post_writer(
    logger: slog::Logger,
    username: String,
    address_rx: watch::Receiver<ServerAddress>,
    barrier: Arc<SwitchBarrier>,
    mut post_rx: mpsc::Receiver<String>,
    retry_interval: Duration,
) {
    let mut seen = barrier.generation();

    'reconnect: loop {
        let address = address_rx.borrow().clone();
        let mut feed = match FeedClient::connect(&address).await {
            Ok(feed) => feed,
            Err(e) => {
                slog::warn!(logger, "Post stream cannot reach '{}': {}", address, e);
                seen = wait_out_failure(&barrier, seen, retry_interval).await;
                continue;
            }
        };
        let (outbound, _inbound) = match feed.open_timeline().await {
            Ok(pair) => pair,
            Err(e) => {
                slog::warn!(logger, "Post stream rejected by '{}': {}", address, e);
                seen = wait_out_failure(&barrier, seen, retry_interval).await;
                continue;
            }
        };
        slog::debug!(logger, "Post stream connected to '{}'", address);

        loop {
            tokio::select! {
                generation = barrier.tripped(seen) => {
                    seen = generation;
                    barrier.acknowledge();
                    continue 'reconnect;
                }
                maybe_content = post_rx.recv() => {
                    let content = match maybe_content {
                        Some(content) => content,
                        // Console closed; nothing left to publish.
                        None => return,
                    };
                    if outbound.send(new_post(&username, content)).await.is_err() {
                        slog::warn!(logger, "Post stream to '{}' broke; redialing", address);
                        continue 'reconnect;
                    }
                }
            }
        }
    }
}

/// Owns the outbound half of the update stream: asks the server to drain the
/// backlog on a fixed cadence and hands each fresh inbound half to the
/// reader loop.
async fn run_update_poller(
    logger: slog::Logger,
    username: String,
    address_rx: watch::Receiver<ServerAddress>,
    barrier: Arc<SwitchBarrier>,
    inbound_tx: mpsc::Sender<Streaming<ProtoTimelineMsg>>,
    update_poll_interval: Duration,
    retry_interval: Duration,
) {
    let mut seen = barrier.generation();

    'reconnect: loop {
        let address = address_rx.borrow().clone();
        let mut feed = match FeedClient::connect(&address).await {
            Ok(feed) => feed,
            Err(e) => {
                slog::warn!(logger, "Update stream cannot reach '{}': {}", address, e);
                seen = wait_out_failure(&barrier, seen, retry_interval).await;
                continue;
            }
        };
        let (outbound, inbound) = match feed.open_timeline().await {
            Ok(pair) => pair,
            Err(e) => {
                slog::warn!(logger, "Update stream rejected by '{}': {}", address, e);
                seen = wait_out_failure(&barrier, seen, retry_interval).await;
                continue;
            }
        };
        if inbound_tx.send(inbound).await.is_err() {
            // Reader is gone; no one left to deliver to.
            return;
        }
        slog::debug!(logger, "Update stream connected to '{}'", address);

        loop {
            if outbound.send(update_request(&username)).await.is_err() {
                slog::warn!(logger, "Update stream to '{}' broke; redialing", address);
                seen = wait_out_failure(&barrier, seen, retry_interval).await;
                continue 'reconnect;
            }
            tokio::select! {
                generation = barrier.tripped(seen) => {
                    seen = generation;
                    barrier.acknowledge();
                    continue 'reconnect;
                }
                _ = tokio::time::sleep(update_poll_interval) => {}
            }
        }
    }
}

/// Owns whichever inbound update stream is current and forwards drained
/// posts to the consumer. End markers delimit backlogs and carry no post.
async fn run_backlog_reader(
    barrier: Arc<SwitchBarrier>,
    mut inbound_rx: mpsc::Receiver<Streaming<ProtoTimelineMsg>>,
    delivered_tx: mpsc::Sender<Post>,
) {
    let mut seen = barrier.generation();

    loop {
        let mut inbound = tokio::select! {
            generation = barrier.tripped(seen) => {
                seen = generation;
                barrier.acknowledge();
                continue;
            }
            maybe_stream = inbound_rx.recv() => match maybe_stream {
                Some(stream) => stream,
                None => return,
            },
        };

        loop {
            tokio::select! {
                generation = barrier.tripped(seen) => {
                    seen = generation;
                    barrier.acknowledge();
                    // The poller will hand over a fresh stream.
                    break;
                }
                result = inbound.message() => match result {
                    Ok(Some(msg)) => {
                        if msg.username == END_MARKER {
                            continue;
                        }
                        let post = Post {
                            author: msg.username,
                            timestamp: msg.time,
                            content: msg.content,
                        };
                        if delivered_tx.send(post).await.is_err() {
                            return;
                        }
                    }
                    // Stream died; park until a replacement arrives.
                    Ok(None) | Err(_) => break,
                }
            }
        }
    }
}
