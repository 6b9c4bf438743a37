use crate::engine::{FollowError, InitializeOutcome, ListError, Post, SocialGraph, UnfollowError};
use crate::wal::{LogEntry, WriteAheadLog};
use std::fmt::Debug;
use tokio::sync::{mpsc, oneshot};

pub fn create(
    buffer_size: usize,
    logger: slog::Logger,
    graph: SocialGraph,
    wal: WriteAheadLog,
) -> (EngineClient, EngineActor) {
    let (tx, rx) = mpsc::channel(buffer_size);
    let client = EngineClient { sender: tx };
    let actor = EngineActor {
        logger,
        receiver: rx,
        graph,
        wal,
    };

    (client, actor)
}

// Disk interaction is synchronous inside the actor: the WAL append happens
// on the same event that mutates the graph, so a mutation is logged before
// any later query can observe it.
#[derive(Debug)]
enum Event {
    Initialize(String, Callback<InitializeOutcome>),
    Follow(String, String, Callback<Result<(), FollowError>>),
    Unfollow(String, String, Callback<Result<(), UnfollowError>>),
    List(String, Callback<Result<(Vec<String>, Vec<String>), ListError>>),
    Post {
        author: String,
        timestamp: String,
        content: String,
    },
    DrainTimeline(String, Callback<Vec<Post>>),
}

#[derive(Debug)]
struct Callback<T: Debug>(oneshot::Sender<T>);

impl<T: Debug> Callback<T> {
    fn send(self, message: T) {
        let _ = self.0.send(message);
    }
}

/// Handle for talking to the engine actor. Cheap to clone; every RPC handler
/// task holds one.
#[derive(Clone)]
pub struct EngineClient {
    sender: mpsc::Sender<Event>,
}

impl EngineClient {
    pub async fn initialize(&self, username: String) -> InitializeOutcome {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Initialize(username, Callback(tx))).await;

        rx.await.expect("Engine actor dropped our reply channel")
    }

    pub async fn follow(&self, from: String, to: String) -> Result<(), FollowError> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Follow(from, to, Callback(tx))).await;

        rx.await.expect("Engine actor dropped our reply channel")
    }

    pub async fn unfollow(&self, from: String, to: String) -> Result<(), UnfollowError> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Unfollow(from, to, Callback(tx))).await;

        rx.await.expect("Engine actor dropped our reply channel")
    }

    pub async fn list(&self, username: String) -> Result<(Vec<String>, Vec<String>), ListError> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::List(username, Callback(tx))).await;

        rx.await.expect("Engine actor dropped our reply channel")
    }

    pub async fn post(&self, author: String, timestamp: String, content: String) {
        self.send(Event::Post {
            author,
            timestamp,
            content,
        })
        .await;
    }

    pub async fn drain_timeline(&self, username: String) -> Vec<Post> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::DrainTimeline(username, Callback(tx))).await;

        rx.await.expect("Engine actor dropped our reply channel")
    }

    async fn send(&self, event: Event) {
        self.sender.send(event).await.expect("Engine actor event loop is dead");
    }
}

/// EngineActor owns the social graph and its write-ahead log. Draining the
/// event queue single-file is the mutual-exclusion discipline for all shared
/// per-user state.
pub struct EngineActor {
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event>,
    graph: SocialGraph,
    wal: WriteAheadLog,
}

impl EngineActor {
    pub async fn run_event_loop(mut self) {
        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }
        slog::info!(self.logger, "Engine actor exiting, all clients dropped");
    }

    // Must NOT be async; every event is handled to completion before the
    // next one is picked up.
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Initialize(username, callback) => {
                let outcome = self.graph.initialize(&username);
                if outcome == InitializeOutcome::Created {
                    self.log_mutation(LogEntry::Initialize(username));
                }
                callback.send(outcome);
            }
            Event::Follow(from, to, callback) => {
                let result = self.graph.follow(&from, &to);
                if result.is_ok() {
                    self.log_mutation(LogEntry::Follow { from, to });
                }
                callback.send(result);
            }
            Event::Unfollow(from, to, callback) => {
                let result = self.graph.unfollow(&from, &to);
                if result.is_ok() {
                    self.log_mutation(LogEntry::Unfollow { from, to });
                }
                callback.send(result);
            }
            Event::List(username, callback) => {
                callback.send(self.graph.list(&username));
            }
            Event::Post {
                author,
                timestamp,
                content,
            } => {
                self.graph.post(&author, &timestamp, &content);
                self.log_mutation(LogEntry::Post {
                    author,
                    timestamp,
                    content,
                });
            }
            Event::DrainTimeline(username, callback) => {
                callback.send(self.graph.drain_timeline(&username));
            }
        }
    }

    // Log writes are fire-and-forget: a failed append degrades durability,
    // not availability.
    fn log_mutation(&mut self, entry: LogEntry) {
        if let Err(e) = self.wal.append(&entry) {
            slog::error!(self.logger, "Failed to append '{}' to the log: {}", entry, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal;
    use std::path::PathBuf;

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn temp_log_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("feedmesh-actor-{}-{}.log", name, std::process::id()));
        path
    }

    #[tokio::test]
    async fn actor_serializes_mutations_and_logs_them() {
        let path = temp_log_path("mutations");
        let _ = std::fs::remove_file(&path);
        let (graph, wal) = wal::recover(&path, &test_logger()).unwrap();
        let (client, actor) = create(8, test_logger(), graph, wal);
        tokio::spawn(actor.run_event_loop());

        assert_eq!(client.initialize("alice".to_string()).await, InitializeOutcome::Created);
        assert_eq!(
            client.initialize("alice".to_string()).await,
            InitializeOutcome::AlreadyExists
        );
        client.initialize("bob".to_string()).await;
        client.follow("bob".to_string(), "alice".to_string()).await.unwrap();
        client
            .post("alice".to_string(), "t1".to_string(), "hello".to_string())
            .await;

        let backlog = client.drain_timeline("bob".to_string()).await;
        assert_eq!(backlog.len(), 1);
        assert_eq!(backlog[0].content, "hello");

        // Only successful mutations were logged, in arrival order.
        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(
            lines,
            vec![
                "INITIALIZE alice",
                "INITIALIZE bob",
                "FOLLOW bob|alice",
                "POST alice|t1|hello",
            ]
        );
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn failed_mutations_are_not_logged() {
        let path = temp_log_path("failures");
        let _ = std::fs::remove_file(&path);
        let (graph, wal) = wal::recover(&path, &test_logger()).unwrap();
        let (client, actor) = create(8, test_logger(), graph, wal);
        tokio::spawn(actor.run_event_loop());

        client.initialize("alice".to_string()).await;
        let result = client.follow("alice".to_string(), "alice".to_string()).await;
        assert_eq!(result, Err(FollowError::SelfFollow));
        let result = client.unfollow("alice".to_string(), "ghost".to_string()).await;
        assert!(result.is_err());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().collect::<Vec<_>>(), vec!["INITIALIZE alice"]);
        let _ = std::fs::remove_file(&path);
    }
}
