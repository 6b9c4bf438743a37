use feedmesh::{
    shutdown_signal, stdout_root_logger, try_create_feed_server, CommandStatus, ControllerConfig, ControllerExit,
    Discovery, FailoverController, FeedClient, FeedOptions, FeedServerConfig, FeedServerHandle, Registry,
    RouterRpcServer, ServerAddress,
};
use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};

#[tokio::test]
async fn first_registered_server_is_primary_and_standbys_take_over_in_order() -> Result<(), Box<dyn Error>> {
    let router_uri = start_router(7000).await;
    let server_a = start_server(7001, 7000, "election-a").await?;
    let _server_b = start_server(7002, 7000, "election-b").await?;

    wait_for_primary(&router_uri, &address_of(7001), Duration::from_secs(10)).await;

    // Killing the primary ends its registration stream; the oldest standby
    // must be advertised next.
    drop(server_a);
    wait_for_primary(&router_uri, &address_of(7002), Duration::from_secs(10)).await;

    Ok(())
}

#[tokio::test]
async fn posts_reach_followers_through_the_full_stack() -> Result<(), Box<dyn Error>> {
    let router_uri = start_router(7100).await;
    let _server = start_server(7101, 7100, "fanout").await?;
    wait_for_primary(&router_uri, &address_of(7101), Duration::from_secs(10)).await;

    let (_alice, alice_post_tx, _alice_rx) = start_client(&router_uri, "alice").await?;
    let (_bob, _bob_post_tx, mut bob_rx) = start_client(&router_uri, "bob").await?;

    let mut feed = FeedClient::connect(&address_of(7101)).await?;
    assert_eq!(feed.follow("bob", "alice").await?, CommandStatus::Success);

    alice_post_tx.send("hello world".to_string()).await?;

    let post = tokio::time::timeout(Duration::from_secs(10), bob_rx.recv())
        .await
        .expect("Timed out waiting for the post to be delivered")
        .expect("Delivery channel closed");
    assert_eq!(post.author, "alice");
    assert_eq!(post.content, "hello world");

    Ok(())
}

#[tokio::test]
async fn client_follows_the_election_when_its_server_dies() -> Result<(), Box<dyn Error>> {
    let router_uri = start_router(7200).await;
    let server_a = start_server(7201, 7200, "failover-a").await?;
    let _server_b = start_server(7202, 7200, "failover-b").await?;
    wait_for_primary(&router_uri, &address_of(7201), Duration::from_secs(10)).await;

    let (controller, _post_tx, _rx) = start_client(&router_uri, "alice").await?;
    let controller_run = tokio::spawn(controller.run());

    drop(server_a);

    // The controller must detect the missed beat, discover the replacement,
    // and log the session in there.
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Ok(mut feed) = FeedClient::connect(&address_of(7202)).await {
            if let Ok(reply) = feed.list("alice").await {
                if reply.status == CommandStatus::Success {
                    break;
                }
            }
        }
        assert!(Instant::now() < deadline, "Client never re-homed onto the standby");
        sleep(Duration::from_millis(100)).await;
    }

    assert!(!controller_run.is_finished());
    Ok(())
}

#[tokio::test]
async fn client_reports_fatal_unavailability_when_no_servers_exist() -> Result<(), Box<dyn Error>> {
    let router_uri = start_router(7400).await;
    // Give the router time to bind before the one-shot connection attempt.
    sleep(Duration::from_millis(300)).await;

    let result = start_client(&router_uri, "alice").await;

    // Startup against an empty registry must fail loudly, not retry forever.
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn running_controller_stops_and_reports_when_the_last_server_dies() -> Result<(), Box<dyn Error>> {
    let router_uri = start_router(7500).await;
    let server = start_server(7501, 7500, "terminal").await?;
    wait_for_primary(&router_uri, &address_of(7501), Duration::from_secs(10)).await;

    let (controller, _post_tx, _rx) = start_client(&router_uri, "alice").await?;
    let controller_run = tokio::spawn(controller.run());

    // With no standby to elect, the missed beat must end the session with an
    // explicit report instead of a silent retry loop.
    drop(server);

    let exit = tokio::time::timeout(Duration::from_secs(10), controller_run)
        .await
        .expect("Controller kept running with no servers left")?;
    assert_eq!(exit, ControllerExit::NoServers);

    Ok(())
}

#[tokio::test]
async fn replacement_server_recovers_users_and_follows_from_the_log() -> Result<(), Box<dyn Error>> {
    let router_uri = start_router(7300).await;
    let wal_path = fresh_wal("recovery");
    let server_a = start_server_with_wal(7301, 7300, wal_path.clone()).await?;
    wait_for_primary(&router_uri, &address_of(7301), Duration::from_secs(10)).await;

    let mut feed = FeedClient::connect(&address_of(7301)).await?;
    assert_eq!(feed.initialize("carol").await?, CommandStatus::Success);
    assert_eq!(feed.initialize("dave").await?, CommandStatus::Success);
    assert_eq!(feed.follow("dave", "carol").await?, CommandStatus::Success);

    drop(server_a);
    let _server_b = start_server_with_wal(7302, 7300, wal_path).await?;
    wait_for_primary(&router_uri, &address_of(7302), Duration::from_secs(10)).await;

    let mut feed = FeedClient::connect(&address_of(7302)).await?;
    let reply = feed.list("carol").await?;
    assert_eq!(reply.status, CommandStatus::Success);
    assert_eq!(reply.all_users, vec!["carol".to_string(), "dave".to_string()]);
    assert!(reply.followers.contains(&"dave".to_string()));

    Ok(())
}

// -- Helpers --

fn fast_options() -> FeedOptions {
    FeedOptions {
        heartbeat_interval: Some(Duration::from_millis(100)),
        liveness_timeout: Some(Duration::from_millis(300)),
        promotion_grace: Some(Duration::from_millis(100)),
        update_poll_interval: Some(Duration::from_millis(100)),
        registration_interval: Some(Duration::from_millis(100)),
    }
}

fn address_of(port: u16) -> ServerAddress {
    ServerAddress::new("127.0.0.1", port)
}

fn fresh_wal(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("feedmesh-it-{}-{}.wal", std::process::id(), tag));
    let _ = std::fs::remove_file(&path);
    path
}

async fn start_router(port: u16) -> String {
    let listen: SocketAddr = format!("127.0.0.1:{}", port).parse().unwrap();
    let logger = stdout_root_logger("router", listen.to_string());
    let registry = Arc::new(Registry::new(logger.clone()));
    let rpc = RouterRpcServer::new(logger, registry);

    let (handle, signal) = shutdown_signal();
    keep_for_test_lifetime(handle);
    tokio::spawn(rpc.run(listen, signal));

    format!("http://127.0.0.1:{}", port)
}

async fn start_server(port: u16, router_port: u16, wal_tag: &str) -> Result<FeedServerHandle, Box<dyn Error>> {
    start_server_with_wal(port, router_port, fresh_wal(wal_tag)).await
}

async fn start_server_with_wal(
    port: u16,
    router_port: u16,
    wal_path: PathBuf,
) -> Result<FeedServerHandle, Box<dyn Error>> {
    let listen: SocketAddr = format!("127.0.0.1:{}", port).parse().unwrap();
    let logger = stdout_root_logger("server", listen.to_string());

    let config = FeedServerConfig {
        listen_addr: listen,
        advertised: address_of(port),
        router_uri: format!("http://127.0.0.1:{}", router_port),
        wal_path,
        options: fast_options(),
    };

    Ok(try_create_feed_server(logger, config).await?)
}

async fn start_client(
    router_uri: &str,
    username: &str,
) -> Result<(FailoverController, mpsc::Sender<String>, mpsc::Receiver<feedmesh::Post>), Box<dyn Error>> {
    let logger = stdout_root_logger("client", username.to_string());
    let (post_tx, post_rx) = mpsc::channel(8);
    let (delivered_tx, delivered_rx) = mpsc::channel(8);

    let config = ControllerConfig {
        router_uri: router_uri.to_string(),
        username: username.to_string(),
        options: fast_options(),
    };
    let (controller, loops) = FailoverController::start(logger, config, post_rx, delivered_tx).await?;
    keep_for_test_lifetime(loops);

    Ok((controller, post_tx, delivered_rx))
}

async fn wait_for_primary(router_uri: &str, expected: &ServerAddress, deadline: Duration) {
    let start = Instant::now();
    loop {
        if let Ok(mut discovery) = Discovery::connect(router_uri.to_string()).await {
            if let Ok(primary) = discovery.next_server(&ServerAddress::unknown()).await {
                if &primary == expected {
                    return;
                }
            }
        }

        assert!(
            start.elapsed() < deadline,
            "Timed out waiting for '{}' to become primary",
            expected
        );
        sleep(Duration::from_millis(100)).await;
    }
}

// Prevents Drop-based teardown from firing before the test ends.
fn keep_for_test_lifetime<T: Send + 'static>(item: T) {
    std::mem::forget(item);
}
