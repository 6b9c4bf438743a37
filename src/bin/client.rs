use feedmesh::{
    stdout_root_logger, CommandStatus, ControllerConfig, ControllerExit, FailoverController, FeedClient, FeedOptions,
    ServerAddress,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

const DEFAULT_ROUTER: &str = "http://127.0.0.1:9000";

fn flag_value(name: &str) -> Option<String> {
    let mut args = std::env::args();
    while let Some(arg) = args.next() {
        if arg == name {
            return args.next();
        }
    }
    None
}

fn describe(status: CommandStatus) -> &'static str {
    match status {
        CommandStatus::Success => "Command completed successfully",
        CommandStatus::AlreadyExists => "Already following that user",
        CommandStatus::NotExists => "No such user",
        CommandStatus::Invalid => "Cannot do that to yourself",
        CommandStatus::NotFollowing => "Not following that user",
        CommandStatus::Corrupted => "Server state is corrupted",
        CommandStatus::Unknown => "Server returned an unknown status",
    }
}

/// Reads console commands. FOLLOW/UNFOLLOW/LIST dial whatever server the
/// controller currently points at; TIMELINE switches the console into post
/// mode for good, feeding every subsequent line to the post writer.
async fn console_loop(username: String, address_rx: watch::Receiver<ServerAddress>, post_tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut timeline_mode = false;

    println!("Commands: FOLLOW <user> | UNFOLLOW <user> | LIST | TIMELINE");
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if timeline_mode {
            if post_tx.send(line.to_string()).await.is_err() {
                return;
            }
            continue;
        }

        let address = address_rx.borrow().clone();
        let mut parts = line.splitn(2, ' ');
        let command = parts.next().unwrap_or_default().to_uppercase();
        let argument = parts.next().unwrap_or_default().trim();

        let outcome = match (command.as_str(), argument) {
            ("FOLLOW", other) if !other.is_empty() => match FeedClient::connect(&address).await {
                Ok(mut feed) => feed.follow(username.clone(), other).await,
                Err(e) => Err(e),
            },
            ("UNFOLLOW", other) if !other.is_empty() => match FeedClient::connect(&address).await {
                Ok(mut feed) => feed.unfollow(username.clone(), other).await,
                Err(e) => Err(e),
            },
            ("LIST", _) => match FeedClient::connect(&address).await {
                Ok(mut feed) => match feed.list(username.clone()).await {
                    Ok(reply) => {
                        println!("All users: {}", reply.all_users.join(", "));
                        println!("Your followers: {}", reply.followers.join(", "));
                        Ok(reply.status)
                    }
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            },
            ("TIMELINE", _) => {
                timeline_mode = true;
                println!("Now in timeline mode. Every line you type is posted to your followers.");
                continue;
            }
            _ => {
                println!("Unrecognized command: '{}'", line);
                continue;
            }
        };

        match outcome {
            Ok(CommandStatus::Success) => {}
            Ok(status) => println!("{}", describe(status)),
            Err(e) => println!("Command failed: {}", e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let router_uri = flag_value("--router").unwrap_or_else(|| DEFAULT_ROUTER.to_string());
    let username = flag_value("--username").ok_or("--username is required")?;

    let logger = stdout_root_logger("client", username.clone());
    let (post_tx, post_rx) = mpsc::channel(32);
    let (delivered_tx, mut delivered_rx) = mpsc::channel(32);

    let config = ControllerConfig {
        router_uri,
        username: username.clone(),
        options: FeedOptions::default(),
    };
    let (controller, _loops) = FailoverController::start(logger.clone(), config, post_rx, delivered_tx).await?;
    let address_rx = controller.address_watch();

    tokio::spawn(async move {
        while let Some(post) = delivered_rx.recv().await {
            println!("{} ({}) >> {}", post.author, post.timestamp, post.content);
        }
    });
    tokio::spawn(console_loop(username, address_rx, post_tx));

    // Runs until the session cannot be served anywhere. That is a clean
    // exit: the infrastructure is down, not this process.
    match controller.run().await {
        ControllerExit::NoServers => println!("All feed servers are down. Goodbye."),
        ControllerExit::RouterUnreachable => println!("Lost the router. Goodbye."),
    }

    Ok(())
}
