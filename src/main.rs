//! CLI for memq
//!
//! Subcommands:
//! - `server`: run the HTTP queue server
//! - `client`: issue one queue operation against a running server

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use memq::broker::Broker;
use memq::client::{Client, Consumer};
use memq::config::{Settings, load_config};
use memq::transport::start_http_server;
use tokio::sync::watch;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "memq")]
enum Command {
    /// Start the HTTP queue server
    Server,
    /// Talk to a running server
    Client {
        /// Server URL including the base path (default from configuration)
        #[arg(long)]
        url: Option<String>,
        #[command(subcommand)]
        op: ClientOp,
    },
}

#[derive(Subcommand)]
enum ClientOp {
    /// Create a queue
    Create { queue: String },
    /// Delete a queue
    Delete { queue: String },
    /// Discard every message in a queue
    Drain { queue: String },
    /// Append a message to a queue
    Enqueue { queue: String, body: String },
    /// Take the oldest message off a queue
    Dequeue { queue: String },
    /// Print counters for every queue
    Stats,
    /// Poll a queue and print each message until Ctrl-C
    Consume {
        queue: String,
        /// Stop at the first empty poll instead of waiting for more
        #[arg(long)]
        exit_when_empty: bool,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            memq::utils::logging::init("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    memq::utils::logging::init(&settings.log.level);

    let result = match Command::parse() {
        Command::Server => run_server(settings).await,
        Command::Client { url, op } => run_client(&settings, url, op).await,
    };

    if let Err(e) = result {
        error!("memq failed: {}", e);
        std::process::exit(1);
    }
}

async fn run_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let broker = Arc::new(Broker::new());

    tokio::select! {
        res = start_http_server(&settings, broker) => {
            res?;
            error!("HTTP server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

async fn run_client(
    settings: &Settings,
    url: Option<String>,
    op: ClientOp,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = url.unwrap_or_else(|| settings.client.server_url.clone());
    let client = Client::new(&url)?;
    debug!("Using memq server at {}", client.base_url());

    match op {
        ClientOp::Create { queue } => client.create_queue(&queue).await?,
        ClientOp::Delete { queue } => client.delete_queue(&queue).await?,
        ClientOp::Drain { queue } => client.drain_queue(&queue).await?,
        ClientOp::Enqueue { queue, body } => {
            let message = client.enqueue(&queue, body).await?;
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        ClientOp::Dequeue { queue } => match client.dequeue(&queue).await? {
            Some(message) => println!("{}", serde_json::to_string_pretty(&message)?),
            None => println!("queue '{queue}' is empty"),
        },
        ClientOp::Stats => {
            let stats = client.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        ClientOp::Consume {
            queue,
            exit_when_empty,
        } => {
            let (tx, rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = tx.send(true);
                }
            });

            let consumer = Consumer::new(client, queue)
                .poll_interval(Duration::from_millis(settings.client.poll_interval_ms))
                .exit_when_empty(exit_when_empty);
            let report = consumer
                .run(rx, |message| match serde_json::to_string(&message) {
                    Ok(json) => println!("{json}"),
                    Err(e) => error!("Failed to serialize message {}: {}", message.id, e),
                })
                .await;
            info!(
                "Consumed {} messages from {} ({:?})",
                report.processed,
                consumer.queue(),
                report.exit
            );
        }
    }

    Ok(())
}
