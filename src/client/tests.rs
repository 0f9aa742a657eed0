use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::{Client, Consumer, ConsumerExit};
use crate::broker::Broker;
use crate::transport::serve;
use crate::utils::error::ClientError;

async fn spawn_server() -> (Arc<Broker>, Client) {
    let broker = Arc::new(Broker::new());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_broker = broker.clone();
    tokio::spawn(async move {
        let _ = serve(listener, server_broker, "/memq/server").await;
    });

    let client = Client::new(&format!("http://{addr}/memq/server")).unwrap();
    (broker, client)
}

#[test]
fn test_client_rejects_bad_base_url() {
    assert!(matches!(
        Client::new("not a url"),
        Err(ClientError::InvalidUrl(_))
    ));
    assert!(matches!(
        Client::new("mailto:someone@example.com"),
        Err(ClientError::InvalidUrl(_))
    ));
}

#[test]
fn test_client_keeps_base_url() {
    let client = Client::new("http://127.0.0.1:8080/memq/server").unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:8080/memq/server");
}

#[tokio::test]
async fn test_client_jobs_scenario() {
    let (_broker, client) = spawn_server().await;

    client.create_queue("jobs").await.unwrap();
    for body in ["a", "b", "c"] {
        let m = client.enqueue("jobs", body).await.unwrap();
        assert_eq!(m.body, body);
        assert_eq!(m.id.len(), 32);
    }

    for expected in ["a", "b", "c"] {
        let m = client.dequeue("jobs").await.unwrap().unwrap();
        assert_eq!(m.body, expected);
    }
    assert!(client.dequeue("jobs").await.unwrap().is_none());

    let stats = client.stats().await.unwrap();
    let jobs = stats.get("jobs").unwrap();
    assert_eq!(
        (jobs.depth, jobs.enqueued, jobs.dequeued, jobs.drained),
        (0, 3, 3, 0)
    );
}

#[tokio::test]
async fn test_client_round_trip_matches_broker_message() {
    let (broker, client) = spawn_server().await;
    broker.create_queue("q").unwrap();

    let body = "{\"nested\": \"json\"}\n\ttabs and unicode \u{00E9}";
    let sent = client.enqueue("q", body).await.unwrap();
    let received = client.dequeue("q").await.unwrap().unwrap();

    assert_eq!(received, sent);
    assert_eq!(received.body, body);
}

#[tokio::test]
async fn test_client_drain_and_delete() {
    let (broker, client) = spawn_server().await;
    client.create_queue("jobs").await.unwrap();
    for i in 0..5 {
        client.enqueue("jobs", format!("{i}")).await.unwrap();
    }

    client.drain_queue("jobs").await.unwrap();
    let stats = client.stats().await.unwrap();
    let jobs = stats.get("jobs").unwrap();
    assert_eq!(
        (jobs.depth, jobs.enqueued, jobs.dequeued, jobs.drained),
        (0, 5, 0, 5)
    );

    client.delete_queue("jobs").await.unwrap();
    assert!(broker.is_empty());
}

#[tokio::test]
async fn test_client_surfaces_server_errors() {
    let (_broker, client) = spawn_server().await;

    match client.dequeue("missing").await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "queue 'missing' does not exist");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    client.create_queue("dup").await.unwrap();
    assert!(matches!(
        client.create_queue("dup").await,
        Err(ClientError::Status { .. })
    ));
}

#[tokio::test]
async fn test_client_rejects_empty_name_locally() {
    let (_broker, client) = spawn_server().await;
    assert!(matches!(
        client.create_queue("").await,
        Err(ClientError::InvalidName)
    ));
    assert!(matches!(
        client.dequeue("").await,
        Err(ClientError::InvalidName)
    ));
}

#[tokio::test]
async fn test_client_encodes_queue_names() {
    let (broker, client) = spawn_server().await;
    client.create_queue("my queue").await.unwrap();
    assert_eq!(broker.queue_names(), vec!["my queue".to_string()]);

    client.enqueue("my queue", "x").await.unwrap();
    assert_eq!(broker.get_message("my queue").unwrap().body, "x");
}

#[tokio::test]
async fn test_client_unreachable_server_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::new(&format!("http://{addr}/memq/server")).unwrap();
    assert!(matches!(
        client.stats().await,
        Err(ClientError::Http(_))
    ));
}

#[tokio::test]
async fn test_consumer_exits_when_queue_empty() {
    let (broker, client) = spawn_server().await;
    broker.create_queue("work").unwrap();
    for i in 0..3 {
        broker.put_message("work", format!("item-{i}")).unwrap();
    }

    let (_tx, rx) = watch::channel(false);
    let consumer = Consumer::new(client, "work")
        .poll_interval(Duration::from_millis(10))
        .exit_when_empty(true);

    let mut seen = Vec::new();
    let report = consumer.run(rx, |m| seen.push(m.body)).await;

    assert_eq!(report.exit, ConsumerExit::QueueEmpty);
    assert_eq!(report.processed, 3);
    assert_eq!(seen, vec!["item-0", "item-1", "item-2"]);
    assert_eq!(broker.stats().get("work").unwrap().dequeued, 3);
}

#[tokio::test]
async fn test_consumer_keeps_polling_until_shutdown() {
    let (broker, client) = spawn_server().await;
    broker.create_queue("work").unwrap();

    let (tx, rx) = watch::channel(false);
    let consumer = Consumer::new(client, "work").poll_interval(Duration::from_millis(10));

    let handle = tokio::spawn(async move {
        let mut count = 0;
        let report = consumer.run(rx, |_| count += 1).await;
        (report, count)
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    broker.put_message("work", "late").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(true).unwrap();

    let (report, count) = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.exit, ConsumerExit::Shutdown);
    assert_eq!(report.processed, 1);
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_consumer_retries_on_errors_until_shutdown() {
    let (_broker, client) = spawn_server().await;

    let (tx, rx) = watch::channel(false);
    let consumer = Consumer::new(client, "missing").poll_interval(Duration::from_millis(10));
    let handle = tokio::spawn(async move { consumer.run(rx, |_| {}).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(tx);

    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.exit, ConsumerExit::Shutdown);
    assert_eq!(report.processed, 0);
}
