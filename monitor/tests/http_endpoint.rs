use std::{net::SocketAddr, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    runtime::Handle,
    time,
};

use monitor::{
    MonitorError,
    config::MonitorConfig,
    controls::{Command, Intent},
    endpoint::{Endpoint, HttpEndpoint},
    session::SessionId,
};

type Route = dyn Fn(&str) -> (u16, String) + Send + Sync;

/// Serves canned answers the way the training process does: one request per
/// connection, then close.
async fn serve(route: Arc<Route>) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&seen);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let route = Arc::clone(&route);
            let log = Arc::clone(&log);
            tokio::spawn(async move { answer(stream, &*route, &log).await });
        }
    });

    (addr, seen)
}

async fn answer(mut stream: TcpStream, route: &Route, log: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0; 512];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&buf);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    let (status, body) = route(&path);
    log.lock().push(path);

    let head = format!(
        "HTTP/1.1 {status} X\r\nAccess-Control-Allow-Origin: *\r\nContent-Length:{}\r\nContent-Type: text/json\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(body.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn config(addr: SocketAddr) -> MonitorConfig {
    MonitorConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        request_timeout: Some(Duration::from_secs(2)),
        ..MonitorConfig::default()
    }
}

const DESCRIBE: &str = r#"{"layers":[{"name":"Connected","description":"784 -> 10","no_params":7850}],"loss_fct":"CrossEntropyLoss","optimizer":{"name":"Adam", "description":"learning rate: 0.003"}}"#;

fn trainer(path: &str) -> (u16, String) {
    match path {
        "/describe" => (200, DESCRIBE.to_string()),
        "/play" | "/pause" | "/stop" | "/start_profiling" | "/stop_profiling" => {
            (200, String::new())
        }
        _ if path[1..].parse::<u64>().is_ok() => (
            200,
            r#"{"state":"play","batches":[{"batch": 1,"error": 0.500000}], "epochs": [], "total_batches": 100}"#
                .to_string(),
        ),
        _ => (404, String::new()),
    }
}

#[tokio::test]
async fn fetches_snapshot_for_session() {
    let (addr, seen) = serve(Arc::new(trainer)).await;
    let endpoint = HttpEndpoint::new(&config(addr)).unwrap();

    let snap = endpoint.snapshot(SessionId::from_raw(42)).await.unwrap();
    assert_eq!(snap.batches.len(), 1);
    assert_eq!(snap.total_batches, Some(100));
    assert_eq!(*seen.lock(), vec!["/42".to_string()]);

    let desc = endpoint.describe().await.unwrap();
    assert_eq!(desc.layers[0].no_params, 7850);
}

#[tokio::test]
async fn classifies_failures() {
    let route: Arc<Route> = Arc::new(|path: &str| match path {
        "/1" => (500, String::new()),
        _ => (200, "{\"batches\": [".to_string()),
    });
    let (addr, _) = serve(route).await;
    let endpoint = HttpEndpoint::new(&config(addr)).unwrap();

    match endpoint.snapshot(SessionId::from_raw(1)).await {
        Err(MonitorError::Protocol { path, status }) => {
            assert_eq!(path, "/1");
            assert_eq!(status, 500);
        }
        other => panic!("expected protocol failure, got {other:?}"),
    }

    let err = endpoint.snapshot(SessionId::from_raw(2)).await.unwrap_err();
    assert_eq!(err.kind(), "decode");

    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let gone = closed.local_addr().unwrap();
    drop(closed);

    let endpoint = HttpEndpoint::new(&config(gone)).unwrap();
    let err = endpoint.snapshot(SessionId::from_raw(1)).await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn commands_hit_their_paths() {
    let (addr, seen) = serve(Arc::new(trainer)).await;
    let endpoint = HttpEndpoint::new(&config(addr)).unwrap();

    for command in [
        Command::Pause,
        Command::Play,
        Command::StartProfiling,
        Command::StopProfiling,
        Command::Stop,
    ] {
        endpoint.command(command).await.unwrap();
    }

    assert_eq!(
        *seen.lock(),
        vec!["/pause", "/play", "/start_profiling", "/stop_profiling", "/stop"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn watch_connects_and_describes() {
    let (addr, seen) = serve(Arc::new(trainer)).await;
    let monitor = monitor::watch(&config(addr), &Handle::current()).unwrap();

    let mut connected = false;
    for _ in 0..100 {
        time::sleep(Duration::from_millis(20)).await;
        let d = monitor.dashboard.lock();
        if d.connection().is_connected() && d.description().is_some() {
            connected = true;
            break;
        }
    }
    assert!(connected, "never connected to the test trainer");

    assert_eq!(monitor.dispatcher.dispatch(Intent::Stop), Some(Command::Stop));
    time::sleep(Duration::from_millis(100)).await;
    assert!(seen.lock().iter().any(|p| p == "/stop"));
    assert!(seen.lock().iter().any(|p| *p == monitor.session.path()));
}
