//! End-to-end tests for the HTTP endpoints, driven over a real socket.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use ipbook::config::AccessConfig;
use ipbook::http::{build_router, AppState};
use ipbook::record::{DateStamp, IpRecord, IpType, DATE_PLACEHOLDER};
use ipbook::store::{FileStore, MemStore, Store};

async fn spawn_server(state: AppState) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");

    let body = body.unwrap_or("");
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(req.as_bytes()).await.expect("write request");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");

    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");

    (status, body.to_string())
}

fn used_record(ip: &str, account: &str) -> IpRecord {
    let mut record = IpRecord::unused(ip, "255.255.255.0", "10.0.0.1");
    record.used = true;
    record.account_number = Some(account.to_string());
    record.kind = Some(IpType::Static);
    record.mac = Some("aabbccddeeff".to_string());
    record.date_used = Some(DateStamp::Pending);
    record
}

#[tokio::test]
async fn get_ips_returns_the_record_array() {
    let store = MemStore::with_records(vec![used_record("10.0.0.5", "ACC1")]);
    let addr = spawn_server(AppState::new(Arc::new(store))).await;

    let (status, body) = send_raw(addr, "GET", "/ips.json", None).await;
    assert_eq!(status, 200);

    let records: Vec<IpRecord> = serde_json::from_str(&body).expect("record array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip, "10.0.0.5");
}

#[tokio::test]
async fn save_stamps_pending_dates_and_returns_the_updated_set() {
    let store = Arc::new(MemStore::new());
    let addr = spawn_server(AppState::new(store.clone())).await;

    let payload = serde_json::to_string(&vec![used_record("10.0.0.5", "ACC1")]).unwrap();
    assert!(payload.contains(DATE_PLACEHOLDER));

    let (status, body) = send_raw(addr, "POST", "/save-ips.php", Some(&payload)).await;
    assert_eq!(status, 200);
    assert!(!body.contains(DATE_PLACEHOLDER));

    let returned: Vec<IpRecord> = serde_json::from_str(&body).expect("record array");
    assert!(matches!(returned[0].date_used, Some(DateStamp::On(_))));

    // The store now holds the stamped set.
    let stored = store.load().await.unwrap();
    assert_eq!(stored, returned);
}

#[tokio::test]
async fn save_with_malformed_json_is_a_400() {
    let store = Arc::new(MemStore::with_records(vec![used_record("10.0.0.5", "ACC1")]));
    let addr = spawn_server(AppState::new(store.clone())).await;

    let (status, body) = send_raw(addr, "POST", "/save-ips.php", Some("{ not json")).await;
    assert_eq!(status, 400);
    assert!(body.contains("Invalid JSON data."));

    // The inventory is untouched.
    assert_eq!(store.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn save_requires_post() {
    let addr = spawn_server(AppState::new(Arc::new(MemStore::new()))).await;
    let (status, _) = send_raw(addr, "GET", "/save-ips.php", None).await;
    assert_eq!(status, 405);
}

#[tokio::test]
async fn view_access_gates_reads() {
    let mut state = AppState::new(Arc::new(MemStore::new()));
    state.access = AccessConfig {
        can_view: false,
        can_edit: true,
    };
    let addr = spawn_server(state).await;

    let (status, body) = send_raw(addr, "GET", "/ips.json", None).await;
    assert_eq!(status, 403);
    assert!(body.contains("Access denied."));
}

#[tokio::test]
async fn edit_access_gates_writes() {
    let mut state = AppState::new(Arc::new(MemStore::new()));
    state.access = AccessConfig {
        can_view: true,
        can_edit: false,
    };
    let addr = spawn_server(state).await;

    let (status, _) = send_raw(addr, "POST", "/save-ips.php", Some("[]")).await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn healthz_is_alive() {
    let addr = spawn_server(AppState::new(Arc::new(MemStore::new()))).await;
    let (status, body) = send_raw(addr, "GET", "/healthz", None).await;
    assert_eq!(status, 200);
    assert!(body.contains("ok"));
}

#[tokio::test]
async fn file_store_backed_save_then_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ips.json");
    let store = FileStore::open(&path, true).unwrap();
    let addr = spawn_server(AppState::new(Arc::new(store))).await;

    let payload = serde_json::to_string(&vec![used_record("10.0.0.9", "ACC9")]).unwrap();
    let (status, _) = send_raw(addr, "POST", "/save-ips.php", Some(&payload)).await;
    assert_eq!(status, 200);

    // The file landed pretty-printed with the stamp resolved.
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains('\n'));
    assert!(!raw.contains(DATE_PLACEHOLDER));

    let (status, body) = send_raw(addr, "GET", "/ips.json", None).await;
    assert_eq!(status, 200);
    let records: Vec<IpRecord> = serde_json::from_str(&body).expect("record array");
    assert_eq!(records[0].ip, "10.0.0.9");
}
