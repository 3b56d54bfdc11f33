use super::*;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One-shot HTTP server that captures the raw request and answers with
/// `reply`, or never answers when `reply` is `None`.
async fn serve_once(reply: Option<&'static str>) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let raw = read_request(&mut socket).await;
        match reply {
            Some(reply) => socket.write_all(reply.as_bytes()).await.unwrap(),
            None => tokio::time::sleep(Duration::from_secs(5)).await,
        }
        raw
    });
    (url, handle)
}

/// Read until the headers and the `Content-Length` body have arrived.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0_u8; 1024];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(split) = text.find("\r\n\r\n") {
            let body_len = text[..split]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().unwrap())
                })
                .unwrap_or(0);
            if raw.len() >= split + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).to_string()
}

fn post(url: &str, body: &str) -> HttpRequest {
    HttpRequest {
        method: Method::Post,
        url: format!("{url}/api/auth/login"),
        headers: vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            ("Authorization".to_owned(), "Bearer t-1".to_owned()),
        ],
        body: Some(body.to_owned()),
    }
}

#[tokio::test]
async fn sends_headers_and_body_and_reads_response() {
    let (url, server) =
        serve_once(Some("HTTP/1.1 401 Unauthorized\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}")).await;
    let transport = ReqwestTransport::new().unwrap();

    let response = transport
        .send(post(&url, r#"{"email":"a@b.c"}"#), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(response, HttpResponse { status: 401, body: "{}".to_owned() });
    let raw = server.await.unwrap().to_ascii_lowercase();
    assert!(raw.starts_with("post /api/auth/login"));
    assert!(raw.contains("authorization: bearer t-1"));
    assert!(raw.contains("content-type: application/json"));
    assert!(raw.contains(r#"{"email":"a@b.c"}"#));
}

#[tokio::test]
async fn slow_server_times_out() {
    let (url, _server) = serve_once(None).await;
    let transport = ReqwestTransport::new().unwrap();

    let timeout = Duration::from_millis(100);
    let err = transport.send(post(&url, "{}"), timeout).await.unwrap_err();
    assert_eq!(err, TransportError::Timeout(timeout));
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let transport = ReqwestTransport::new().unwrap();
    let err = transport.send(post(&url, "{}"), Duration::from_secs(5)).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
}
