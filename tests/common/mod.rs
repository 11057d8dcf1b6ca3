#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use zai::Config;
use zai::v4::rest::Client;

/// A canned HTTP reply. SSE replies are written chunk by chunk and the
/// connection is closed to end the body.
pub struct Reply {
    pub status: &'static str,
    pub content_type: &'static str,
    pub chunks: Vec<Vec<u8>>,
    pub streaming: bool,
}

impl Reply {
    pub fn json(status: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            chunks: vec![body.as_bytes().to_vec()],
            streaming: false,
        }
    }

    pub fn sse(chunks: &[&str]) -> Self {
        Self {
            status: "200 OK",
            content_type: "text/event-stream",
            chunks: chunks.iter().map(|c| c.as_bytes().to_vec()).collect(),
            streaming: true,
        }
    }
}

/// What the server saw for one request.
#[derive(Debug)]
pub struct Recorded {
    pub head: String,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is json")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Serves `replies` in order, one connection per reply.
pub async fn start_server(
    replies: Vec<Reply>,
) -> (SocketAddr, tokio::task::JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut recorded = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().await.unwrap();
            recorded.push(read_request(&mut stream).await);
            write_reply(&mut stream, reply).await;
        }
        recorded
    });
    (addr, handle)
}

pub fn client_for(addr: SocketAddr) -> Client {
    Client::new(Config::new("test-key").with_base_url(format!("http://{addr}/api/paas/v4")))
        .expect("client")
}

pub fn unique_temp_path(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("zai-test-{nanos}-{label}"))
}

async fn read_request(stream: &mut TcpStream) -> Recorded {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&data[..head_end]).into_owned();
    let mut body = data[head_end..].to_vec();

    let lower = head.to_ascii_lowercase();
    let content_length = lower.lines().find_map(|line| {
        line.strip_prefix("content-length:")
            .and_then(|v| v.trim().parse::<usize>().ok())
    });
    let chunked = lower.contains("transfer-encoding: chunked");

    if let Some(len) = content_length {
        while body.len() < len {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }
    } else if chunked {
        while find(&body, b"0\r\n\r\n").is_none() {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }
        body = dechunk(&body);
    }

    Recorded { head, body }
}

async fn write_reply(stream: &mut TcpStream, reply: Reply) {
    if reply.streaming {
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nConnection: close\r\n\r\n",
            reply.status, reply.content_type
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        // The client may hang up once it has seen `[DONE]`.
        for chunk in reply.chunks {
            if stream.write_all(&chunk).await.is_err() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    } else {
        let body: Vec<u8> = reply.chunks.concat();
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            reply.status,
            reply.content_type,
            body.len()
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.write_all(&body).await.unwrap();
    }
    let _ = stream.shutdown().await;
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn dechunk(mut raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(line_end) = find(raw, b"\r\n") {
        let size = std::str::from_utf8(&raw[..line_end])
            .ok()
            .and_then(|s| usize::from_str_radix(s.trim(), 16).ok())
            .unwrap_or(0);
        if size == 0 {
            break;
        }
        let start = line_end + 2;
        out.extend_from_slice(&raw[start..start + size]);
        raw = &raw[start + size + 2..];
    }
    out
}
