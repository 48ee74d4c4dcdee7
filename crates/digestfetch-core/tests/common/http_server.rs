//! Minimal HTTP/1.1 server for fetch integration tests.
//!
//! Serves one static body for every GET. Can be told to answer the first N
//! requests with an error status, to always answer with one, or to stall
//! partway through the body.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long a stalled response holds its connection.
const STALL_FOR: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// Status for every response; 200 serves the body.
    pub status: u16,
    /// Answer this many requests with 503 before behaving normally.
    pub fail_first: usize,
    /// Send the full Content-Length but only this many body bytes, then hold
    /// the connection open without sending more.
    pub stall_after: Option<usize>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            fail_first: 0,
            stall_after: None,
        }
    }
}

pub struct TestServer {
    /// Base URL of an archive on the server, e.g. "http://127.0.0.1:12345/openssl.zip".
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn start(body: Vec<u8>) -> TestServer {
    start_with_options(body, ServerOptions::default())
}

/// Starts the server on a background thread; it runs until the process exits.
pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let hits = Arc::new(AtomicUsize::new(0));
    let served = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = served.fetch_add(1, Ordering::SeqCst);
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, opts, n));
        }
    });
    TestServer {
        url: format!("http://127.0.0.1:{}/openssl.zip", port),
        hits,
    }
}

/// URL on a port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/openssl.zip", port)
}

fn handle(mut stream: TcpStream, body: &[u8], opts: ServerOptions, index: usize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let mut request = Vec::new();
    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    if !request.starts_with(b"GET ") {
        let _ = stream.write_all(
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    let status = if index < opts.fail_first {
        503
    } else {
        opts.status
    };
    let payload: &[u8] = if status == 200 { body } else { b"error" };
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: application/zip\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        payload.len()
    );
    let _ = stream.write_all(header.as_bytes());
    match opts.stall_after {
        Some(n) if status == 200 => {
            let _ = stream.write_all(&payload[..n.min(payload.len())]);
            let _ = stream.flush();
            thread::sleep(STALL_FOR);
        }
        _ => {
            let _ = stream.write_all(payload);
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
