//! Minimal HTTP/1.1 server with fixed routes for probe integration tests.
//!
//! Routes:
//! - `/ok` 200
//! - `/missing` 404
//! - `/redirect` 302 to `/ok`
//! - `/loop` 302 to itself
//! - `/no-head` 405 on HEAD (no `Allow`), 200 on GET
//! - `/forbidden-head` 403 on HEAD with `Allow: GET, HEAD`, 200 on GET
//!
//! Every request line (`METHOD /path`) is recorded so tests can check which
//! methods a probe used.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Requests seen by the server, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    fn push(&self, line: String) {
        if let Ok(mut v) = self.0.lock() {
            v.push(line);
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines().iter().any(|l| l == line)
    }
}

/// Starts the server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345") and the request log.
/// The server runs until the process exits.
pub fn start() -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let log = RequestLog::default();
    let server_log = log.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let log = server_log.clone();
            thread::spawn(move || handle(stream, &log));
        }
    });
    (format!("http://127.0.0.1:{}", port), log)
}

/// A URL on a port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/ok", port)
}

fn handle(mut stream: TcpStream, log: &RequestLog) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("").to_ascii_uppercase();
    let path = parts.next().unwrap_or("/").to_string();
    log.push(format!("{method} {path}"));

    let head = method == "HEAD";
    let route = path.split('?').next().unwrap_or("");
    let (status, extra) = match (route, head) {
        ("/ok", _) => ("200 OK", String::new()),
        ("/redirect", _) => ("302 Found", "Location: /ok\r\n".to_string()),
        ("/loop", _) => ("302 Found", "Location: /loop\r\n".to_string()),
        ("/no-head", true) => ("405 Method Not Allowed", String::new()),
        ("/no-head", false) => ("200 OK", String::new()),
        ("/forbidden-head", true) => ("403 Forbidden", "Allow: GET, HEAD\r\n".to_string()),
        ("/forbidden-head", false) => ("200 OK", String::new()),
        _ => ("404 Not Found", String::new()),
    };
    let body: &[u8] = if head { b"" } else { b"hello" };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        if head { 0 } else { body.len() },
        extra
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}
