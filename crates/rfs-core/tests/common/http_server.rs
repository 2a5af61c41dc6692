//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table, one request per connection. Bodies are sent
//! either with `Content-Length` or delimited by connection close.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 with the body; `announce_length` controls the `Content-Length` header.
    Body { data: Vec<u8>, announce_length: bool },
    /// Empty response with this status.
    Status(u16),
    /// 302 to another path on the same server.
    Redirect(String),
    /// 200 with `Content-Length`, written in `pieces` parts with `delay` before each.
    Trickle {
        data: Vec<u8>,
        pieces: usize,
        delay: Duration,
    },
}

impl Route {
    pub fn body(data: impl Into<Vec<u8>>) -> Self {
        Route::Body {
            data: data.into(),
            announce_length: true,
        }
    }

    pub fn unsized_body(data: impl Into<Vec<u8>>) -> Self {
        Route::Body {
            data: data.into(),
            announce_length: false,
        }
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Unknown paths get 404.
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    match routes.get(path) {
        Some(Route::Body {
            data,
            announce_length,
        }) => {
            let length = if *announce_length {
                format!("Content-Length: {}\r\n", data.len())
            } else {
                String::new()
            };
            let head = format!("HTTP/1.1 200 OK\r\n{}Connection: close\r\n\r\n", length);
            let _ = stream.write_all(head.as_bytes());
            for chunk in data.chunks(16 * 1024) {
                if stream.write_all(chunk).is_err() {
                    return;
                }
            }
        }
        Some(Route::Trickle {
            data,
            pieces,
            delay,
        }) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                data.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let size = data.len().div_ceil((*pieces).max(1)).max(1);
            for piece in data.chunks(size) {
                thread::sleep(*delay);
                if stream.write_all(piece).and_then(|_| stream.flush()).is_err() {
                    return;
                }
            }
        }
        Some(Route::Redirect(to)) => {
            let head = format!(
                "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                to
            );
            let _ = stream.write_all(head.as_bytes());
        }
        Some(Route::Status(code)) => {
            let head = format!(
                "HTTP/1.1 {} Test\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                code
            );
            let _ = stream.write_all(head.as_bytes());
        }
        None => {
            let _ = stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    }
    let _ = stream.flush();
}
