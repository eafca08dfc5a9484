//! Minimal HTTP/1.1 job service for integration tests.
//!
//! Serves one job per kind: start returns a fixed id, progress walks through
//! a list of JSON bodies (the last one repeats), cancel confirms, and the
//! artifact endpoint serves a static body. Every request is recorded.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JobServerScript {
    /// Status and body of the start response (both kinds).
    pub start_status: u16,
    pub start_body: String,
    pub progress: Vec<String>,
    pub artifact: Vec<u8>,
    pub disposition: Option<String>,
}

impl Default for JobServerScript {
    fn default() -> Self {
        Self {
            start_status: 200,
            start_body: r#"{"download_id":"abc"}"#.to_string(),
            progress: vec![r#"{"status":"completed","percent":100}"#.to_string()],
            artifact: Vec::new(),
            disposition: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

struct State {
    script: JobServerScript,
    progress_served: usize,
    requests: Vec<RecordedRequest>,
}

pub struct JobServer {
    pub base_url: String,
    state: Arc<Mutex<State>>,
}

impl JobServer {
    /// Starts the server on a background thread; it runs until the process exits.
    pub fn start(script: JobServerScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State {
            script,
            progress_served: 0,
            requests: Vec::new(),
        }));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}/", port),
            state,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of requests whose method matches and whose path starts with `prefix`.
    pub fn count(&self, method: &str, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .count()
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let (method, path, body) = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    let mut st = state.lock().unwrap();
    st.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body: body.clone(),
    });

    let route = path.split('?').next().unwrap_or("");
    let (status, content_type, payload, extra): (u16, &str, Vec<u8>, String) =
        match (method.as_str(), route) {
            ("POST", "/api/download") | ("POST", "/api/convert") => (
                st.script.start_status,
                "application/json",
                st.script.start_body.clone().into_bytes(),
                String::new(),
            ),
            ("GET", p) if p.starts_with("/api/progress/") || p.starts_with("/api/convert/progress/") => {
                let idx = st.progress_served.min(st.script.progress.len().saturating_sub(1));
                st.progress_served += 1;
                let body = st.script.progress.get(idx).cloned().unwrap_or_default();
                (200, "application/json", body.into_bytes(), String::new())
            }
            ("POST", p) if p.starts_with("/api/cancel/") || p.starts_with("/api/convert/cancel/") => (
                200,
                "application/json",
                br#"{"cancelled":true}"#.to_vec(),
                String::new(),
            ),
            ("GET", p) if p.starts_with("/api/file/") => {
                let extra = st
                    .script
                    .disposition
                    .as_ref()
                    .map(|d| format!("Content-Disposition: {}\r\n", d))
                    .unwrap_or_default();
                (200, "application/octet-stream", st.script.artifact.clone(), extra)
            }
            ("GET", "/api/scan") => (
                200,
                "application/json",
                br#"{"title":"Demo clip","duration":125.0,"thumbnail":null,"webpage_url":"https://example.test/v"}"#.to_vec(),
                String::new(),
            ),
            ("GET", "/api/downloads") => (
                200,
                "application/json",
                br#"[{"filename":"a.mp4","size":"1.0 MB","created_at":"2026-10-19 12:00","path":"/srv/a.mp4","type":"video"}]"#.to_vec(),
                String::new(),
            ),
            ("POST", "/api/open-folder") => (
                200,
                "application/json",
                br#"{"success":true}"#.to_vec(),
                String::new(),
            ),
            _ => (
                404,
                "application/json",
                br#"{"detail":"Not Found"}"#.to_vec(),
                String::new(),
            ),
        };
    drop(st);

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        reason(status),
        content_type,
        payload.len(),
        extra
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&payload);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Reads request line, headers and a Content-Length body.
fn read_request(stream: &mut TcpStream) -> Option<(String, String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = (header_end + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[header_end..end]).to_string();
    Some((method, path, body))
}
