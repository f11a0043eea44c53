use memchr::{memchr, memmem::Finder};
use scout_api::{
    limits::{enforce_message_parts, MAX_MESSAGE_BYTES},
    status::StatusCode,
};
use std::future::Future;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

/// Headers attached to every answer so browser clients on any origin can call us.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "*"),
];

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// Path without the query string.
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or("")
    }
}

/// Read one HTTP/1.1 request. Header names are lowercased. The whole message
/// is capped at [`MAX_MESSAGE_BYTES`].
pub async fn read_request<S>(stream: &mut S) -> Result<Request, StatusCode>
where
    S: AsyncReadExt + Unpin,
{
    let mut buf = Vec::with_capacity(4096);
    let mut tmp = [0u8; 2048];
    // resume point for the terminator scan
    let mut search_from: usize = 0;
    let finder = Finder::new(b"\r\n\r\n");
    let header_end = loop {
        let n = stream
            .read(&mut tmp)
            .await
            .map_err(|_| StatusCode::InternalServerError)?;
        if n == 0 {
            return Err(StatusCode::BadRequest);
        }
        buf.extend_from_slice(&tmp[..n]);
        if buf.len() > MAX_MESSAGE_BYTES {
            return Err(StatusCode::RequestEntityTooLarge);
        }
        let start = search_from.saturating_sub(3);
        if let Some(rel) = finder.find(&buf[start..]) {
            break start + rel;
        }
        search_from = buf.len();
    };

    let (head, rest) = buf.split_at(header_end + 4);
    let head_str = std::str::from_utf8(head).map_err(|_| StatusCode::BadRequest)?;
    let mut lines = head_str.split("\r\n");
    let mut sp = lines.next().unwrap_or("").split_whitespace();
    let method = sp.next().unwrap_or("").to_ascii_uppercase();
    let path = sp.next().unwrap_or("").to_string();
    if method.is_empty() || path.is_empty() {
        return Err(StatusCode::BadRequest);
    }

    let mut headers = Vec::new();
    let mut content_length: usize = 0;
    for line in lines {
        if line.is_empty() {
            continue;
        }
        if let Some(idx) = memchr(b':', line.as_bytes()) {
            let (name_raw, value_raw) = line.split_at(idx);
            let name = name_raw.trim().to_ascii_lowercase();
            let value = value_raw[1..].trim().to_string();
            if name == "content-length" {
                content_length = value.parse::<usize>().map_err(|_| StatusCode::BadRequest)?;
            }
            headers.push((name, value));
        }
    }

    let head_len = header_end + 4;
    let mut body = Vec::new();
    if content_length > 0 {
        enforce_message_parts(head_len, content_length)
            .map_err(|_| StatusCode::RequestEntityTooLarge)?;
        body.extend_from_slice(rest);
        while body.len() < content_length {
            let mut chunk = [0u8; 4096];
            let n = stream
                .read(&mut chunk)
                .await
                .map_err(|_| StatusCode::InternalServerError)?;
            if n == 0 {
                return Err(StatusCode::BadRequest);
            }
            body.extend_from_slice(&chunk[..n]);
            enforce_message_parts(head_len, body.len())
                .map_err(|_| StatusCode::RequestEntityTooLarge)?;
        }
        body.truncate(content_length);
    }

    Ok(Request { method, path, headers, body })
}

/// Resolve once the peer closes its side of the connection or the socket
/// fails. Bytes sent after the request are drained and ignored.
pub async fn wait_for_close<R>(reader: &mut R)
where
    R: AsyncReadExt + Unpin,
{
    let mut sink = [0u8; 512];
    loop {
        match reader.read(&mut sink).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
    }
}

/// Drive `work` while watching the peer. If the peer goes away first,
/// `cancel` fires, `work` is dropped and `None` is returned.
pub async fn until_peer_closes<R, F, T>(
    reader: &mut R,
    cancel: &CancellationToken,
    work: F,
) -> Option<T>
where
    R: AsyncReadExt + Unpin,
    F: Future<Output = T>,
{
    tokio::select! {
        out = work => Some(out),
        _ = wait_for_close(reader) => {
            cancel.cancel();
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub code: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn empty(code: StatusCode) -> Self {
        Self { code, headers: vec![], body: vec![] }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        make_response(self.code, &self.headers, &self.body)
    }
}

/// Serialize a full response. Every answer closes the connection and carries
/// the CORS headers.
pub fn make_response(code: StatusCode, headers: &[(String, String)], body: &[u8]) -> Vec<u8> {
    let date = httpdate::fmt_http_date(std::time::SystemTime::now());
    let mut out = format!(
        "HTTP/1.1 {} {}\r\nserver: scoutd\r\ndate: {}\r\nconnection: close\r\n",
        code.as_u16(),
        code.reason(),
        date
    )
    .into_bytes();
    let mut had_ct = false;
    let mut had_cl = false;
    for (k, v) in headers {
        if k.eq_ignore_ascii_case("content-type") {
            had_ct = true;
        }
        if k.eq_ignore_ascii_case("content-length") {
            had_cl = true;
        }
        push_header(&mut out, k, v);
    }
    for (k, v) in CORS_HEADERS {
        if !headers.iter().any(|(h, _)| h.eq_ignore_ascii_case(k)) {
            push_header(&mut out, k, v);
        }
    }
    if !had_ct && !body.is_empty() {
        push_header(&mut out, "content-type", "application/json");
    }
    if !had_cl && code != StatusCode::NoContent {
        push_header(&mut out, "content-length", &body.len().to_string());
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(body);
    out
}

fn push_header(out: &mut Vec<u8>, name: &str, value: &str) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(b"\r\n");
}

pub fn make_empty_response(code: StatusCode) -> Vec<u8> {
    make_response(code, &[], &[])
}
