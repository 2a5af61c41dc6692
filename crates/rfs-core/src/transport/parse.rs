//! Parse HTTP response header lines into a ResponseHead.

/// Status and size of the final response (after redirects).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code from the status line, 0 if none was seen.
    pub status: u32,
    /// Total body size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
}

impl ResponseHead {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Interim responses that curl follows on its own (redirects, `100 Continue`).
    pub fn is_interim(&self) -> bool {
        (100..200).contains(&self.status) || (300..400).contains(&self.status)
    }
}

/// Status code from a line like `HTTP/1.1 200 OK` or `HTTP/2 404`.
pub(crate) fn parse_status_line(line: &str) -> Option<u32> {
    let line = line.trim();
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Parse one response's header block (status line first) into a ResponseHead.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(status) = parse_status_line(line) {
            head.status = status;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.trim().parse::<u64>() {
                    head.content_length = Some(n);
                }
            }
        }
    }

    head
}
