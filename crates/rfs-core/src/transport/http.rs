//! libcurl GET on a dedicated thread; the body is handed over through a bounded channel.
//!
//! The transfer thread blocks when the channel is full, so a slow consumer
//! throttles the download instead of buffering it in memory.

use std::cell::RefCell;
use std::io::{self, Read};
use std::str;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use super::parse::{self, ResponseHead};
use super::{RemoteBody, Transport, TransportOptions};
use crate::error::TransportError;

type HeadMessage = Result<ResponseHead, TransportError>;
type BodyMessage = io::Result<Vec<u8>>;

/// [`Transport`] backed by the curl crate.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: TransportOptions,
}

impl CurlTransport {
    pub fn new(opts: TransportOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &TransportOptions {
        &self.opts
    }

    fn configure(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.opts.max_redirections)?;
        easy.useragent(&self.opts.user_agent)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.low_speed_limit(self.opts.low_speed_limit)?;
        easy.low_speed_time(self.opts.low_speed_time)?;
        easy.timeout(self.opts.timeout)?;
        Ok(easy)
    }
}

impl Transport for CurlTransport {
    fn fetch(&self, url: &str) -> Result<RemoteBody, TransportError> {
        let easy = self.configure(url)?;
        let (head_tx, head_rx) = mpsc::sync_channel::<HeadMessage>(1);
        let (body_tx, body_rx) = mpsc::sync_channel::<BodyMessage>(self.opts.channel_depth);

        let owned_url = url.to_string();
        thread::Builder::new()
            .name("rfs-transfer".into())
            .spawn(move || run_transfer(easy, &owned_url, head_tx, body_tx))
            .map_err(TransportError::Spawn)?;

        let head = head_rx.recv().map_err(|_| TransportError::Disconnected)??;
        tracing::debug!(
            url,
            status = head.status,
            content_length = ?head.content_length,
            "response head received"
        );
        Ok(RemoteBody::new(
            ChannelReader::new(body_rx),
            head.content_length,
        ))
    }

    fn fetch_installer(&self) -> Result<RemoteBody, TransportError> {
        self.fetch(&self.opts.installer_url)
    }
}

/// Body of the transfer thread. Sends exactly one head message (or error),
/// then body chunks; a failure after the head becomes an error chunk.
fn run_transfer(
    mut easy: curl::easy::Easy,
    url: &str,
    head_tx: SyncSender<HeadMessage>,
    body_tx: SyncSender<BodyMessage>,
) {
    let head_tx = RefCell::new(Some(head_tx));
    let block: RefCell<Vec<String>> = RefCell::new(Vec::new());

    let result = (|| -> Result<(), curl::Error> {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            let line = match str::from_utf8(data) {
                Ok(s) => s.trim_end(),
                Err(_) => return true,
            };
            let mut lines = block.borrow_mut();
            if parse::parse_status_line(line).is_some() {
                lines.clear();
            }
            if !line.is_empty() {
                lines.push(line.to_string());
                return true;
            }
            // Blank line: end of one response head. Redirects are followed by curl.
            let head = parse::parse_headers(&lines);
            if head.is_interim() {
                return true;
            }
            let Some(tx) = head_tx.borrow_mut().take() else {
                return true;
            };
            let message = checked_head(head, url);
            let accepted = message.is_ok();
            tx.send(message).is_ok() && accepted
        })?;
        transfer.write_function(|data| {
            // Schemes without a header block still need a head before the body.
            if let Some(tx) = head_tx.borrow_mut().take() {
                let message = checked_head(parse::parse_headers(&block.borrow()), url);
                let accepted = message.is_ok();
                let _ = tx.send(message);
                if !accepted {
                    return Ok(0);
                }
            }
            match body_tx.send(Ok(data.to_vec())) {
                Ok(()) => Ok(data.len()),
                // Reader dropped: abort the transfer.
                Err(_) => Ok(0),
            }
        })?;
        transfer.perform()
    })();

    match result {
        Ok(()) => {
            if let Some(tx) = head_tx.borrow_mut().take() {
                let _ = tx.send(checked_head(parse::parse_headers(&block.borrow()), url));
            }
            tracing::debug!(url, "transfer finished");
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "transfer failed");
            if let Some(tx) = head_tx.borrow_mut().take() {
                let _ = tx.send(Err(TransportError::Curl(e)));
            } else {
                let _ = body_tx.send(Err(io::Error::other(TransportError::Curl(e))));
            }
        }
    }
}

/// Accept only a 2xx final head. Status 0 means the scheme sent no status
/// line (e.g. `file://`), which is accepted as is.
fn checked_head(head: ResponseHead, url: &str) -> HeadMessage {
    if head.status == 0 || head.is_success() {
        Ok(head)
    } else {
        Err(TransportError::Http {
            url: url.to_string(),
            status: head.status,
        })
    }
}

/// Blocking reader over body chunks. Sender hang-up is end of stream.
struct ChannelReader {
    rx: Receiver<BodyMessage>,
    chunk: Vec<u8>,
    pos: usize,
}

impl ChannelReader {
    fn new(rx: Receiver<BodyMessage>) -> Self {
        Self {
            rx,
            chunk: Vec::new(),
            pos: 0,
        }
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos >= self.chunk.len() {
            match self.rx.recv() {
                Ok(Ok(chunk)) => {
                    self.chunk = chunk;
                    self.pos = 0;
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => return Ok(0),
            }
        }
        let n = (self.chunk.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.chunk[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
