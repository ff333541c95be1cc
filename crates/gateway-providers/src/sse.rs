//! Incremental event-stream decoding shared by every adapter.
//!
//! Vendors deliver newline-delimited records over a chunked body. A record may
//! span several network reads and one read may carry several records, so bytes
//! are buffered until a full line is available. Each vendor supplies a
//! [`RecordDecoder`] that turns one record's payload into a [`RecordEvent`];
//! [`fragment_stream`] drives the shared state machine:
//!
//! `Streaming (buffer -> parse complete records -> emit fragments) -> Terminal`
//!
//! The terminal `done` fragment is emitted exactly once, whether the vendor
//! signalled the end or the body simply ran out.

use async_stream::try_stream;
use bytes::{Bytes, BytesMut};
use futures::Stream;
use futures_util::StreamExt;
use gateway_core::{FragmentStream, ProviderError, StreamFragment};
use std::fmt::Display;
use tracing::{trace, warn};

/// Decodes one record payload for a specific vendor
pub type RecordDecoder = fn(&str) -> Result<RecordEvent, serde_json::Error>;

/// What a single record contributed to the stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEvent {
    /// Text delta carried by the record (may be empty)
    pub content: String,
    /// Whether the vendor signalled the end of the response
    pub finished: bool,
}

impl RecordEvent {
    /// The record that ends the stream without content
    #[must_use]
    pub fn finished() -> Self {
        Self {
            content: String::new(),
            finished: true,
        }
    }
}

/// Byte buffer that yields complete lines.
///
/// Lines are decoded only once their terminator has arrived, so a multi-byte
/// UTF-8 character split across reads is never decoded in halves.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: BytesMut,
    scanned: usize,
}

impl LineBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes from a network read
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next complete line, without its `\n` or `\r\n` terminator
    pub fn next_line(&mut self) -> Option<String> {
        let offset = self.buf[self.scanned..].iter().position(|b| *b == b'\n');
        let Some(offset) = offset else {
            self.scanned = self.buf.len();
            return None;
        };

        let line = self.buf.split_to(self.scanned + offset + 1);
        self.scanned = 0;

        let mut end = line.len() - 1;
        if end > 0 && line[end - 1] == b'\r' {
            end -= 1;
        }
        Some(String::from_utf8_lossy(&line[..end]).into_owned())
    }

    /// Bytes still waiting for a line terminator
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Extract the JSON payload from one event-stream line.
///
/// Blank lines, `:` comments and non-data fields (`event:`, `id:`, `retry:`)
/// carry nothing. A bare JSON object line is accepted as its own payload.
#[must_use]
pub fn data_payload(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    if let Some(rest) = line.strip_prefix("data:") {
        let rest = rest.trim();
        return (!rest.is_empty()).then_some(rest);
    }

    line.starts_with('{').then_some(line)
}

/// Decode a vendor body into canonical fragments.
///
/// Malformed records are logged and skipped. A read error ends the stream with
/// `Err` and no terminal fragment; dropping the returned stream drops `body`
/// and with it the underlying connection.
pub fn fragment_stream<S, E>(provider: impl Into<String>, body: S, decode: RecordDecoder) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let provider = provider.into();

    let stream = try_stream! {
        let mut body = Box::pin(body);
        let mut lines = LineBuffer::new();
        let mut exhausted = false;

        while !exhausted {
            match body.next().await {
                Some(chunk) => {
                    let chunk = chunk.map_err(|e| {
                        ProviderError::new(provider.as_str(), format!("Stream error: {e}"))
                    })?;
                    lines.push(&chunk);
                }
                None => {
                    // Terminate a trailing record that arrived without a newline.
                    lines.push(b"\n");
                    exhausted = true;
                }
            }

            while let Some(line) = lines.next_line() {
                let Some(payload) = data_payload(&line) else {
                    continue;
                };

                match decode(payload) {
                    Ok(event) => {
                        trace!(provider = %provider, finished = event.finished, "Decoded stream record");
                        if !event.content.is_empty() {
                            yield StreamFragment::content(event.content);
                        }
                        if event.finished {
                            yield StreamFragment::done();
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(
                            provider = %provider,
                            error = %e,
                            record = %payload,
                            "Skipping malformed stream record"
                        );
                    }
                }
            }
        }

        yield StreamFragment::done();
    };

    Box::pin(stream)
}
