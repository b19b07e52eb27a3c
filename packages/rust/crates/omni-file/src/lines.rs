//! Line splitting over an async byte stream.
//!
//! CR, LF and CRLF all end a line. A CRLF pair is consumed as one boundary
//! even when the CR and the LF land in different buffer fills.

use std::io;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use memchr::memchr2;
use tokio::io::AsyncBufRead;

/// Produces delimiter-stripped lines from an [`AsyncBufRead`] source.
///
/// Forward only: once the source reports end of input, every further call
/// returns `None`.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    pending_cr: bool,
    eof: bool,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    /// Wrap a buffered source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            pending_cr: false,
            eof: false,
        }
    }

    /// Whether the source has been exhausted.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.eof
    }

    /// Read the next line.
    ///
    /// # Errors
    /// Propagates read failures from the underlying source.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        std::future::poll_fn(|cx| self.poll_next_line(cx)).await
    }

    /// Poll for the next line.
    ///
    /// # Errors
    /// Propagates read failures from the underlying source.
    pub fn poll_next_line(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<Option<String>>> {
        if self.eof {
            return Poll::Ready(Ok(None));
        }

        loop {
            let available = ready!(Pin::new(&mut self.inner).poll_fill_buf(cx))?;

            if available.is_empty() {
                self.eof = true;
                self.pending_cr = false;
                if self.buf.is_empty() {
                    return Poll::Ready(Ok(None));
                }
                return Poll::Ready(Ok(Some(decode_line(mem::take(&mut self.buf)))));
            }

            // LF completing a CRLF whose CR ended the previous line.
            if self.pending_cr {
                self.pending_cr = false;
                if available[0] == b'\n' {
                    Pin::new(&mut self.inner).consume(1);
                    continue;
                }
            }

            if let Some(i) = memchr2(b'\n', b'\r', available) {
                let delimiter = available[i];
                // CRLF inside the same fill is consumed in one go.
                let crlf = delimiter == b'\r' && available.get(i + 1) == Some(&b'\n');
                self.buf.extend_from_slice(&available[..i]);

                let consumed = if crlf { i + 2 } else { i + 1 };
                Pin::new(&mut self.inner).consume(consumed);
                self.pending_cr = delimiter == b'\r' && !crlf;

                return Poll::Ready(Ok(Some(decode_line(mem::take(&mut self.buf)))));
            }

            let n = available.len();
            self.buf.extend_from_slice(available);
            Pin::new(&mut self.inner).consume(n);
        }
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }
}

/// Decode a line as UTF-8, replacing invalid sequences with U+FFFD.
fn decode_line(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
