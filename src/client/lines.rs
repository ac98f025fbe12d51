//! Line Splitting
//!
//! Adapts a stream of byte chunks into a stream of text lines, yielding each
//! line as soon as its terminator arrives.

use crate::error::{OpenAiError, Result};
use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

pin_project! {
    /// Stream of text lines read from a byte stream.
    ///
    /// Lines end at `\n`; a trailing `\r` is dropped. Bytes are held until a
    /// full line is available so multibyte characters are never split, and an
    /// unterminated final line is yielded when the input ends.
    pub struct Lines<S> {
        #[pin]
        inner: S,
        buffer: Vec<u8>,
        // Prefix of `buffer` already known to hold no newline
        scanned: usize,
        finished: bool,
    }
}

impl<S> Lines<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            scanned: 0,
            finished: false,
        }
    }
}

impl<S, E> Stream for Lines<S>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<OpenAiError>,
{
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(line) = take_line(this.buffer, this.scanned) {
                return Poll::Ready(Some(Ok(line)));
            }

            if *this.finished {
                if this.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                let rest = std::mem::take(this.buffer);
                *this.scanned = 0;
                return Poll::Ready(Some(Ok(decode(rest))));
            }

            match ready!(this.inner.as_mut().poll_next(cx)) {
                Some(Ok(chunk)) => this.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => return Poll::Ready(Some(Err(e.into()))),
                None => *this.finished = true,
            }
        }
    }
}

/// Split the first complete line off `buffer`, searching only past `scanned`.
fn take_line(buffer: &mut Vec<u8>, scanned: &mut usize) -> Option<String> {
    let Some(offset) = buffer[*scanned..].iter().position(|&b| b == b'\n') else {
        *scanned = buffer.len();
        return None;
    };

    let mut line: Vec<u8> = buffer.drain(..=*scanned + offset).collect();
    *scanned = 0;
    line.pop();
    Some(decode(line))
}

fn decode(mut line: Vec<u8>) -> String {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    match String::from_utf8(line) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
