//! Stream style injector.
//!
//! Rewrites the rendered byte stream in transit, inserting the serialized
//! style block immediately before the first `</head>`, without buffering
//! the stream. Chunks are decoded best-effort; a chunk that needs no
//! modification passes through verbatim (no re-encode). A marker split
//! across a chunk boundary is not detected - injection is skipped for that
//! response (see DESIGN.md).

use async_stream::stream;
use tokio_stream::{Stream, StreamExt};

use inkstream_core::{inject_once, HEAD_CLOSE_MARKER};

/// Latch-once transform over a rendered chunk stream.
#[derive(Debug)]
pub struct StyleInjector {
    payload: String,
    injected: bool,
}

impl StyleInjector {
    /// Injector for the given payload; the anchor is the closing head tag.
    pub fn new(payload: String) -> Self {
        Self {
            payload,
            injected: false,
        }
    }

    /// Transform one chunk, injecting before the first marker occurrence.
    ///
    /// After the first injection every chunk passes through untouched, even
    /// if the marker recurs later in the stream.
    pub fn transform(&mut self, chunk: Vec<u8>) -> Vec<u8> {
        if self.injected {
            return chunk;
        }
        let text = String::from_utf8_lossy(&chunk);
        match inject_once(&text, HEAD_CLOSE_MARKER, &self.payload) {
            Some(modified) => {
                self.injected = true;
                modified.into_bytes()
            }
            None => chunk,
        }
    }

    /// Has the payload been injected yet?
    pub fn did_inject(&self) -> bool {
        self.injected
    }

    /// Wrap a chunk stream, applying the transform in arrival order.
    ///
    /// Chunks are never reordered, dropped, or duplicated.
    pub fn apply<S>(mut self, chunks: S) -> impl Stream<Item = Vec<u8>>
    where
        S: Stream<Item = Vec<u8>>,
    {
        stream! {
            tokio::pin!(chunks);
            while let Some(chunk) = chunks.next().await {
                yield self.transform(chunk);
            }
        }
    }
}
