//! Server responder.
//!
//! Bridges a streaming render's lifecycle events to a single resolved or
//! failed response. One of two ready paths is selected before rendering
//! starts (crawlers and static prerenders wait for all content); shell
//! errors fail the response outright, post-commit errors are log-only, and
//! a timer aborts the render a grace period past the streaming budget.

use std::pin::Pin;
use std::time::Duration;

use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;

use inkstream_core::{style_tag, ReadyPath, RenderTimings};

use crate::{
    error::{RenderError, Result},
    event::{RenderEvent, RenderHandle},
    injector::StyleInjector,
};

/// A committed streaming response: status plus the style-injected body.
pub struct SsrResponse {
    /// HTTP status. 200 unless a stream error arrived before commit.
    pub status: u16,
    /// Rendered markup with the style block injected before `</head>`.
    pub body: Pin<Box<dyn Stream<Item = Vec<u8>> + Send>>,
}

/// Drive one render to a committed response.
///
/// Waits on the ready event selected by `path`, then injects the extracted
/// styles into the chunk stream and returns it. Fails if the shell errors
/// or the render is aborted before any ready signal.
pub async fn respond(
    handle: RenderHandle,
    path: ReadyPath,
    timings: RenderTimings,
) -> Result<SsrResponse> {
    let RenderHandle {
        chunks,
        mut events,
        abort,
    } = handle;

    // Abort the render a grace period past the streaming budget so slow
    // subtrees get flushed instead of stalling the response forever.
    let abort_after = Duration::from_millis(timings.abort_after_ms());
    tokio::spawn(async move {
        tokio::time::sleep(abort_after).await;
        abort.abort();
    });

    let mut status: u16 = 200;
    let styles = loop {
        match events.recv().await {
            Some(RenderEvent::ShellReady { styles }) if path == ReadyPath::ShellReady => {
                break styles;
            }
            // On the all-ready path the shell signal just means rendering
            // is still in progress.
            Some(RenderEvent::ShellReady { .. }) => continue,
            Some(RenderEvent::AllReady { styles }) => break styles,
            Some(RenderEvent::ShellError { message }) => {
                return Err(RenderError::Shell(message));
            }
            Some(RenderEvent::StreamError { .. }) => {
                // Not fatal, but the document is incomplete; the error
                // itself surfaces through the shell path if the render
                // dies, so don't double-log here.
                status = 500;
                continue;
            }
            None => return Err(RenderError::RenderAborted),
        }
    };

    // Response committed: any further failure can only be logged.
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let RenderEvent::StreamError { message } | RenderEvent::ShellError { message } =
                event
            {
                tracing::error!(error = %message, "streaming render error");
            }
        }
    });

    let injector = StyleInjector::new(style_tag(&styles));
    let body = injector.apply(UnboundedReceiverStream::new(chunks));

    Ok(SsrResponse {
        status,
        body: Box::pin(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::{mpsc, oneshot};
    use tokio_stream::StreamExt;

    struct FakeRender {
        chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
        event_tx: mpsc::UnboundedSender<RenderEvent>,
        abort_rx: oneshot::Receiver<()>,
    }

    fn fake_handle() -> (RenderHandle, FakeRender) {
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (abort_tx, abort_rx) = oneshot::channel();
        (
            RenderHandle::from_parts(chunk_rx, event_rx, abort_tx),
            FakeRender {
                chunk_tx,
                event_tx,
                abort_rx,
            },
        )
    }

    fn shell_ready(styles: &str) -> RenderEvent {
        RenderEvent::ShellReady {
            styles: styles.to_string(),
        }
    }

    async fn collect_body(response: SsrResponse) -> String {
        let bytes: Vec<Vec<u8>> = response.body.collect().await;
        String::from_utf8(bytes.concat()).unwrap()
    }

    #[tokio::test]
    async fn test_shell_path_injects_styles() {
        let (handle, fake) = fake_handle();
        fake.event_tx.send(shell_ready(".a{}")).unwrap();
        fake.chunk_tx.send(b"<html><head>".to_vec()).unwrap();
        fake.chunk_tx.send(b"</head><body>".to_vec()).unwrap();
        drop(fake.chunk_tx);
        drop(fake.event_tx);

        let response = respond(handle, ReadyPath::ShellReady, RenderTimings::with_defaults())
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        let body = collect_body(response).await;
        assert_eq!(
            body,
            "<html><head><style id=\"inkstream-styles\">.a{}</style></head><body>"
        );
    }

    #[tokio::test]
    async fn test_all_ready_path_waits_past_shell() {
        let (handle, fake) = fake_handle();
        fake.event_tx.send(shell_ready(".early{}")).unwrap();
        fake.event_tx
            .send(RenderEvent::AllReady {
                styles: ".all{}".to_string(),
            })
            .unwrap();
        fake.chunk_tx.send(b"</head>".to_vec()).unwrap();
        drop(fake.chunk_tx);
        drop(fake.event_tx);

        let response = respond(handle, ReadyPath::AllReady, RenderTimings::with_defaults())
            .await
            .unwrap();
        let body = collect_body(response).await;
        assert!(body.contains(".all{}"));
        assert!(!body.contains(".early{}"));
    }

    #[tokio::test]
    async fn test_shell_error_fails_response() {
        let (handle, fake) = fake_handle();
        fake.event_tx
            .send(RenderEvent::ShellError {
                message: "boom".to_string(),
            })
            .unwrap();

        let result = respond(handle, ReadyPath::ShellReady, RenderTimings::with_defaults()).await;
        assert!(matches!(result, Err(RenderError::Shell(msg)) if msg == "boom"));
        drop(fake);
    }

    #[tokio::test]
    async fn test_pre_ready_stream_error_forces_500() {
        let (handle, fake) = fake_handle();
        fake.event_tx
            .send(RenderEvent::StreamError {
                message: "subtree failed".to_string(),
            })
            .unwrap();
        fake.event_tx.send(shell_ready("")).unwrap();
        fake.chunk_tx.send(b"</head>".to_vec()).unwrap();
        drop(fake.chunk_tx);
        drop(fake.event_tx);

        let response = respond(handle, ReadyPath::ShellReady, RenderTimings::with_defaults())
            .await
            .unwrap();
        assert_eq!(response.status, 500);
    }

    #[tokio::test]
    async fn test_post_ready_stream_error_keeps_response() {
        let (handle, fake) = fake_handle();
        fake.event_tx.send(shell_ready("")).unwrap();

        let response = respond(handle, ReadyPath::ShellReady, RenderTimings::with_defaults())
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        // Error after commit: logged, never surfaced to the consumer.
        fake.event_tx
            .send(RenderEvent::StreamError {
                message: "late failure".to_string(),
            })
            .unwrap();
        fake.chunk_tx.send(b"</head>tail".to_vec()).unwrap();
        drop(fake.chunk_tx);
        drop(fake.event_tx);

        let body = collect_body(response).await;
        assert!(body.ends_with("</head>tail"));
    }

    #[tokio::test]
    async fn test_events_closed_before_ready_is_aborted() {
        let (handle, fake) = fake_handle();
        drop(fake.event_tx);
        drop(fake.chunk_tx);

        let result = respond(handle, ReadyPath::ShellReady, RenderTimings::with_defaults()).await;
        assert!(matches!(result, Err(RenderError::RenderAborted)));
    }

    #[tokio::test]
    async fn test_timer_fires_abort_after_grace() {
        let (handle, mut fake) = fake_handle();

        let timings = RenderTimings::new(50).unwrap();
        let responder = tokio::spawn(respond(handle, ReadyPath::ShellReady, timings));

        // The abort switch fires stream_timeout + grace (1s) after the
        // responder starts, while it is still waiting for a shell.
        fake.abort_rx
            .try_recv()
            .expect_err("abort must not fire immediately");
        let fired = tokio::time::timeout(Duration::from_millis(2_000), &mut fake.abort_rx).await;
        assert!(fired.is_ok(), "abort timer never fired");

        // The renderer reacts by closing its channels; the responder then
        // reports the aborted render.
        drop(fake.event_tx);
        drop(fake.chunk_tx);
        let result = responder.await.unwrap();
        assert!(matches!(result, Err(RenderError::RenderAborted)));
    }
}
