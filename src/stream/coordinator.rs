use super::{collect, feed, ResponseHandler, StreamOpener};
use crate::error::{JuzuError, Result};
use log::{debug, error, info};
use service_protos::DiarizationConfig;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::task::AbortOnDropHandle;

/// Runs one streaming diarization call to completion.
///
/// Audio is fed from a spawned task while responses are collected on the
/// calling task; `handler` sees every response, in order. Returns once the
/// server has closed the stream and the feeder has finished.
///
/// Both directions of a broken call usually fail together (a connection reset
/// shows up on send and on receive), so only the first error recorded is
/// returned and any other is discarded. Results already handed to `handler`
/// before a failure stay delivered.
///
/// A call the transport could not start fails with
/// [`JuzuError::OpenFailed`], like a failed open, and the feeder is aborted.
///
/// Dropping the returned future cancels the call and aborts the feeder.
pub async fn run<O, R, H>(
    opener: &mut O,
    config: DiarizationConfig,
    audio: R,
    handler: &mut H,
    chunk_size: usize,
) -> Result<()>
where
    O: StreamOpener + ?Sized,
    R: AsyncRead + Unpin + Send + 'static,
    H: ResponseHandler + ?Sized,
{
    let (mut sink, mut source) = opener.open().await.map_err(|e| match e {
        JuzuError::OpenFailed(_) => e,
        other => JuzuError::OpenFailed(Box::new(other)),
    })?;
    info!(
        "🎙️ Streaming diarization started (model '{}', {} byte chunks)",
        config.model_id, chunk_size
    );

    // One slot per side: each records at most one error, so sends never block.
    let (err_tx, mut err_rx) = mpsc::channel::<JuzuError>(2);

    let feeder_err_tx = err_tx.clone();
    let feeder = AbortOnDropHandle::new(tokio::spawn(async move {
        let mut audio = audio;
        match feed(&mut sink, config, &mut audio, chunk_size).await {
            Ok(summary) => debug!("Feeder finished: {:?}", summary),
            Err(e) => {
                debug!("Feeder failed: {}", e);
                let _ = feeder_err_tx.try_send(e);
            }
        }
    }));

    match collect(&mut source, handler).await {
        Ok(received) => info!("📥 Server closed the stream after {} responses", received),
        Err(e @ JuzuError::OpenFailed(_)) => {
            // Nothing the feeder queued reached the server.
            feeder.abort();
            error!("{}", e);
            return Err(e);
        }
        Err(e) => {
            debug!("Collector failed: {}", e);
            let _ = err_tx.try_send(e);
        }
    }

    // A panicking feeder never reached its own send, so the slot is free.
    if let Err(e) = feeder.await {
        let _ = err_tx.try_send(e.into());
    }
    drop(err_tx);

    match err_rx.try_recv() {
        Ok(err) => {
            error!("Streaming diarization failed: {}", err);
            Err(JuzuError::StreamingFailed(Box::new(err)))
        }
        Err(_) => Ok(()),
    }
}
