use super::RequestSink;
use crate::error::{JuzuError, Result};
use log::{debug, info, warn};
use service_protos::{DiarizationConfig, StreamingDiarizeRequest};
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};

/// What the feeder managed to put on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub chunks_sent: usize,
    pub bytes_sent: u64,
    /// The call ended before all audio was sent; its status is reported on
    /// the inbound half.
    pub closed_by_peer: bool,
}

/// Sends `config`, then the contents of `audio` in chunks of at most
/// `chunk_size` bytes, then half-closes the call.
///
/// A failed send ends feeding without a half-close, since the call is already
/// broken. Running out of audio is the normal way to finish and is not an
/// error.
pub async fn feed<S, R>(
    sink: &mut S,
    config: DiarizationConfig,
    audio: &mut R,
    chunk_size: usize,
) -> Result<FeedSummary>
where
    S: RequestSink + ?Sized,
    R: AsyncRead + Unpin + ?Sized,
{
    if chunk_size == 0 {
        return Err(JuzuError::InvalidConfig(
            "streaming buffer size must be greater than 0".to_string(),
        ));
    }

    let mut summary = FeedSummary::default();

    // The first message must be the config, everything after it is audio.
    if !send_or_peer_closed(sink, StreamingDiarizeRequest::config(config)).await? {
        summary.closed_by_peer = true;
        return Ok(summary);
    }
    debug!("Sent diarization config");

    let mut buf = vec![0u8; chunk_size];
    loop {
        let n = match audio.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Failed to read audio after {} chunks: {}", summary.chunks_sent, e);
                sink.close_send().await?;
                return Err(e.into());
            }
        };

        if !send_or_peer_closed(sink, StreamingDiarizeRequest::audio(&buf[..n])).await? {
            info!(
                "Server ended the call after {} audio chunks",
                summary.chunks_sent
            );
            summary.closed_by_peer = true;
            return Ok(summary);
        }
        summary.chunks_sent += 1;
        summary.bytes_sent += n as u64;

        if summary.chunks_sent % 100 == 0 {
            debug!(
                "Sent {} audio chunks ({} bytes)",
                summary.chunks_sent, summary.bytes_sent
            );
        }
    }

    sink.close_send().await?;
    info!(
        "📤 Audio finished: {} chunks, {} bytes sent",
        summary.chunks_sent, summary.bytes_sent
    );
    Ok(summary)
}

/// `Ok(false)` when the peer has already ended the call.
async fn send_or_peer_closed<S>(sink: &mut S, request: StreamingDiarizeRequest) -> Result<bool>
where
    S: RequestSink + ?Sized,
{
    match sink.send(request).await {
        Ok(()) => Ok(true),
        Err(e) if e.is_stream_closed() => Ok(false),
        Err(e) => Err(e),
    }
}
