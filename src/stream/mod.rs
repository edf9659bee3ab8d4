//! Bidirectional streaming diarization.
//!
//! One call carries a single configuration handshake followed by audio on the
//! outbound half, while results arrive on the inbound half:
//!
//! ```text
//!                  +--------------+   config, audio...   +--------+
//!  AsyncRead ----> | AudioFeeder  | -------------------> |        |
//!                  +--------------+    RequestSink        |        |
//!                                                         | server |
//!                  +-----------------+   results...       |        |
//!  handler <------ | ResultCollector | <----------------- |        |
//!                  +-----------------+  ResponseSource    +--------+
//! ```
//!
//! The [`coordinator`] runs both sides concurrently and reduces their
//! outcomes to a single `Result`.

pub mod collector;
pub mod coordinator;
pub mod feeder;

#[cfg(test)]
pub(crate) mod test_utils;

use crate::error::Result;
use async_trait::async_trait;
use service_protos::{DiarizationResponse, StreamingDiarizeRequest};
use tokio::sync::mpsc;

pub use collector::collect;
pub use coordinator::run;
pub use feeder::{feed, FeedSummary};

/// Opens one duplex call and hands back its two halves.
#[async_trait]
pub trait StreamOpener {
    type Sink: RequestSink + 'static;
    type Source: ResponseSource;

    async fn open(&mut self) -> Result<(Self::Sink, Self::Source)>;
}

/// Outbound half of a call.
#[async_trait]
pub trait RequestSink: Send {
    async fn send(&mut self, request: StreamingDiarizeRequest) -> Result<()>;

    /// Half-close: no more requests will be sent. Called at most once.
    async fn close_send(&mut self) -> Result<()>;
}

/// Inbound half of a call.
#[async_trait]
pub trait ResponseSource: Send {
    /// Next response, or `Ok(None)` once the server has closed its side.
    ///
    /// Transports that only learn on the first receive whether the call could
    /// be started report that failure as [`crate::JuzuError::OpenFailed`].
    async fn recv(&mut self) -> Result<Option<DiarizationResponse>>;
}

/// Receives every response of a call, in order, exactly once.
///
/// Runs on the collector's task, so it should return quickly and never block.
pub trait ResponseHandler {
    fn handle(&mut self, response: DiarizationResponse);
}

impl<F> ResponseHandler for F
where
    F: FnMut(DiarizationResponse),
{
    fn handle(&mut self, response: DiarizationResponse) {
        self(response)
    }
}

/// Forwards responses into a channel. Responses are dropped once the
/// receiving side goes away; the call itself keeps draining.
impl ResponseHandler for mpsc::UnboundedSender<DiarizationResponse> {
    fn handle(&mut self, response: DiarizationResponse) {
        if self.send(response).is_err() {
            log::debug!("Response receiver dropped, discarding result");
        }
    }
}
