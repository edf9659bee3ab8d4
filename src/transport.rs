//! gRPC implementation of the duplex stream halves.
//!
//! Requests flow through a bounded channel that tonic drains as the request
//! body; the call itself is started lazily by the first `recv`, which runs on
//! the collector while the feeder is already filling the channel. Servers may
//! hold back response headers until they have seen audio, so opening cannot
//! wait for them.
//!
//! A call that fails before the server answers was never started: its first
//! `recv` reports [`JuzuError::OpenFailed`], and whatever the feeder queued in
//! the meantime never reached the server.

use crate::error::{JuzuError, Result};
use crate::stream::{RequestSink, ResponseSource, StreamOpener};
use async_trait::async_trait;
use log::debug;
use service_protos::juzu_client::JuzuClient;
use service_protos::{DiarizationResponse, StreamingDiarizeRequest};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;
use tonic::Streaming;

/// Requests buffered between the feeder and the HTTP/2 stream.
const REQUEST_BUFFER: usize = 16;

type PendingCall = Pin<
    Box<
        dyn Future<
                Output = std::result::Result<
                    tonic::Response<Streaming<DiarizationResponse>>,
                    tonic::Status,
                >,
            > + Send,
    >,
>;

/// Opens `StreamingDiarize` calls on a shared channel.
#[derive(Debug, Clone)]
pub struct GrpcStreamOpener {
    client: JuzuClient<Channel>,
}

impl GrpcStreamOpener {
    pub fn new(client: JuzuClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StreamOpener for GrpcStreamOpener {
    type Sink = GrpcRequestSink;
    type Source = GrpcResponseSource;

    async fn open(&mut self) -> Result<(GrpcRequestSink, GrpcResponseSource)> {
        let (tx, rx) = mpsc::channel(REQUEST_BUFFER);
        let mut client = self.client.clone();
        let call: PendingCall =
            Box::pin(async move { client.streaming_diarize(ReceiverStream::new(rx)).await });

        debug!("Prepared StreamingDiarize call");
        Ok((
            GrpcRequestSink { tx: Some(tx) },
            GrpcResponseSource {
                inbound: Inbound::Pending(call),
            },
        ))
    }
}

/// Outbound half. Half-closing drops the sender, which ends the request body.
pub struct GrpcRequestSink {
    tx: Option<mpsc::Sender<StreamingDiarizeRequest>>,
}

#[async_trait]
impl RequestSink for GrpcRequestSink {
    async fn send(&mut self, request: StreamingDiarizeRequest) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(JuzuError::StreamClosed)?;
        // The receiver only goes away once the call has ended.
        tx.send(request).await.map_err(|_| JuzuError::StreamClosed)
    }

    async fn close_send(&mut self) -> Result<()> {
        if self.tx.take().is_some() {
            debug!("Half-closed StreamingDiarize call");
        }
        Ok(())
    }
}

enum Inbound {
    Pending(PendingCall),
    Open(Streaming<DiarizationResponse>),
    Finished,
}

/// Inbound half.
pub struct GrpcResponseSource {
    inbound: Inbound,
}

#[async_trait]
impl ResponseSource for GrpcResponseSource {
    async fn recv(&mut self) -> Result<Option<DiarizationResponse>> {
        loop {
            match &mut self.inbound {
                Inbound::Pending(call) => {
                    let result = call.await;
                    self.inbound = Inbound::Finished;
                    let streaming = result
                        .map_err(|status| JuzuError::OpenFailed(Box::new(status.into())))?
                        .into_inner();
                    debug!("StreamingDiarize call started");
                    self.inbound = Inbound::Open(streaming);
                }
                Inbound::Open(streaming) => {
                    let message = streaming.message().await;
                    if !matches!(message, Ok(Some(_))) {
                        self.inbound = Inbound::Finished;
                    }
                    return Ok(message?);
                }
                Inbound::Finished => return Ok(None),
            }
        }
    }
}
