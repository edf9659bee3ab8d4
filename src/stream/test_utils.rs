//! Scripted stream halves for exercising the feeder, collector and
//! coordinator without a server.

use super::{RequestSink, ResponseSource, StreamOpener};
use crate::error::{JuzuError, Result};
use async_trait::async_trait;
use service_protos::{DiarizationResponse, DiarizationResult, Segment, StreamingDiarizeRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

pub(crate) fn network_error(message: &str) -> JuzuError {
    JuzuError::Status(tonic::Status::unavailable(message.to_string()))
}

pub(crate) fn two_speaker_response() -> DiarizationResponse {
    DiarizationResponse {
        results: vec![DiarizationResult {
            speaker_labels: vec!["0".to_string(), "1".to_string()],
            is_partial: false,
            segments: vec![
                Segment {
                    speaker_label: "0".to_string(),
                    transcript: "Hello".to_string(),
                    ..Default::default()
                },
                Segment {
                    speaker_label: "1".to_string(),
                    transcript: "Goodbye".to_string(),
                    ..Default::default()
                },
            ],
        }],
    }
}

/// What a [`ScriptedSink`] observed, shared with the test body.
#[derive(Clone, Default)]
pub(crate) struct SinkLog {
    requests: Arc<Mutex<Vec<StreamingDiarizeRequest>>>,
    close_calls: Arc<Mutex<usize>>,
}

impl SinkLog {
    pub fn requests(&self) -> Vec<StreamingDiarizeRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn audio_chunks(&self) -> Vec<Vec<u8>> {
        self.requests()
            .iter()
            .filter_map(|r| r.get_audio().map(|a| a.data.clone()))
            .collect()
    }

    pub fn close_calls(&self) -> usize {
        *self.close_calls.lock().unwrap()
    }
}

/// Records every request; can be told to fail a given send or the half-close.
pub(crate) struct ScriptedSink {
    log: SinkLog,
    sends: usize,
    fail_send_at: Option<usize>,
    peer_closed_at: Option<usize>,
    stall_send_at: Option<usize>,
    fail_close: bool,
    half_closed: watch::Sender<bool>,
}

impl ScriptedSink {
    pub fn new() -> (Self, SinkLog, watch::Receiver<bool>) {
        let log = SinkLog::default();
        let (half_closed, closed_rx) = watch::channel(false);
        let sink = Self {
            log: log.clone(),
            sends: 0,
            fail_send_at: None,
            peer_closed_at: None,
            stall_send_at: None,
            fail_close: false,
            half_closed,
        };
        (sink, log, closed_rx)
    }

    /// The send with this zero-based index fails with a network error.
    pub fn fail_send_at(mut self, index: usize) -> Self {
        self.fail_send_at = Some(index);
        self
    }

    /// The send with this index reports that the peer has ended the call.
    pub fn peer_closed_at(mut self, index: usize) -> Self {
        self.peer_closed_at = Some(index);
        self
    }

    /// The send with this index never completes, like a peer that stopped
    /// reading.
    pub fn stall_send_at(mut self, index: usize) -> Self {
        self.stall_send_at = Some(index);
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

#[async_trait]
impl RequestSink for ScriptedSink {
    async fn send(&mut self, request: StreamingDiarizeRequest) -> Result<()> {
        let index = self.sends;
        self.sends += 1;
        if self.fail_send_at == Some(index) {
            return Err(network_error("network is unreachable"));
        }
        if self.peer_closed_at == Some(index) {
            return Err(JuzuError::StreamClosed);
        }
        if self.stall_send_at == Some(index) {
            std::future::pending::<()>().await;
        }
        self.log.requests.lock().unwrap().push(request);
        Ok(())
    }

    async fn close_send(&mut self) -> Result<()> {
        *self.log.close_calls.lock().unwrap() += 1;
        if self.fail_close {
            return Err(network_error("half-close failed"));
        }
        let _ = self.half_closed.send(true);
        Ok(())
    }
}

pub(crate) enum Step {
    Respond(DiarizationResponse),
    Fail(&'static str),
    /// The call could not be started; reported on the first receive.
    NotStarted(&'static str),
}

/// Plays back a fixed script, then reports end of stream.
pub(crate) struct ScriptedSource {
    steps: VecDeque<Step>,
    wait_for_half_close: Option<watch::Receiver<bool>>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            wait_for_half_close: None,
        }
    }

    /// Like a real server: nothing is returned until the client half-closes.
    /// If the outbound half is dropped without closing, the call fails.
    pub fn after_half_close(mut self, closed: watch::Receiver<bool>) -> Self {
        self.wait_for_half_close = Some(closed);
        self
    }
}

#[async_trait]
impl ResponseSource for ScriptedSource {
    async fn recv(&mut self) -> Result<Option<DiarizationResponse>> {
        if let Some(mut closed) = self.wait_for_half_close.take() {
            if closed.wait_for(|c| *c).await.is_err() {
                return Err(network_error("connection reset"));
            }
        }
        match self.steps.pop_front() {
            Some(Step::Respond(response)) => Ok(Some(response)),
            Some(Step::Fail(message)) => Err(network_error(message)),
            Some(Step::NotStarted(message)) => {
                Err(JuzuError::OpenFailed(Box::new(network_error(message))))
            }
            None => Ok(None),
        }
    }
}

pub(crate) struct ScriptedOpener {
    halves: Option<(ScriptedSink, ScriptedSource)>,
    open_error: Option<&'static str>,
}

impl ScriptedOpener {
    pub fn new(sink: ScriptedSink, source: ScriptedSource) -> Self {
        Self {
            halves: Some((sink, source)),
            open_error: None,
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            halves: None,
            open_error: Some(message),
        }
    }
}

#[async_trait]
impl StreamOpener for ScriptedOpener {
    type Sink = ScriptedSink;
    type Source = ScriptedSource;

    async fn open(&mut self) -> Result<(ScriptedSink, ScriptedSource)> {
        if let Some(message) = self.open_error {
            return Err(network_error(message));
        }
        self.halves
            .take()
            .ok_or_else(|| JuzuError::Task("stream already opened".to_string()))
    }
}
