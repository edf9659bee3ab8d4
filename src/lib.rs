//! Client for the juzu speaker diarization service.

pub mod client;
pub mod config;
pub mod error;
pub mod stream;
pub mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{JuzuError, Result};
pub use service_protos as proto;
pub use service_protos::{
    diarization_config::Encoding, DiarizationConfig, DiarizationResponse, DiarizationResult,
    ListModelsResponse, Model, Segment, VersionResponse,
};
