//! # Service Protos
//!
//! Protobuf messages and gRPC stubs for the `cobaltspeech.juzu.Juzu` service.
//! The schema lives in `proto/juzu.proto`; the types here are declared with
//! `prost` derives so the crate builds without `protoc`.

pub mod juzu;

// Re-export common types for convenience
pub use juzu::*;
