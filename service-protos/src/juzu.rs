//! Messages and stubs for package `cobaltspeech.juzu`.

/// The top-level message sent by the client for the `StreamingDiarize` call.
///
/// The first message of a call carries a `DiarizationConfig` only; every
/// following message carries non-empty `DiarizationAudio` only.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamingDiarizeRequest {
    #[prost(oneof = "streaming_diarize_request::Request", tags = "1, 2")]
    pub request: ::core::option::Option<streaming_diarize_request::Request>,
}

/// Nested message and enum types in `StreamingDiarizeRequest`.
pub mod streaming_diarize_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Request {
        #[prost(message, tag = "1")]
        Config(super::DiarizationConfig),
        #[prost(message, tag = "2")]
        Audio(super::DiarizationAudio),
    }
}

impl StreamingDiarizeRequest {
    /// Wraps a configuration as the handshake message of a call.
    pub fn config(config: DiarizationConfig) -> Self {
        Self {
            request: Some(streaming_diarize_request::Request::Config(config)),
        }
    }

    /// Wraps a chunk of audio bytes.
    pub fn audio(data: impl Into<Vec<u8>>) -> Self {
        Self {
            request: Some(streaming_diarize_request::Request::Audio(DiarizationAudio {
                data: data.into(),
            })),
        }
    }

    pub fn get_config(&self) -> Option<&DiarizationConfig> {
        match &self.request {
            Some(streaming_diarize_request::Request::Config(config)) => Some(config),
            _ => None,
        }
    }

    pub fn get_audio(&self) -> Option<&DiarizationAudio> {
        match &self.request {
            Some(streaming_diarize_request::Request::Audio(audio)) => Some(audio),
            _ => None,
        }
    }
}

/// Version information about the server and the diarization engine.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionResponse {
    /// Version of the diarization engine.
    #[prost(string, tag = "1")]
    pub juzu: ::prost::alloc::string::String,
    /// Version of the server handling these requests.
    #[prost(string, tag = "2")]
    pub server: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListModelsResponse {
    #[prost(message, repeated, tag = "1")]
    pub models: ::prost::alloc::vec::Vec<Model>,
}

/// Description of a diarization model available on the server.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Model {
    /// Identifier used in `DiarizationConfig::model_id`.
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub attributes: ::core::option::Option<ModelAttributes>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelAttributes {
    /// Audio sample rate the model expects.
    #[prost(uint32, tag = "1")]
    pub sample_rate: u32,
    #[prost(string, tag = "2")]
    pub segmentation_type: ::prost::alloc::string::String,
}

/// The message returned by the server for the `StreamingDiarize` call.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DiarizationResponse {
    #[prost(message, repeated, tag = "1")]
    pub results: ::prost::alloc::vec::Vec<DiarizationResult>,
}

/// Configuration for setting up a diarizer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DiarizationConfig {
    /// ID of the diarization model, as returned by `ListModels`.
    #[prost(string, tag = "1")]
    pub model_id: ::prost::alloc::string::String,
    /// Expected number of speakers, 0 when unknown.
    #[prost(uint32, tag = "2")]
    pub num_speakers: u32,
    #[prost(uint32, tag = "3")]
    pub sample_rate: u32,
    /// Encoding of the streamed audio. Container headers (WAV, FLAC) are sent
    /// once at the start of the stream, not in every chunk.
    #[prost(enumeration = "diarization_config::Encoding", tag = "4")]
    pub audio_encoding: i32,
    /// Recognition model used to attach transcripts to segments, if the
    /// server is set up with one.
    #[prost(string, tag = "5")]
    pub cubic_model_id: ::prost::alloc::string::String,
    #[prost(bool, tag = "6")]
    pub enable_raw_transcript: bool,
}

/// Nested message and enum types in `DiarizationConfig`.
pub mod diarization_config {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Encoding {
        /// Headerless 16-bit signed little endian mono PCM.
        RawLinear16 = 0,
        Wav = 1,
        Flac = 2,
    }

    impl Encoding {
        /// String value of the enum field names used in the ProtoBuf definition.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::RawLinear16 => "RAW_LINEAR16",
                Self::Wav => "WAV",
                Self::Flac => "FLAC",
            }
        }

        /// Creates an enum from field names used in the ProtoBuf definition.
        pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
            match value {
                "RAW_LINEAR16" => Some(Self::RawLinear16),
                "WAV" => Some(Self::Wav),
                "FLAC" => Some(Self::Flac),
                _ => None,
            }
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DiarizationAudio {
    #[prost(bytes = "vec", tag = "1")]
    pub data: ::prost::alloc::vec::Vec<u8>,
}

/// A diarization result corresponding to a portion of audio.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DiarizationResult {
    #[prost(message, repeated, tag = "1")]
    pub segments: ::prost::alloc::vec::Vec<Segment>,
    /// Labels used to identify speakers across `segments`.
    #[prost(string, repeated, tag = "2")]
    pub speaker_labels: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// Interim result that may still change as more audio is processed.
    #[prost(bool, tag = "3")]
    pub is_partial: bool,
}

/// A diarized segment of audio.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Segment {
    #[prost(string, tag = "1")]
    pub speaker_label: ::prost::alloc::string::String,
    /// Offset of the segment start from the beginning of the audio.
    #[prost(message, optional, tag = "2")]
    pub start_time: ::core::option::Option<::prost_types::Duration>,
    #[prost(message, optional, tag = "3")]
    pub end_time: ::core::option::Option<::prost_types::Duration>,
    #[prost(string, tag = "4")]
    pub transcript: ::prost::alloc::string::String,
}

pub const SERVICE_NAME: &str = "cobaltspeech.juzu.Juzu";

/// Client stub for the `Juzu` service.
pub mod juzu_client {
    use ::http::uri::PathAndQuery;
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct JuzuClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> JuzuClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::Body>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        /// Waits until the underlying channel can accept a new call.
        pub async fn ready(&mut self) -> Result<(), tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unavailable(format!("Service was not ready: {}", e.into()))
            })
        }

        pub async fn version(
            &mut self,
            request: impl tonic::IntoRequest<()>,
        ) -> std::result::Result<tonic::Response<super::VersionResponse>, tonic::Status> {
            self.ready().await?;
            let codec = tonic::codec::ProstCodec::default();
            let path = PathAndQuery::from_static("/cobaltspeech.juzu.Juzu/Version");
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn list_models(
            &mut self,
            request: impl tonic::IntoRequest<()>,
        ) -> std::result::Result<tonic::Response<super::ListModelsResponse>, tonic::Status>
        {
            self.ready().await?;
            let codec = tonic::codec::ProstCodec::default();
            let path = PathAndQuery::from_static("/cobaltspeech.juzu.Juzu/ListModels");
            self.inner.unary(request.into_request(), path, codec).await
        }

        pub async fn streaming_diarize(
            &mut self,
            request: impl tonic::IntoStreamingRequest<Message = super::StreamingDiarizeRequest>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::DiarizationResponse>>,
            tonic::Status,
        > {
            self.ready().await?;
            let codec = tonic::codec::ProstCodec::default();
            let path = PathAndQuery::from_static("/cobaltspeech.juzu.Juzu/StreamingDiarize");
            self.inner
                .streaming(request.into_streaming_request(), path, codec)
                .await
        }
    }
}

/// Server stub for the `Juzu` service.
pub mod juzu_server {
    use tonic::codegen::*;

    /// Business logic of a `Juzu` server.
    #[tonic::async_trait]
    pub trait Juzu: std::marker::Send + std::marker::Sync + 'static {
        async fn version(
            &self,
            request: tonic::Request<()>,
        ) -> std::result::Result<tonic::Response<super::VersionResponse>, tonic::Status>;

        async fn list_models(
            &self,
            request: tonic::Request<()>,
        ) -> std::result::Result<tonic::Response<super::ListModelsResponse>, tonic::Status>;

        /// Server streaming response type for the `streaming_diarize` method.
        type StreamingDiarizeStream: futures::Stream<
                Item = std::result::Result<super::DiarizationResponse, tonic::Status>,
            > + std::marker::Send
            + 'static;

        async fn streaming_diarize(
            &self,
            request: tonic::Request<tonic::Streaming<super::StreamingDiarizeRequest>>,
        ) -> std::result::Result<tonic::Response<Self::StreamingDiarizeStream>, tonic::Status>;
    }

    #[derive(Debug)]
    pub struct JuzuServer<T> {
        inner: Arc<T>,
    }

    impl<T> JuzuServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }

        pub fn from_arc(inner: Arc<T>) -> Self {
            Self { inner }
        }
    }

    impl<T, B> tonic::codegen::Service<http::Request<B>> for JuzuServer<T>
    where
        T: Juzu,
        B: Body + std::marker::Send + 'static,
        B::Error: Into<StdError> + std::marker::Send + 'static,
    {
        type Response = http::Response<tonic::body::Body>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(
            &mut self,
            _cx: &mut Context<'_>,
        ) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                "/cobaltspeech.juzu.Juzu/Version" => {
                    #[allow(non_camel_case_types)]
                    struct VersionSvc<T: Juzu>(pub Arc<T>);
                    impl<T: Juzu> tonic::server::UnaryService<()> for VersionSvc<T> {
                        type Response = super::VersionResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<()>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move { <T as Juzu>::version(&inner, request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = VersionSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/cobaltspeech.juzu.Juzu/ListModels" => {
                    #[allow(non_camel_case_types)]
                    struct ListModelsSvc<T: Juzu>(pub Arc<T>);
                    impl<T: Juzu> tonic::server::UnaryService<()> for ListModelsSvc<T> {
                        type Response = super::ListModelsResponse;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(&mut self, request: tonic::Request<()>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut =
                                async move { <T as Juzu>::list_models(&inner, request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = ListModelsSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/cobaltspeech.juzu.Juzu/StreamingDiarize" => {
                    #[allow(non_camel_case_types)]
                    struct StreamingDiarizeSvc<T: Juzu>(pub Arc<T>);
                    impl<T: Juzu> tonic::server::StreamingService<super::StreamingDiarizeRequest>
                        for StreamingDiarizeSvc<T>
                    {
                        type Response = super::DiarizationResponse;
                        type ResponseStream = T::StreamingDiarizeStream;
                        type Future =
                            BoxFuture<tonic::Response<Self::ResponseStream>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<
                                tonic::Streaming<super::StreamingDiarizeRequest>,
                            >,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as Juzu>::streaming_diarize(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = StreamingDiarizeSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        let res = grpc.streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    let mut response = http::Response::new(tonic::body::Body::default());
                    let headers = response.headers_mut();
                    headers.insert(
                        tonic::Status::GRPC_STATUS,
                        (tonic::Code::Unimplemented as i32).into(),
                    );
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        tonic::metadata::GRPC_CONTENT_TYPE,
                    );
                    Ok(response)
                }),
            }
        }
    }

    impl<T> Clone for JuzuServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }

    impl<T> tonic::server::NamedService for JuzuServer<T> {
        const NAME: &'static str = super::SERVICE_NAME;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_config_and_audio_are_distinct_variants() {
        let config = StreamingDiarizeRequest::config(DiarizationConfig {
            model_id: "1".to_string(),
            ..Default::default()
        });
        assert_eq!(config.get_config().map(|c| c.model_id.as_str()), Some("1"));
        assert!(config.get_audio().is_none());

        let audio = StreamingDiarizeRequest::audio(vec![1u8, 2, 3]);
        assert!(audio.get_config().is_none());
        assert_eq!(audio.get_audio().map(|a| a.data.len()), Some(3));
    }

    #[test]
    fn test_empty_result_entry_decodes_as_default() {
        // An absent entry on the wire is an empty length-delimited field.
        let response = DiarizationResponse {
            results: vec![DiarizationResult::default()],
        };
        let bytes = response.encode_to_vec();
        let decoded = DiarizationResponse::decode(bytes.as_slice()).unwrap();

        assert_eq!(decoded.results.len(), 1);
        assert!(decoded.results[0].segments.is_empty());
        assert!(decoded.results[0].speaker_labels.is_empty());
        assert!(!decoded.results[0].is_partial);
    }

    #[test]
    fn test_encoding_names() {
        use diarization_config::Encoding;

        assert_eq!(Encoding::Wav.as_str_name(), "WAV");
        assert_eq!(Encoding::from_str_name("FLAC"), Some(Encoding::Flac));
        assert_eq!(Encoding::from_str_name("MP3"), None);

        let mut config = DiarizationConfig::default();
        assert_eq!(config.audio_encoding(), Encoding::RawLinear16);
        config.set_audio_encoding(Encoding::Flac);
        assert_eq!(config.audio_encoding, 2);
    }
}
