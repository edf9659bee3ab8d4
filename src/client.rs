use crate::config::ClientConfig;
use crate::error::{JuzuError, Result};
use crate::stream::{self, ResponseHandler};
use crate::transport::GrpcStreamOpener;
use log::{debug, info};
use service_protos::juzu_client::JuzuClient;
use service_protos::{DiarizationConfig, DiarizationResponse, ListModelsResponse, VersionResponse};
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};

/// Client for a juzu diarization server.
///
/// Cloning is cheap and clones share one connection; all methods may be
/// called concurrently.
#[derive(Debug, Clone)]
pub struct Client {
    juzu: JuzuClient<Channel>,
    streaming_buffer_size: usize,
}

impl Client {
    /// Connects to the server at `addr` (`host:port`, or a full URI).
    ///
    /// The connection is established before returning, bounded by the
    /// configured connect timeout.
    pub async fn connect(addr: &str, config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let uri = if addr.contains("://") {
            addr.to_string()
        } else if config.insecure {
            format!("http://{addr}")
        } else {
            format!("https://{addr}")
        };

        let mut endpoint = Endpoint::from_shared(uri)
            .map_err(|e| JuzuError::InvalidConfig(format!("invalid server address '{addr}': {e}")))?
            .connect_timeout(config.connect_timeout)
            .http2_keep_alive_interval(config.keepalive_interval)
            .keep_alive_timeout(config.keepalive_timeout)
            .keep_alive_while_idle(true);

        if !config.insecure {
            endpoint = endpoint.tls_config(tls_config(&config))?;
        }

        info!("🔌 Connecting to juzu server at {}", addr);
        let channel = tokio::time::timeout(config.connect_timeout, endpoint.connect())
            .await
            .map_err(|_| JuzuError::ConnectTimeout {
                addr: addr.to_string(),
                timeout: config.connect_timeout,
            })??;
        debug!("Connected to {}", addr);

        Ok(Self::from_channel(channel, config.streaming_buffer_size))
    }

    /// Wraps an already established channel.
    pub fn from_channel(channel: Channel, streaming_buffer_size: usize) -> Self {
        Self {
            juzu: JuzuClient::new(channel),
            streaming_buffer_size,
        }
    }

    /// Queries the server for its version.
    pub async fn version(&self) -> Result<VersionResponse> {
        let mut juzu = self.juzu.clone();
        Ok(juzu.version(()).await?.into_inner())
    }

    /// Lists the diarization models available on the server.
    pub async fn list_models(&self) -> Result<ListModelsResponse> {
        let mut juzu = self.juzu.clone();
        Ok(juzu.list_models(()).await?.into_inner())
    }

    /// Diarizes `audio` over a bidirectional stream.
    ///
    /// `config` is sent first, then audio in chunks of the configured
    /// streaming buffer size. Every response from the server is passed to
    /// `handler` as it arrives. Returns after the last result has been
    /// handled, or with the first error either direction ran into.
    pub async fn streaming_diarize<R, H>(
        &self,
        config: DiarizationConfig,
        audio: R,
        handler: &mut H,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
        H: ResponseHandler + ?Sized,
    {
        let mut opener = GrpcStreamOpener::new(self.juzu.clone());
        stream::run(
            &mut opener,
            config,
            audio,
            handler,
            self.streaming_buffer_size,
        )
        .await
    }

    /// Like [`Client::streaming_diarize`], but delivers responses through a
    /// channel. The channel closes when the call ends; the handle yields the
    /// call's outcome.
    pub fn streaming_diarize_channel<R>(
        &self,
        config: DiarizationConfig,
        audio: R,
    ) -> (
        mpsc::UnboundedReceiver<DiarizationResponse>,
        JoinHandle<Result<()>>,
    )
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (mut tx, rx) = mpsc::unbounded_channel();
        let client = self.clone();
        let handle =
            tokio::spawn(async move { client.streaming_diarize(config, audio, &mut tx).await });
        (rx, handle)
    }
}

fn tls_config(config: &ClientConfig) -> ClientTlsConfig {
    let mut tls = ClientTlsConfig::new();
    tls = match &config.server_cert_pem {
        Some(pem) => tls.ca_certificate(Certificate::from_pem(pem)),
        None => tls.with_native_roots(),
    };
    if let Some(identity) = &config.client_identity {
        tls = tls.identity(Identity::from_pem(&identity.cert_pem, &identity.key_pem));
    }
    tls
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_invalid_address() {
        let config = ClientConfig::default().with_insecure();
        let err = Client::connect("not a uri", config).await.unwrap_err();
        assert!(matches!(err, JuzuError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let config = ClientConfig::default()
            .with_insecure()
            .with_connect_timeout(Duration::from_millis(200));
        assert!(Client::connect("wrong_localhost:2727", config).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_dialing() {
        let mut config = ClientConfig::default().with_insecure();
        config.streaming_buffer_size = 0;
        let err = Client::connect("localhost:2727", config).await.unwrap_err();
        assert!(matches!(err, JuzuError::InvalidConfig(_)));
    }
}
