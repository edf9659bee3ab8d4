use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use juzu::config::{self, TlsFiles, DEFAULT_CONNECT_TIMEOUT, DEFAULT_STREAMING_BUFFER_SIZE};
use juzu::{Client, ClientConfig, DiarizationConfig, DiarizationResponse, Encoding, Segment};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncRead;

#[derive(Parser, Debug)]
#[command(name = "juzu")]
#[command(about = "Command line client for the juzu speaker diarization server")]
#[command(long_about = "
Command line client for the juzu speaker diarization server.

EXAMPLES:
  # Show server and engine versions
  juzu --server localhost:2727 --insecure version

  # List the diarization models the server offers
  juzu models

  # Diarize a WAV file with model 1, expecting two speakers
  juzu diarize --model 1 --num-speakers 2 --encoding wav meeting.wav

  # Diarize raw PCM piped from another program
  sox input.flac -t raw -r 16000 -e signed -b 16 - | juzu diarize --model 1 -
")]
struct Args {
    /// Address of the juzu server (host:port or URI)
    #[arg(long, env = "JUZU_SERVER", default_value = "localhost:2727")]
    server: String,

    /// Connect without TLS
    #[arg(long)]
    insecure: bool,

    /// PEM root certificate used to verify the server
    #[arg(long)]
    server_cert: Option<PathBuf>,

    /// PEM client certificate for mutual TLS
    #[arg(long, requires = "client_key")]
    client_cert: Option<PathBuf>,

    /// PEM private key for the client certificate
    #[arg(long, requires = "client_cert")]
    client_key: Option<PathBuf>,

    /// Bytes of audio sent per streaming request
    #[arg(long, default_value_t = DEFAULT_STREAMING_BUFFER_SIZE)]
    buffer_size: usize,

    /// Connect timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_millis() as u64)]
    connect_timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the server and engine versions
    Version,
    /// List available diarization models
    Models,
    /// Stream audio to the server and print diarization results
    Diarize(DiarizeArgs),
}

#[derive(ClapArgs, Debug)]
struct DiarizeArgs {
    /// Diarization model ID
    #[arg(long)]
    model: String,

    /// Expected number of speakers (0 if unknown)
    #[arg(long, default_value = "0")]
    num_speakers: u32,

    /// Sample rate of the audio in Hz
    #[arg(long, default_value = "16000")]
    sample_rate: u32,

    /// Audio encoding: raw_linear16, wav or flac
    #[arg(long, default_value = "raw_linear16", value_parser = parse_encoding)]
    encoding: Encoding,

    /// Recognition model used to transcribe segments
    #[arg(long)]
    cubic_model: Option<String>,

    /// Include raw transcripts in the results
    #[arg(long)]
    raw_transcript: bool,

    /// Audio file to diarize, or - for stdin
    audio: PathBuf,
}

fn parse_encoding(value: &str) -> Result<Encoding, String> {
    Encoding::from_str_name(&value.to_ascii_uppercase())
        .ok_or_else(|| format!("unknown encoding '{value}'"))
}

impl Args {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::default()
            .with_streaming_buffer_size(self.buffer_size)?
            .with_connect_timeout(Duration::from_millis(self.connect_timeout));
        if self.insecure {
            config = config.with_insecure();
        }
        let files = TlsFiles {
            server_cert: self.server_cert.as_deref(),
            client_cert: self.client_cert.as_deref(),
            client_key: self.client_key.as_deref(),
        };
        Ok(files.apply(config)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_env();
    env_logger::init();

    let args = Args::parse();
    log::debug!("Starting with args: {:?}", args);

    let client = Client::connect(&args.server, args.client_config()?)
        .await
        .with_context(|| format!("failed to connect to {}", args.server))?;

    match args.command {
        Command::Version => {
            let version = client.version().await?;
            println!("juzu:   {}", version.juzu);
            println!("server: {}", version.server);
        }
        Command::Models => {
            let models = client.list_models().await?;
            if models.models.is_empty() {
                println!("No models available");
            }
            for model in models.models {
                match model.attributes {
                    Some(attrs) => println!(
                        "{}\t{}\t{} Hz\t{}",
                        model.id, model.name, attrs.sample_rate, attrs.segmentation_type
                    ),
                    None => println!("{}\t{}", model.id, model.name),
                }
            }
        }
        Command::Diarize(diarize) => run_diarize(&client, diarize).await?,
    }

    Ok(())
}

async fn run_diarize(client: &Client, args: DiarizeArgs) -> Result<()> {
    let mut config = DiarizationConfig {
        model_id: args.model,
        num_speakers: args.num_speakers,
        sample_rate: args.sample_rate,
        cubic_model_id: args.cubic_model.unwrap_or_default(),
        enable_raw_transcript: args.raw_transcript,
        ..Default::default()
    };
    config.set_audio_encoding(args.encoding);

    let audio: Box<dyn AsyncRead + Unpin + Send> = if args.audio.as_os_str() == "-" {
        Box::new(tokio::io::stdin())
    } else {
        let file = tokio::fs::File::open(&args.audio)
            .await
            .with_context(|| format!("failed to open {}", args.audio.display()))?;
        Box::new(file)
    };

    let mut handler = |response: DiarizationResponse| print_response(&response);
    client
        .streaming_diarize(config, audio, &mut handler)
        .await
        .context("diarization failed")?;

    log::info!("✅ Diarization complete");
    Ok(())
}

fn print_response(response: &DiarizationResponse) {
    for result in &response.results {
        let kind = if result.is_partial { "partial" } else { "final" };
        println!("[{}] speakers: {}", kind, result.speaker_labels.join(", "));
        for segment in &result.segments {
            print_segment(segment);
        }
    }
}

fn print_segment(segment: &Segment) {
    let start = seconds(segment.start_time.as_ref());
    let end = seconds(segment.end_time.as_ref());
    if segment.transcript.is_empty() {
        println!("  {:>8.2}s - {:>8.2}s  {}", start, end, segment.speaker_label);
    } else {
        println!(
            "  {:>8.2}s - {:>8.2}s  {}: {}",
            start, end, segment.speaker_label, segment.transcript
        );
    }
}

fn seconds(duration: Option<&prost_types::Duration>) -> f64 {
    duration.map_or(0.0, |d| d.seconds as f64 + d.nanos as f64 / 1e9)
}
