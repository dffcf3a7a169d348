use std::sync::Arc;

use quill_bedrock::ContentGeneratorAdapter;
use quill_bedrock::converse::ConverseBackend;
use quill_core::TemplateRegistry;
use quill_engine::{EngineConfig, RevisionEngine};
use quill_export::PdfEmitter;
use quill_export::weasyprint::WeasyPrintBackend;
use quill_server::{AppState, config};
use quill_storage::S3Uploader;
use quill_transcribe::AmazonTranscriber;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = config::load()?;
    let sdk_config = quill_storage::client::load_sdk_config(config.region.as_deref()).await;

    let registry = Arc::new(TemplateRegistry::with_builtin()?);

    let backend = ConverseBackend::from_config(&sdk_config, config.model_id.clone());
    let generator = ContentGeneratorAdapter::new(backend, registry.clone())
        .with_timeout(config.generation_timeout());

    let pdf_backend =
        WeasyPrintBackend::from_command_line(&config.pdf_command, config.pdf_timeout())
            .ok_or_else(|| eyre::eyre!("pdf_command is empty"))?;
    let emitter = PdfEmitter::new(Arc::new(pdf_backend)).with_page_size(config.page_size);

    let mut engine = RevisionEngine::new(
        registry,
        Arc::new(generator),
        emitter,
        EngineConfig {
            render_mode: config.render_mode,
        },
    );

    let uploader = match &config.bucket {
        Some(bucket) => {
            let transcriber = AmazonTranscriber::new(&sdk_config, bucket.clone())
                .with_language(config.transcribe_language.clone())
                .with_max_audio_bytes(config.max_audio_bytes);
            engine = engine.with_transcriber(Arc::new(transcriber));

            let client = quill_storage::client::build_client(&sdk_config);
            Some(S3Uploader::new(client, bucket.clone(), config.upload_prefix.clone()))
        }
        None => {
            tracing::warn!("no bucket configured; uploads and audio input are disabled");
            None
        }
    };

    let mut state = AppState::new(Arc::new(engine), config.max_audio_bytes);
    if let Some(uploader) = uploader {
        state = state.with_uploader(Arc::new(uploader));
    }
    let app = quill_server::router(state);

    if std::env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        tracing::info!(model_id = %config.model_id, "starting under lambda runtime");
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, model_id = %config.model_id, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
