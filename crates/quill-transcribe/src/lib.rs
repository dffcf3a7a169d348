//! quill-transcribe
//!
//! Audio-to-text transcription via Amazon Transcribe.

pub mod error;
pub mod transcript;

pub use aws_sdk_transcribe::types::MediaFormat;

use std::time::Duration;

use aws_sdk_transcribe::types::{LanguageCode, Media, TranscriptionJobStatus};
use quill_core::capability::{BoxFuture, Transcriber};
use quill_core::error::TranscriptionError;
use quill_core::keys;
use quill_core::models::transcription::{AudioFormat, Transcription};
use quill_storage::objects;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::TranscribeError;
use crate::transcript::parse_transcript;

pub const DEFAULT_MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

const POLL_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);

/// [`Transcriber`] backed by Amazon Transcribe.
///
/// Audio is staged under `_transcribe/` in the configured bucket for the
/// duration of the job. The staged audio, the transcript JSON and the job
/// itself are deleted afterwards, whether or not the job succeeded.
pub struct AmazonTranscriber {
    transcribe: aws_sdk_transcribe::Client,
    s3: aws_sdk_s3::Client,
    bucket: String,
    language: Option<String>,
    max_audio_bytes: usize,
    max_wait: Duration,
}

impl AmazonTranscriber {
    pub fn new(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            transcribe: aws_sdk_transcribe::Client::new(config),
            s3: aws_sdk_s3::Client::new(config),
            bucket: bucket.into(),
            language: None,
            max_audio_bytes: DEFAULT_MAX_AUDIO_BYTES,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Fix the spoken language (e.g. `en-US`). Without one, the job
    /// identifies the language itself.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_max_audio_bytes(mut self, max_audio_bytes: usize) -> Self {
        self.max_audio_bytes = max_audio_bytes;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    async fn run(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<Transcription, TranscriptionError> {
        check_audio_size(audio.len(), self.max_audio_bytes)?;

        let job_name = format!("quill-{}", Uuid::new_v4());
        let input_key = keys::transcribe_input(&job_name, format.extension());
        let output_key = keys::transcribe_output(&job_name);

        let result = self.run_job(&job_name, &input_key, &output_key, audio, format).await;
        self.cleanup(&job_name, &input_key, &output_key).await;

        let parsed = result?;
        Ok(Transcription {
            text: parsed.text,
            confidence: parsed.confidence,
            language: parsed
                .language
                .or_else(|| self.language.clone())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn run_job(
        &self,
        job_name: &str,
        input_key: &str,
        output_key: &str,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<transcript::ParsedTranscript, TranscribeError> {
        objects::put_object(
            &self.s3,
            &self.bucket,
            input_key,
            audio.to_vec(),
            Some(format.content_type()),
        )
        .await?;

        let media_uri = format!("s3://{}/{input_key}", self.bucket);
        info!(job_name, media_uri, "starting transcription job");

        let mut request = self
            .transcribe
            .start_transcription_job()
            .transcription_job_name(job_name)
            .media(Media::builder().media_file_uri(&media_uri).build())
            .media_format(media_format_for(format))
            .output_bucket_name(&self.bucket)
            .output_key(output_key);
        request = match &self.language {
            Some(language) => request.language_code(LanguageCode::from(language.as_str())),
            None => request.identify_language(true),
        };
        request
            .send()
            .await
            .map_err(|e| TranscribeError::Api(e.into_service_error().to_string()))?;

        self.wait_for_job(job_name).await?;
        info!(job_name, "transcription complete, reading result");

        let body = objects::get_object(&self.s3, &self.bucket, output_key).await?;
        let json = String::from_utf8(body).map_err(|e| TranscribeError::Parse(e.to_string()))?;
        parse_transcript(&json)
    }

    async fn wait_for_job(&self, job_name: &str) -> Result<(), TranscribeError> {
        let deadline = Instant::now() + self.max_wait;
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let resp = self
                .transcribe
                .get_transcription_job()
                .transcription_job_name(job_name)
                .send()
                .await
                .map_err(|e| TranscribeError::Api(e.into_service_error().to_string()))?;

            let job = resp
                .transcription_job()
                .ok_or_else(|| TranscribeError::Api("no job in response".into()))?;

            match job.transcription_job_status() {
                Some(TranscriptionJobStatus::Completed) => return Ok(()),
                Some(TranscriptionJobStatus::Failed) => {
                    let reason = job.failure_reason().unwrap_or("unknown").to_string();
                    return Err(TranscribeError::JobFailed(reason));
                }
                _ if Instant::now() >= deadline => {
                    return Err(TranscribeError::Timeout(self.max_wait));
                }
                _ => continue,
            }
        }
    }

    async fn cleanup(&self, job_name: &str, input_key: &str, output_key: &str) {
        for key in [input_key, output_key] {
            if let Err(e) = objects::delete_object(&self.s3, &self.bucket, key).await {
                warn!(job_name, key, error = %e, "failed to delete transcription scratch object");
            }
        }
        if let Err(e) = self
            .transcribe
            .delete_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
        {
            warn!(job_name, error = %e.into_service_error(), "failed to delete transcription job");
        }
    }
}

impl Transcriber for AmazonTranscriber {
    fn transcribe<'a>(
        &'a self,
        audio: &'a [u8],
        format: AudioFormat,
    ) -> BoxFuture<'a, Result<Transcription, TranscriptionError>> {
        Box::pin(self.run(audio, format))
    }
}

pub fn check_audio_size(size: usize, limit: usize) -> Result<(), TranscriptionError> {
    if size == 0 {
        return Err(TranscriptionError::Failed("audio is empty".to_string()));
    }
    if size > limit {
        return Err(TranscriptionError::TooLarge { size, limit });
    }
    Ok(())
}

/// Map an accepted audio format to an Amazon Transcribe `MediaFormat`.
pub fn media_format_for(format: AudioFormat) -> MediaFormat {
    match format {
        AudioFormat::Wav => MediaFormat::Wav,
        AudioFormat::Mp3 => MediaFormat::Mp3,
        AudioFormat::M4a => MediaFormat::Mp4,
        AudioFormat::Webm => MediaFormat::Webm,
        AudioFormat::Flac => MediaFormat::Flac,
        AudioFormat::Ogg => MediaFormat::Ogg,
    }
}
