use aws_sdk_s3::Client;
use quill_core::capability::{BoxFuture, Uploader};
use quill_core::error::UploadError;
use tracing::info;

use crate::objects;

/// Stores finished artifacts in one bucket, under an optional key prefix.
#[derive(Debug, Clone)]
pub struct S3Uploader {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Uploader {
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The full object key for a suggested key.
    pub fn object_key(&self, key: &str) -> String {
        join_key(&self.prefix, key)
    }
}

impl Uploader for S3Uploader {
    fn upload<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<String, UploadError>> {
        Box::pin(async move {
            let full_key = self.object_key(key);
            let size = body.len();
            objects::put_object(&self.client, &self.bucket, &full_key, body, Some(content_type))
                .await
                .map_err(|e| UploadError::Failed {
                    key: full_key.clone(),
                    reason: e.to_string(),
                })?;

            info!(bucket = %self.bucket, key = %full_key, size, "uploaded artifact");
            Ok(full_key)
        })
    }
}

/// Join a prefix and a key with exactly one `/` between them.
pub fn join_key(prefix: &str, key: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let key = key.trim_start_matches('/');
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}/{key}")
    }
}
