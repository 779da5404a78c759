use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::blobs::{BlobStore, StoredResume};

/// S3/MinIO-backed resume store. One object per user under `resumes/<id>`;
/// the original filename rides along as object metadata so downloads can set
/// the `x-filename` header.
pub struct S3Blobs {
    client: S3Client,
    bucket: String,
}

impl S3Blobs {
    pub fn new(client: S3Client, bucket: String) -> Self {
        S3Blobs { client, bucket }
    }

    fn key(user_id: i64) -> String {
        format!("resumes/{user_id}")
    }
}

#[async_trait]
impl BlobStore for S3Blobs {
    async fn put(&self, user_id: i64, resume: StoredResume) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(Self::key(user_id))
            .body(ByteStream::from(resume.data))
            .content_type(&resume.content_type)
            .metadata("filename", &resume.filename)
            .send()
            .await
            .map_err(|e| anyhow!("S3 upload failed: {e}"))?;
        Ok(())
    }

    async fn get(&self, user_id: i64) -> Result<Option<StoredResume>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(Self::key(user_id))
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(anyhow!("S3 download failed: {service_err}"));
            }
        };

        let content_type = output
            .content_type()
            .unwrap_or("application/pdf")
            .to_string();
        let filename = output
            .metadata()
            .and_then(|m| m.get("filename"))
            .cloned()
            .unwrap_or_else(|| "resume.pdf".to_string());
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| anyhow!("S3 body read failed: {e}"))?
            .into_bytes();

        Ok(Some(StoredResume {
            filename,
            content_type,
            data,
        }))
    }
}
