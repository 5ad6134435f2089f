use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;

use super::{FileSelection, UploadError};

/// Endpoint used when neither the config file nor the CLI sets one
pub const DEFAULT_ENDPOINT: &str = "https://derma-ia-backend.vercel.app/upload";

/// Name of the multipart part carrying the file
pub const FILE_FIELD: &str = "file";

/// What a successful upload reports back
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    #[serde(rename = "fileUrl")]
    pub file_url: Option<String>,
}

/// Sends one file per call as `multipart/form-data` to a fixed endpoint.
///
/// No retries and no timeout beyond the client defaults; every request runs
/// to completion.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: reqwest::Client,
    endpoint: String,
}

impl Uploader {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("upform/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn upload(&self, file: &FileSelection) -> Result<UploadReceipt, UploadError> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|source| UploadError::Read {
                path: file.path().to_path_buf(),
                source,
            })?;

        tracing::info!(
            "Uploading {} ({} bytes, {}) to {}",
            file.name(),
            bytes.len(),
            file.mime(),
            self.endpoint
        );

        let part = multipart::Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(file.mime())?;
        let form = multipart::Form::new().part(FILE_FIELD, part);

        // reqwest sets the multipart/form-data content type and boundary itself
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!("Upload of {} rejected with HTTP {}", file.name(), status);
            return Err(UploadError::Rejected { status, message });
        }

        let receipt = parse_receipt(&body);
        match &receipt.file_url {
            Some(url) => tracing::info!("Uploaded {} -> {}", file.name(), url),
            None => tracing::warn!("Uploaded {} but response carried no fileUrl", file.name()),
        }
        Ok(receipt)
    }
}

/// A 2xx body without a usable `fileUrl` still counts as a success
fn parse_receipt(body: &[u8]) -> UploadReceipt {
    serde_json::from_slice(body).unwrap_or_default()
}

/// Pull the `error` string out of a JSON failure body, if there is one
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::testing::MockEndpoint;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::io::Write;

    fn temp_file(name: &str, content: &[u8]) -> (tempfile::TempDir, FileSelection) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::File::create(&path).unwrap().write_all(content).unwrap();
        let selection = FileSelection::from_path(path).unwrap();
        (dir, selection)
    }

    #[test]
    fn test_parse_receipt() {
        let receipt = parse_receipt(br#"{"fileUrl":"https://x/y","key":"y"}"#);
        assert_eq!(receipt.file_url.as_deref(), Some("https://x/y"));

        assert_eq!(parse_receipt(b"").file_url, None);
        assert_eq!(parse_receipt(b"<html>ok</html>").file_url, None);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(br#"{"error":"too large"}"#).as_deref(), Some("too large"));
        assert_eq!(error_message(br#"{"error":""}"#), None);
        assert_eq!(error_message(br#"{"error":{"code":1}}"#), None);
        assert_eq!(error_message(b"Bad Gateway"), None);
        assert_eq!(error_message(b""), None);
    }

    #[tokio::test]
    async fn test_upload_sends_single_file_part() {
        let endpoint = MockEndpoint::spawn(
            StatusCode::OK,
            Some(json!({ "fileUrl": "https://cdn/photo.png" })),
        )
        .await;
        let (_dir, selection) = temp_file("photo.png", b"\x89PNG fake");

        let uploader = Uploader::new(endpoint.url.clone()).unwrap();
        let receipt = uploader.upload(&selection).await.unwrap();
        assert_eq!(receipt.file_url.as_deref(), Some("https://cdn/photo.png"));

        let parts = endpoint.parts().await;
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, FILE_FIELD);
        assert_eq!(parts[0].file_name.as_deref(), Some("photo.png"));
        assert_eq!(parts[0].content_type.as_deref(), Some("image/png"));
        assert_eq!(parts[0].bytes, b"\x89PNG fake");
    }

    #[tokio::test]
    async fn test_upload_rejected_with_server_message() {
        let endpoint =
            MockEndpoint::spawn(StatusCode::PAYLOAD_TOO_LARGE, Some(json!({ "error": "too large" })))
                .await;
        let (_dir, selection) = temp_file("big.bin", b"data");

        let uploader = Uploader::new(endpoint.url.clone()).unwrap();
        let err = uploader.upload(&selection).await.unwrap_err();
        match &err {
            UploadError::Rejected { status, message } => {
                assert_eq!(status.as_u16(), 413);
                assert_eq!(message.as_deref(), Some("too large"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), "too large");
    }

    #[tokio::test]
    async fn test_upload_rejected_without_body() {
        let endpoint = MockEndpoint::spawn(StatusCode::INTERNAL_SERVER_ERROR, None).await;
        let (_dir, selection) = temp_file("a.txt", b"hello");

        let uploader = Uploader::new(endpoint.url.clone()).unwrap();
        let err = uploader.upload(&selection).await.unwrap_err();
        assert!(matches!(err, UploadError::Rejected { message: None, .. }));
        assert_eq!(err.user_message(), crate::upload::FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_upload_missing_file_never_hits_network() {
        let endpoint = MockEndpoint::spawn(StatusCode::OK, None).await;
        let dir = tempfile::tempdir().unwrap();
        let selection = FileSelection::from_path(dir.path().join("gone.txt")).unwrap();

        let uploader = Uploader::new(endpoint.url.clone()).unwrap();
        let err = uploader.upload(&selection).await.unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));
        assert_eq!(endpoint.hits(), 0);
    }

    #[tokio::test]
    async fn test_upload_unreachable_endpoint() {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (_dir, selection) = temp_file("a.txt", b"hello");
        let uploader = Uploader::new(format!("http://{addr}/upload")).unwrap();
        let err = uploader.upload(&selection).await.unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)));
        assert_eq!(err.user_message(), crate::upload::FALLBACK_MESSAGE);
    }
}
