//! The upload form: one selected file, one in-flight upload at most, and the
//! outcome of the latest attempt.

use crate::upload::{FileSelection, UploadError, UploadReceipt, Uploader};

/// Alert text after a successful upload
pub const SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Result of the most recent upload attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success(String),
    Failure(String),
}

impl UploadOutcome {
    pub fn message(&self) -> &str {
        match self {
            UploadOutcome::Success(m) | UploadOutcome::Failure(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    selected_file: Option<FileSelection>,
    is_uploading: bool,
    upload_status: Option<UploadOutcome>,
    result_url: Option<String>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file(&self) -> Option<&FileSelection> {
        self.selected_file.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn upload_status(&self) -> Option<&UploadOutcome> {
        self.upload_status.as_ref()
    }

    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    /// Whether the upload trigger is enabled
    pub fn can_submit(&self) -> bool {
        self.selected_file.is_some() && !self.is_uploading
    }

    /// Replace the current selection. Stale results are cleared so they never
    /// show next to a newly chosen file. `None` is ignored.
    pub fn select_file(&mut self, file: Option<FileSelection>) {
        let Some(file) = file else {
            return;
        };
        tracing::debug!("Selected {}", file.path().display());
        self.selected_file = Some(file);
        self.upload_status = None;
        self.result_url = None;
    }

    pub fn dismiss_status(&mut self) {
        self.upload_status = None;
    }

    /// Start an attempt: validates the selection and marks the form busy.
    ///
    /// Returns the file to send, or `None` when there is nothing to do: either
    /// no file is selected (a failure is recorded) or an upload is already in
    /// flight.
    pub fn begin_upload(&mut self) -> Option<FileSelection> {
        if self.is_uploading {
            return None;
        }

        let Some(file) = self.selected_file.clone() else {
            self.upload_status = Some(UploadOutcome::Failure(
                UploadError::NoFileSelected.user_message(),
            ));
            return None;
        };

        self.is_uploading = true;
        self.upload_status = None;
        self.result_url = None;
        Some(file)
    }

    /// Apply the result of the attempt started by [`begin_upload`](Self::begin_upload)
    pub fn finish_upload(&mut self, result: Result<UploadReceipt, UploadError>) {
        match result {
            Ok(receipt) => {
                self.upload_status = Some(UploadOutcome::Success(SUCCESS_MESSAGE.to_string()));
                self.result_url = receipt.file_url;
            }
            Err(e) => {
                if e.is_local() {
                    tracing::debug!("Upload not started: {}", e);
                } else {
                    tracing::warn!("Upload failed: {}", e);
                }
                self.upload_status = Some(UploadOutcome::Failure(e.user_message()));
                self.result_url = None;
            }
        }
        self.is_uploading = false;
    }

    /// Run one full attempt inline
    pub async fn submit_upload(&mut self, uploader: &Uploader) {
        let Some(file) = self.begin_upload() else {
            return;
        };
        let result = uploader.upload(&file).await;
        self.finish_upload(result);
    }
}
