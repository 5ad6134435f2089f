use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Alert text when the server gives no usable error message
pub const FALLBACK_MESSAGE: &str = "Failed to upload file";

/// Alert text for a submit without a selection
pub const NO_FILE_MESSAGE: &str = "No file selected";

#[derive(Error, Debug)]
pub enum UploadError {
    /// Local validation: submit was triggered with no file chosen
    #[error("no file selected")]
    NoFileSelected,

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected upload ({status}){}", detail(.message))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
}

fn detail(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl UploadError {
    /// The message shown in the form's alert
    pub fn user_message(&self) -> String {
        match self {
            UploadError::NoFileSelected => NO_FILE_MESSAGE.to_string(),
            UploadError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// True for errors that never reached the network
    pub fn is_local(&self) -> bool {
        matches!(self, UploadError::NoFileSelected)
    }
}
