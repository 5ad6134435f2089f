use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::form::{UploadForm, UploadOutcome};
use crate::theme::Theme;
use crate::upload::{FileSelection, UploadError, UploadReceipt, Uploader};

/// How long info-line messages stay visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

pub const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

type UploadResult = Result<UploadReceipt, UploadError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    FileBrowser,
    Help,
}

#[derive(Debug, Clone)]
pub struct BrowserEntry {
    pub name: String,
    pub is_dir: bool,
    pub path: PathBuf,
    pub size: Option<u64>,
}

pub struct App {
    pub popup: Popup,
    pub form: UploadForm,
    pub config: AppConfig,
    pub theme: Theme,
    uploader: Uploader,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // File browser state
    pub browser_path: PathBuf,
    pub browser_entries: Vec<BrowserEntry>,
    pub browser_selected: usize,

    // Background upload: one task per submit, result comes back here
    upload_tx: mpsc::UnboundedSender<UploadResult>,
    upload_rx: mpsc::UnboundedReceiver<UploadResult>,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let uploader = Uploader::new(config.endpoint.clone())?;
        let theme = Theme::from_config(&config.theme);
        let browser_path = config.browser_start();
        let (upload_tx, upload_rx) = mpsc::unbounded_channel();

        tracing::info!("Uploading to {}", uploader.endpoint());

        Ok(Self {
            popup: Popup::None,
            form: UploadForm::new(),
            config,
            theme,
            uploader,

            status_message: None,
            status_message_time: None,

            browser_path,
            browser_entries: Vec::new(),
            browser_selected: 0,

            upload_tx,
            upload_rx,
            spinner_frame: 0,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.uploader.endpoint()
    }

    /// Set a status message (auto-clears after a few seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::FileBrowser => self.handle_browser_key(key),
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::None => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('o') | KeyCode::Char('f') => self.start_file_browser(),
            KeyCode::Char('u') | KeyCode::Enter => self.submit_upload(),
            KeyCode::Char('x') | KeyCode::Esc => self.form.dismiss_status(),
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    /// Start an upload of the current selection in the background.
    ///
    /// Ignored while another upload is running; records a failure when
    /// nothing is selected.
    pub fn submit_upload(&mut self) {
        if self.form.is_uploading() {
            self.set_status("Upload already in progress");
            return;
        }

        let Some(file) = self.form.begin_upload() else {
            return;
        };

        self.spinner_frame = 0;
        let uploader = self.uploader.clone();
        let tx = self.upload_tx.clone();
        tokio::spawn(async move {
            let result = uploader.upload(&file).await;
            // Receiver only goes away on shutdown
            let _ = tx.send(result);
        });
    }

    fn apply_upload_result(&mut self, result: UploadResult) {
        self.form.finish_upload(result);

        if self.config.notifications {
            if let Some(outcome) = self.form.upload_status() {
                let body = match (outcome, self.form.result_url()) {
                    (UploadOutcome::Success(_), Some(url)) => url.to_string(),
                    _ => outcome.message().to_string(),
                };
                if let Err(e) = notify("upform", &body) {
                    tracing::warn!("Could not show notification: {}", e);
                }
            }
        }
    }

    /// Periodic work: collect finished uploads, advance the spinner, expire messages
    pub fn tick(&mut self) {
        while let Ok(result) = self.upload_rx.try_recv() {
            self.apply_upload_result(result);
        }

        if self.form.is_uploading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }

        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn start_file_browser(&mut self) {
        self.popup = Popup::FileBrowser;
        self.browser_selected = 0;
        self.refresh_browser();
    }

    fn set_browser_path(&mut self, path: PathBuf) {
        self.browser_path = path;
        self.browser_selected = 0;
        self.refresh_browser();
    }

    fn refresh_browser(&mut self) {
        self.browser_entries.clear();

        // Add parent directory entry if not at root
        if let Some(parent) = self.browser_path.parent() {
            self.browser_entries.push(BrowserEntry {
                name: "..".to_string(),
                is_dir: true,
                path: parent.to_path_buf(),
                size: None,
            });
        }

        match read_entries(&self.browser_path, self.config.show_hidden) {
            Ok(entries) => self.browser_entries.extend(entries),
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", self.browser_path.display(), e);
                self.set_status(format!("Cannot read directory: {}", e));
            }
        }

        if self.browser_selected >= self.browser_entries.len() {
            self.browser_selected = 0;
        }
    }

    fn handle_browser_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.popup = Popup::None;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.browser_entries.is_empty() {
                    self.browser_selected = (self.browser_selected + 1) % self.browser_entries.len();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.browser_entries.is_empty() {
                    self.browser_selected = self
                        .browser_selected
                        .checked_sub(1)
                        .unwrap_or(self.browser_entries.len() - 1);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(entry) = self.browser_entries.get(self.browser_selected).cloned() {
                    if entry.is_dir {
                        self.set_browser_path(entry.path);
                    } else {
                        self.form.select_file(FileSelection::from_path(entry.path));
                        self.popup = Popup::None;
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(parent) = self.browser_path.parent() {
                    let parent = parent.to_path_buf();
                    self.set_browser_path(parent);
                }
            }
            KeyCode::Char('~') => {
                let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
                self.set_browser_path(home);
            }
            _ => {}
        }
        Ok(())
    }

    #[cfg(test)]
    async fn wait_for_upload(&mut self) {
        if let Some(result) = self.upload_rx.recv().await {
            self.apply_upload_result(result);
        }
    }
}

/// Directories first, then files, each sorted case-insensitively
fn read_entries(dir: &Path, show_hidden: bool) -> std::io::Result<Vec<BrowserEntry>> {
    let mut dirs: Vec<BrowserEntry> = Vec::new();
    let mut files: Vec<BrowserEntry> = Vec::new();

    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if !show_hidden && name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            dirs.push(BrowserEntry {
                name,
                is_dir: true,
                path,
                size: None,
            });
        } else {
            let size = entry.metadata().ok().map(|m| m.len());
            files.push(BrowserEntry {
                name,
                is_dir: false,
                path,
                size,
            });
        }
    }

    dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    dirs.extend(files);
    Ok(dirs)
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("document-send")
        .show()?;
    Ok(())
}
