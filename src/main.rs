mod app;
mod config;
mod form;
mod theme;
mod ui;
mod upload;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use form::{UploadForm, UploadOutcome};
use upload::{FileSelection, Uploader};

#[derive(Parser, Debug)]
#[command(name = "upform")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "A terminal form for uploading a single file to a remote endpoint")]
struct Args {
    /// Upload this file without the TUI and print the result as JSON
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Upload endpoint (overrides the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Directory the file browser starts in
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging (stderr, so --file JSON on stdout stays clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(dir) = args.dir {
        config.start_dir = Some(dir);
    }

    // Handle CLI-only upload
    if let Some(path) = args.file {
        let report = upload_once(&config, path).await?;
        println!("{}", serde_json::to_string(&report)?);
        return Ok(if report_succeeded(&report) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // Run TUI
    run_tui(config).await?;
    Ok(ExitCode::SUCCESS)
}

/// Select and upload one file, returning the JSON line printed by `--file`
async fn upload_once(config: &AppConfig, path: PathBuf) -> Result<serde_json::Value> {
    let uploader = Uploader::new(config.endpoint.clone())?;
    let mut form = UploadForm::new();

    form.select_file(FileSelection::from_path(path));
    form.submit_upload(&uploader).await;

    Ok(headless_report(&form))
}

fn headless_report(form: &UploadForm) -> serde_json::Value {
    let outcome = form.upload_status();
    let success = outcome.is_some_and(UploadOutcome::is_success);
    let message = outcome
        .map(UploadOutcome::message)
        .unwrap_or(upload::NO_FILE_MESSAGE);

    serde_json::json!({
        "status": if success { "success" } else { "error" },
        "message": message,
        "fileUrl": form.result_url(),
    })
}

fn report_succeeded(report: &serde_json::Value) -> bool {
    report["status"] == "success"
}

async fn run_tui(config: AppConfig) -> Result<()> {
    // Create app state before touching the terminal so config errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll off the runtime's worker so the upload task keeps making progress
        let ready = tokio::task::block_in_place(|| event::poll(std::time::Duration::from_millis(100)))?;
        if ready {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.status_message = Some(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Periodic refresh
        app.tick();
    }
}
