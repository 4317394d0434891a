use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use grant_checklist_core::{Config, DocumentLocation};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "grant-checklist")]
#[command(about = "Review a grant's application requirements with a chat assistant", version)]
struct Cli {
    /// Document to open: `document[?folder=name][#tab]`
    location: String,

    /// Backend base URL (overrides config file and GRANT_CHECKLIST_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Where to write logs
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match cli.log_file {
        Some(path) => path,
        None => logging::default_log_path()?,
    };
    logging::init(&log_path)?;

    let location = DocumentLocation::parse(&cli.location)
        .ok_or_else(|| anyhow!("'{}' does not name a document", cli.location))?;

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("using default config: {}", e);
        Config::new()
    });
    config.apply_overrides(cli.api_url, None);

    tracing::info!(
        document = %location.document,
        folder = location.effective_folder(),
        api = %config.api_base_url(),
        "starting grant checklist"
    );

    let mut app = App::new(&config)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app, location).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, location: DocumentLocation) -> Result<()> {
    let mut events = tui::EventHandler::new();
    app.open_location(location);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event);
        }
        app.poll_tasks().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_location_and_flags() {
        let cli = Cli::try_parse_from([
            "grant-checklist",
            "doc-1#deadlines",
            "--api-url",
            "http://localhost:9000",
        ])
        .unwrap();
        assert_eq!(cli.location, "doc-1#deadlines");
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_cli_requires_location() {
        assert!(Cli::try_parse_from(["grant-checklist"]).is_err());
    }

    #[test]
    fn test_log_file_is_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("checklist.log");
        // A global subscriber may already be set by another test; the file
        // is created before that matters
        let _ = logging::init(&path);
        assert!(path.exists());
    }
}
