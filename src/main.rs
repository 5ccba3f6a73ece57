//! Lead Wizard - terminal lead-capture forms
//!
//! A Ratatui-based TUI that walks a visitor through either an institutional
//! partnership inquiry or a program application with a price breakdown,
//! keeps drafts between sessions, and hands finished submissions to a sink.

mod app;
mod config;
mod draft;
mod gateway;
mod platform;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use config::WizardConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use draft::{DraftPersistence, DraftStore, FileDraftStore, MemoryDraftStore};
use gateway::{JsonlFileSink, LogSink, SubmissionSink};
use ratatui::{backend::CrosstermBackend, Terminal};
use rust_decimal::Decimal;
use state::{apply, partnership, Offer, Wizard};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Storage key for the partnership inquiry draft
const PARTNERSHIP_DRAFT_KEY: &str = "partnership_inquiry_draft";

/// Terminal lead-capture wizards
#[derive(Debug, Parser)]
#[command(name = "lead-wizard", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Print submissions on exit instead of appending them to the outbox
    #[arg(long, global = true, default_value_t = false)]
    log_only: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Institutional partnership inquiry (default)
    Partnership,
    /// Apply, review, and pay for one offer
    Apply {
        /// Offer to apply for, as JSON; the built-in bootcamp otherwise
        #[arg(long)]
        offer: Option<PathBuf>,
    },
    /// Update the config file and print the result
    Config {
        /// VAT rate, e.g. 0.19
        #[arg(long)]
        tax_rate: Option<Decimal>,
        /// Require a well-formed email address
        #[arg(long)]
        strict_email: Option<bool>,
        /// Keep partnership drafts after a successful submission
        #[arg(long)]
        keep_draft_after_submit: Option<bool>,
        /// Outbox file for submissions
        #[arg(long)]
        outbox: Option<PathBuf>,
        /// Directory for drafts
        #[arg(long)]
        draft_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; keep the default quiet so the TUI is not overdrawn
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_wizard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = WizardConfig::load().context("reading config")?;

    let wizard = match cli.command {
        Some(Command::Config {
            tax_rate,
            strict_email,
            keep_draft_after_submit,
            outbox,
            draft_dir,
        }) => {
            config.tax_rate = tax_rate.or(config.tax_rate);
            config.strict_email = strict_email.or(config.strict_email);
            config.keep_draft_after_submit =
                keep_draft_after_submit.or(config.keep_draft_after_submit);
            config.outbox_path = outbox.or(config.outbox_path);
            config.draft_dir = draft_dir.or(config.draft_dir);
            config.save().context("writing config")?;
            if let Some(path) = WizardConfig::config_path() {
                println!("{}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }
        Some(Command::Apply { offer }) => {
            let offer = offer.as_deref().map(Offer::from_file).transpose()?;
            Wizard::new(apply::schema(config.email_check()), offer, None)
        }
        Some(Command::Partnership) | None => {
            let mut schema = partnership::schema(config.email_check());
            schema.policy.clear_on_submit = config.clear_draft_on_submit();
            let drafts = DraftPersistence::new(draft_store(&config), PARTNERSHIP_DRAFT_KEY);
            Wizard::new(schema, None, Some(drafts))
        }
    }
    .with_tax_rate(config.tax_rate());

    let log_sink = Arc::new(LogSink::default());
    let sink: Arc<dyn SubmissionSink> = match config.outbox_path() {
        Some(path) if !cli.log_only => {
            let outbox = JsonlFileSink::new(path);
            tracing::info!(path = %outbox.path().display(), "appending submissions to outbox");
            Arc::new(outbox)
        }
        _ => log_sink.clone(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(wizard, sink);
    let result = run_app(&mut terminal, &mut app).await;
    app.finish_delivery().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Records held by the log sink are printed only once the TUI is gone
    for json in log_sink.take_delivered() {
        println!("{json}");
    }

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Draft backend: configured dir, the platform data dir, or memory only
fn draft_store(config: &WizardConfig) -> Arc<dyn DraftStore> {
    match config.draft_dir.clone() {
        Some(dir) => Arc::new(FileDraftStore::new(dir)),
        None => match FileDraftStore::in_data_dir() {
            Some(store) => Arc::new(store),
            None => {
                tracing::warn!("no data directory; drafts last for this session only");
                Arc::new(MemoryDraftStore::new())
            }
        },
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.poll_submission();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll faster while a delivery is in flight
        let poll_duration = if app.is_delivering() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // Ctrl+C always leaves, even with a dialog open
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }
                app.handle_key(key);
            }
        }

        // Let the delivery task make progress between frames
        tokio::task::yield_now().await;

        if app.should_quit() {
            return Ok(());
        }
    }
}
