//! RoundPen configurator command line front-end.
//!
//! Loads one still frame, replays an input event script against a session and
//! logs the panel as it changes.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use roundpen_config::MarkerSession;
use roundpen_config::config::{AppConfig, LogLevel, UserPreferences};
use roundpen_config::data::ImageFileSource;
use roundpen_config::handlers::handle_event;
use roundpen_config::input::{InputSource, ScriptedInput};
use roundpen_config::view::{LogSink, RenderSink, SessionView};

#[derive(Parser, Debug)]
#[command(
    name = "roundpen-config",
    version,
    about = "Configure background and marker colors for the RoundPen tracker"
)]
struct Cli {
    /// Image file holding the frame to configure (opens a file dialog when omitted)
    frame: Option<PathBuf>,
    /// Marker file to write
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Skip the region-of-interest step
    #[arg(long, action = ArgAction::SetTrue)]
    no_region: bool,
    /// Skip the background step
    #[arg(long, action = ArgAction::SetTrue)]
    no_background: bool,
    /// Configuration file (default: <config dir>/roundpen/roundpen-config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input event script (default: stdin)
    #[arg(long)]
    events: Option<PathBuf>,
    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<LogLevel>,
    /// Write the effective preferences back to the configuration file
    #[arg(long, action = ArgAction::SetTrue)]
    save_config: bool,
}

impl Cli {
    /// Apply command line overrides on top of the stored preferences.
    fn apply(&self, prefs: &mut UserPreferences) {
        if let Some(output) = &self.output {
            prefs.output_path = output.clone();
        }
        if self.no_region {
            prefs.enable_region_selection = false;
        }
        if self.no_background {
            prefs.enable_background_step = false;
        }
        if let Some(level) = self.log_level {
            prefs.log_level = level;
        }
    }
}

fn init_logging(cli_level: Option<LogLevel>, config_level: LogLevel) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config_level.name().to_lowercase()),
    );
    if let Some(level) = cli_level {
        builder.filter_level(level.to_level_filter());
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(AppConfig::default_path);
    let (mut config, load_error) = match config_path.as_deref() {
        Some(path) => AppConfig::load_or_default(path),
        None => (AppConfig::default(), None),
    };

    init_logging(cli.log_level, config.preferences.log_level);
    if let (Some(e), Some(path)) = (&load_error, &config_path) {
        log::warn!("Failed to load config file {:?}: {}, using defaults", path, e);
    }

    cli.apply(&mut config.preferences);
    if cli.save_config {
        let path = config_path
            .as_deref()
            .context("Could not determine config directory")?;
        config
            .save_to_path(path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
    }

    let frame_path = match cli.frame.clone() {
        Some(path) => path,
        None => match pick_frame()? {
            Some(path) => path,
            None => {
                log::info!("No frame selected, exiting");
                return Ok(());
            }
        },
    };

    let bindings = config.keybindings.to_keybindings();
    let mut source = ImageFileSource::new(&frame_path);
    let mut session =
        MarkerSession::from_source(&mut source, config.preferences.session_options())
            .with_context(|| format!("Failed to load frame from {}", frame_path.display()))?;

    let mut input = read_events(cli.events.as_deref())?;
    let mut sink = LogSink::new();
    sink.present(&SessionView::capture(&session, &bindings));

    while let Some(event) = input.next_event() {
        if handle_event(&mut session, &bindings, event) {
            sink.present(&SessionView::capture(&session, &bindings));
        }
        if session.is_terminated() {
            break;
        }
    }

    if !session.is_terminated() {
        log::info!(
            "Input ended in mode {} with {} committed markers",
            session.mode().name(),
            session.markers().len()
        );
    }
    Ok(())
}

fn read_events(path: Option<&Path>) -> Result<ScriptedInput> {
    match path {
        Some(path) => ScriptedInput::from_path(path)
            .with_context(|| format!("Failed to read input script {}", path.display())),
        None => ScriptedInput::from_reader(io::stdin().lock())
            .context("Failed to read input script from stdin"),
    }
}

#[cfg(feature = "file-dialog")]
fn pick_frame() -> Result<Option<PathBuf>> {
    Ok(rfd::FileDialog::new()
        .set_title("Select frame")
        .add_filter("Images", ImageFileSource::extensions())
        .pick_file())
}

#[cfg(not(feature = "file-dialog"))]
fn pick_frame() -> Result<Option<PathBuf>> {
    anyhow::bail!("No frame given; pass an image path or build with the file-dialog feature")
}
