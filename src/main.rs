//! folio - terminal portfolio intro
//!
//! Plays the preloader, then shows the page with the typing headline.
//!
//! # Keys
//!
//! `q` quit · `t` theme · `1`-`5` sections · `Tab` next · arrows scroll ·
//! `Enter` learn more

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use folio_tui::error::Result;
use folio_tui::pipeline::{self, ShellServices};
use folio_tui::state::AudioResource;
use folio_tui::theme::{PreferenceStore, ThemeState};
use folio_tui::FolioConfig;

/// Terminal portfolio intro: preloader, then a typing headline
#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Terminal portfolio intro: preloader, then a typing headline")]
struct Cli {
    /// Text typed and erased in the hero
    #[arg(long)]
    headline: Option<String>,

    /// Part of the headline drawn in the accent color
    #[arg(long)]
    name: Option<String>,

    /// Preloader title and navigation brand
    #[arg(long)]
    title: Option<String>,

    /// Line shown under the headline
    #[arg(long)]
    tagline: Option<String>,

    /// Theme preference file (default: <config dir>/folio-tui/theme)
    #[arg(long, value_name = "PATH")]
    theme_file: Option<PathBuf>,

    /// Disable the click sound
    #[arg(long)]
    no_sound: bool,

    /// Caret blink rate; 0 keeps the caret solid
    #[arg(long, default_value_t = 2)]
    fps: u8,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log file (default: <cache dir>/folio-tui/folio.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> FolioConfig {
        let mut config = FolioConfig::default();
        if let Some(headline) = &self.headline {
            config.headline = headline.clone();
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(tagline) = &self.tagline {
            config.tagline = tagline.clone();
        }
        config.caret_fps = self.fps;
        config
    }

    fn preference_store(&self) -> Option<PreferenceStore> {
        match &self.theme_file {
            Some(path) => Some(PreferenceStore::new(path)),
            None => match PreferenceStore::default_location() {
                Ok(store) => Some(store),
                Err(error) => {
                    tracing::warn!(%error, "theme preference will not be saved");
                    None
                }
            },
        }
    }
}

/// Where logs go. Never stderr: the terminal belongs to the page while it runs.
fn log_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| dirs::cache_dir().map(|dir| dir.join("folio-tui").join("folio.log")))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    match log_path(log_file) {
        Some(path) => {
            let file = open_log_file(&path)?;
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let theme = ThemeState::load(cli.preference_store());
    let audio = if cli.no_sound {
        AudioResource::silent()
    } else {
        AudioResource::terminal_bell()
    };

    tracing::info!(headline = %config.headline, mode = %theme.mode(), "starting");
    pipeline::run(
        config,
        ShellServices {
            audio: Rc::new(audio),
            theme,
        },
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("folio: cannot open log file: {error}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "folio failed");
            eprintln!("folio: {error}");
            ExitCode::FAILURE
        }
    }
}
