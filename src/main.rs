use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use dialdown::{
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    digits::Digits,
    input::{dispatch, Control},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    timer::{FramePresenter, Timer},
    ui::ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
};

const BELL: &[u8] = b"\x07";

/// keypad-style countdown timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Dial in a duration by typing digits like a microwave keypad, start the countdown, and get a repeating bell when time is up."
)]
pub struct Cli {
    /// starting duration as HHMMSSCC digits, e.g. 00050000 for five minutes
    #[clap(short = 'd', long)]
    duration: Option<Digits>,

    /// redraw interval in milliseconds while counting down
    #[clap(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// remember the given duration and tick interval as defaults
    #[clap(long)]
    save_config: bool,

    /// write logs here instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command line values take precedence over the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(duration) = self.duration {
            config.initial_duration = duration;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        if let Err(err) = logging::init_file_logger(&path) {
            eprintln!("logging disabled, cannot open {}: {err}", path.display());
        }
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        log::info!("saved defaults to {}", store.path().display());
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend + Write>(
    terminal: &mut Terminal<B>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    log::info!(
        "starting with {} at {:?} ticks",
        config.initial_duration,
        config.tick_interval()
    );

    let mut timer = Timer::new(
        config.initial_duration,
        config.tick_interval(),
        SystemClock,
        FramePresenter::new(),
    );
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_interval()),
    );

    let mut area = terminal.draw(|f| ui(timer.presenter().view(), f))?.area;

    loop {
        match dispatch(&mut timer, runner.step(), area) {
            Control::Quit => break,
            Control::Redraw => {
                terminal.clear()?;
                area = terminal.draw(|f| ui(timer.presenter().view(), f))?.area;
                continue;
            }
            Control::Continue => {}
        }

        let presenter = timer.presenter_mut();
        if presenter.take_signals() > 0 {
            terminal.backend_mut().write_all(BELL)?;
            io::Write::flush(terminal.backend_mut())?;
        }
        if presenter.take_dirty() {
            area = terminal.draw(|f| ui(timer.presenter().view(), f))?.area;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["dialdown"]);

        assert_eq!(cli.duration, None);
        assert_eq!(cli.tick_ms, None);
        assert!(!cli.save_config);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_duration() {
        let cli = Cli::parse_from(["dialdown", "-d", "00250000"]);
        assert_eq!(cli.duration, Some("00250000".parse().unwrap()));

        let cli = Cli::parse_from(["dialdown", "--duration", "01000000"]);
        assert_eq!(cli.duration.unwrap().to_string(), "01000000");
    }

    #[test]
    fn test_cli_rejects_bad_duration() {
        let err = Cli::try_parse_from(["dialdown", "-d", "5m"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("expected 8 digits"));

        assert!(Cli::try_parse_from(["dialdown", "-d", "0005000x"]).is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "dialdown",
            "--tick-ms",
            "20",
            "--save-config",
            "--log-file",
            "/tmp/dd.log",
        ]);
        assert_eq!(cli.tick_ms, Some(20));
        assert!(cli.save_config);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/dd.log")));
    }

    #[test]
    fn test_cli_overrides_config() {
        let stored = Config {
            initial_duration: "00100000".parse().unwrap(),
            tick_interval_ms: 100,
        };

        let cli = Cli::parse_from(["dialdown"]);
        assert_eq!(cli.apply(stored.clone()), stored);

        let cli = Cli::parse_from(["dialdown", "-d", "00000500"]);
        let merged = cli.apply(stored.clone());
        assert_eq!(merged.initial_duration.to_string(), "00000500");
        assert_eq!(merged.tick_interval_ms, 100);

        let cli = Cli::parse_from(["dialdown", "--tick-ms", "25"]);
        assert_eq!(cli.apply(stored).tick_interval_ms, 25);
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
