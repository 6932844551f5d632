use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use reflex_host::app::{App, Exit, GameClock};
use reflex_host::cli::Args;
use reflex_host::input::InputAggregator;
use reflex_host::keyboard::KeyboardSource;
use reflex_host::logging::init_logging;
use reflex_host::presenter::{self, Presenter, TerminalGuard};
use reflex_host::serial::SerialSource;

const EXIT_OK: u8 = 0;
const EXIT_STARTUP_ERROR: u8 = 1;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here
            let code = if e.use_stderr() { EXIT_STARTUP_ERROR } else { EXIT_OK };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let _log_guard = match init_logging(args.log_file.as_deref(), args.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(EXIT_STARTUP_ERROR);
        }
    };

    match run(&args) {
        Ok(exit) => {
            if let Exit::GameOver { score } = exit {
                println!("Game over! Final score: {}", score);
            }
            ExitCode::from(EXIT_OK)
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_STARTUP_ERROR)
        }
    }
}

fn run(args: &Args) -> Result<Exit> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        bail!("reflex needs an interactive terminal (stdin and stdout must be a TTY)");
    }

    let config = args.game_config();
    info!(
        "Starting: lives {}, reaction {} ms, pause {} ms",
        config.lives, config.reaction_ms, config.pause_ms
    );

    let mut startup_error = None;
    let serial = match &args.port {
        Some(port) => match SerialSource::open(port, args.baudrate) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("{}, keyboard only", e);
                startup_error = Some(e);
                None
            }
        },
        None => {
            info!("No serial port given, keyboard only");
            None
        }
    };

    install_panic_hook();
    let _terminal = TerminalGuard::enter().context("Failed to set up the terminal")?;

    let clock = GameClock::start();
    let inputs = InputAggregator::new(serial, KeyboardSource::new());
    let mut app = App::new(config, inputs, rand::thread_rng(), clock.now_ms());
    if let Some(e) = startup_error {
        app.report_error(e);
    }

    let mut presenter = Presenter::new(io::stdout());
    app.run(&mut presenter, &clock, args.tick_interval())
}

/// Put the terminal back before the panic message is printed
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        presenter::restore_terminal();
        default_hook(info);
    }));
}
