// Entrypoint for the CLI application.
// - Keeps `main` small: parse the flags and hand them to `cli::run`.
// - A terminal error becomes one red line on stderr and exit code 1; the
//   underlying error chain goes to the debug log.

use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;

use gbolt::cli::{self, Cli};

fn main() -> ExitCode {
    env_logger::init();
    reset_sigpipe();

    match cli::run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::debug!("{error:?}");
            let message = error.to_string();
            if std::io::stderr().is_tty() {
                eprintln!("{}", message.red());
            } else {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        }
    }
}

// Writing into a closed downstream pipe must end the process, not panic
// it, so restore the default SIGPIPE disposition when stdout is piped.
#[cfg(unix)]
fn reset_sigpipe() {
    if !std::io::stdout().is_tty() {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}
