//! CLI entry point: `ircserv <port> <password>`.

use clap::Parser;
use flexi_logger::{Duplicate, Logger};
use log::error;

/// A single-threaded IRC relay server (RFC 1459/2812 subset).
#[derive(Parser, Debug)]
#[command(name = "ircserv", version, about)]
struct Args {
    /// TCP port to listen on.
    port: u16,
    /// Shared connection password clients must supply via PASS.
    password: String,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); default warn.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn log_spec(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() {
    // `Args::parse()` would exit 2 on a usage error (clap's own convention);
    // spec calls for exit 1, so a genuine usage error is handled by hand.
    // `--help`/`--version` still exit 0 through clap's own `e.exit()`.
    let args = Args::try_parse().unwrap_or_else(|e| {
        use clap::error::ErrorKind;
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            e.exit();
        }
        eprintln!("{e}");
        std::process::exit(1);
    });

    Logger::try_with_str(log_spec(args.verbosity))
        .and_then(|logger| {
            logger
                .log_to_stderr()
                .duplicate_to_stderr(Duplicate::All)
                .start()
        })
        .expect("failed to start logger");

    if let Err(e) = irc_server::multiplexer::run(args.port, args.password) {
        error!("fatal: {e}");
        std::process::exit(1);
    }
}
