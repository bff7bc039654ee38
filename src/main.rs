use std::{ffi::OsString, io::Write, process::ExitCode};

use clap::{error::ErrorKind, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod errors;
mod stats;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one invocation and returns its exit status.
///
/// 0 on success (and for `--help`/`--version`), 1 when the statistics could
/// not be produced, 2 on a wrong argument count.
fn run<I, T, W>(args: I, out: &mut W) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    W: Write,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let parsed = match cli::Args::try_parse_from(args.iter().cloned()) {
        Ok(parsed) => parsed,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return match write!(out, "{}", e.render()) {
                Ok(()) => 0,
                Err(_) => 1,
            };
        }
        Err(_) => {
            let program = args
                .first()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| "llc-stats".to_string());
            let _ = writeln!(out, "{}", cli::usage(&program));
            return 2;
        }
    };

    match stats::compute_stats(&parsed.src, out) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ExitCode::from(run(std::env::args_os(), &mut out))
}
