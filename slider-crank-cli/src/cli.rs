use slider_crank::{Severity, ValidationError};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod animate;
mod args;
mod logger;
mod solve;
mod sweep;

const APP_NAME: &str = env!("CARGO_BIN_NAME");

#[derive(clap::Parser)]
#[clap(name = APP_NAME, version, author, about)]
pub(crate) struct Entry {
    /// Log filter of the diagnostics, e.g. "debug" (default to `RUST_LOG`)
    #[clap(long, global = true)]
    log: Option<String>,
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// Solve the position, velocity and acceleration at one configuration
    Solve(solve::Solve),
    /// Sample one crank revolution with constant crank rates
    Sweep(sweep::Sweep),
    /// Animate the crank with explicit Euler steps
    Animate(animate::Animate),
}

impl Entry {
    pub(super) fn main() -> ExitCode {
        let entry = <Self as clap::Parser>::parse_from(wild::args());
        init_logger(entry.log.as_deref());
        let res = match entry.cmd {
            Cmd::Solve(solve) => solve::solve(solve),
            Cmd::Sweep(sweep) => sweep::sweep(sweep),
            Cmd::Animate(animate) => animate::animate(animate),
        };
        match res {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report_error(&e),
        }
    }
}

fn init_logger(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_error(e: &anyhow::Error) -> ExitCode {
    let (msg, code) = describe(e);
    eprintln!("{msg}");
    ExitCode::from(code)
}

/// Describe the error by its category and choose the exit code.
///
/// + 1: I/O and other failures
/// + 2: invalid parameters
/// + 3: unsolvable configurations
fn describe(e: &anyhow::Error) -> (String, u8) {
    use slider_crank::Error;
    if let Some(e) = e.downcast_ref::<ValidationError>() {
        let msg = match e.severity() {
            Severity::Hard => format!("error: invalid parameters: {e}"),
            Severity::Warning => {
                format!("warning: {e}\nnote: pass `--allow-ratio` to solve anyway")
            }
        };
        (msg, 2)
    } else if let Some(e) = e.downcast_ref::<Error>() {
        match e {
            Error::TimeStep(_) => (format!("error: invalid parameters: {e}"), 2),
            Error::Unreachable { .. } | Error::Singular(_) => (format!("error: {e}"), 3),
        }
    } else {
        (format!("error: {e:#}"), 1)
    }
}

#[test]
fn exit_codes() {
    use slider_crank::{Error, Singularity};

    let code = |e: anyhow::Error| describe(&e).1;
    assert_eq!(code(Error::TimeStep(-1.).into()), 2);
    assert_eq!(code(Error::Singular(Singularity::DeadCenter).into()), 3);
    assert_eq!(code(ValidationError::DriverCount(0).into()), 2);
    let (msg, ratio) = describe(&ValidationError::Ratio(1.9).into());
    assert!(msg.starts_with("warning: "));
    assert_eq!(ratio, 2);
    assert_eq!(code(anyhow::anyhow!("no such file")), 1);
}
