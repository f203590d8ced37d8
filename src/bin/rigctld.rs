//! The `rigctld` binary: parses the command line, loads the
//! configuration file, brings up every configured rig, and runs the
//! TCP control front end until asked to stop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use rig_config::{ConfigSource, IniConfig};
use rig_logging::Verbosity;

/// A multi-radio rigctl-compatible control daemon.
#[derive(Debug, Parser)]
#[command(name = "rigctld", version, about)]
struct CliArgs {
    /// Path to the INI configuration file naming each rig section.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Stay attached to the controlling terminal instead of detaching.
    #[arg(short = 'f', long = "foreground")]
    foreground: bool,

    /// Increase log verbosity; repeatable (`-v`, `-vv`, `-vvv`).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = CliArgs::parse();
    rig_logging::init(Verbosity::from_count(args.verbose));

    if !args.foreground {
        tracing::info!("staying attached to the controlling terminal (daemonization is out of scope)");
    }

    std::process::exit(run(&args));
}

fn run(args: &CliArgs) -> i32 {
    let mut cfg = match IniConfig::load(&args.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(%err, "failed to load configuration");
            return 1;
        }
    };

    let sections = match cfg.section_names() {
        Ok(sections) => sections,
        Err(err) => {
            tracing::error!(%err, "configuration has no rig sections");
            return 1;
        }
    };

    let mut server = match daemon::build_server(&mut cfg as &mut dyn ConfigSource, &sections) {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(%err, "failed to start");
            return 1;
        }
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGTERM, signal_hook::consts::SIGINT] {
        if let Err(err) = signal_hook::flag::register(signal, Arc::clone(&shutdown)) {
            tracing::warn!(%err, signal, "failed to install signal handler");
        }
    }

    tracing::info!(rigs = sections.len(), "rigctld ready");
    if let Err(err) = server.run(&shutdown) {
        tracing::error!(%err, "event loop failed");
        return 1;
    }

    tracing::info!("shutting down");
    0
}
