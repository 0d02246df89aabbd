// Author: Dustin Pilgrim
// License: MIT

mod annotate;
mod cli;
mod config;
mod logging;
mod paths;
mod persist;
mod session;
mod source;
mod viewer;
mod watershed;

use std::io;

use clap::{CommandFactory, Parser};
use eventline::{debug, error, info, warn};

use clipper_core::ClipError;

use cli::{Args, Cmd};
use config::{ClipperConfig, Templates};
use session::EditorSession;
use watershed::WatershedGrower;

fn main() {
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| paths::default_log_path("clipper.log"));

    if let Err(e) = logging::init_logging(&log_path, args.verbose) {
        eprintln!("clipper: failed to init logging: {e}");
    }

    if let Err(e) = run(args) {
        error!("fatal error: {e}");
        eprintln!("clipper: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    info!("clipper starting");
    debug!("parsed args: {args:?}");

    let cfg_path = paths::default_config_path();
    let cfg = config::load(&cfg_path).unwrap_or_else(|e| {
        warn!("{}: {e}; using defaults", cfg_path.display());
        ClipperConfig::default()
    });

    match &args.cmd {
        Some(Cmd::Annotate { clipdir, path }) => {
            let mut out = io::stdout().lock();
            annotate::annotate(clipdir, path, &mut out)
        }
        None => edit(&args, &cfg),
    }
}

fn edit(args: &Args, cfg: &ClipperConfig) -> Result<(), String> {
    let templates = Templates::resolve(args, cfg);
    info!("image template: {}", templates.image);
    info!("video template: {}", templates.video);

    let source = source::open(&args.reference, args.frame)?;
    let session = EditorSession::new(
        source,
        Box::new(WatershedGrower),
        templates,
        cfg.outline_rgb(),
    );

    let fatal = viewer::run_viewer(
        session,
        args.output.clone(),
        cfg.background_colour,
        cfg.outline_colour,
    )?;

    match fatal {
        None => {
            info!("clipper done");
            Ok(())
        }
        Some(e @ ClipError::UnsupportedOutputFormat { .. }) => {
            let _ = Args::command().print_help();
            eprintln!();
            Err(e.to_string())
        }
        Some(e) => Err(e.to_string()),
    }
}
