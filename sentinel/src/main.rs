// sentinel/src/main.rs
//! Sentinel CLI entry point.
//!
//! Compiles the selected profile into an engine, then dispatches to the
//! requested command. A blocked verdict exits with status 1 so shell
//! pipelines can gate on it.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use sentinel::cli::{Cli, Commands};
use sentinel::commands::check::{run_check, CheckOptions};
use sentinel::commands::stream::run_stream;
use sentinel::logger;
use sentinel_core::{Backends, Orchestrator, PluginRegistry, Profile};
use sentinel_embed::HashEmbedder;

fn load_profile(path: Option<&Path>) -> Result<Profile> {
    match path {
        Some(path) => Profile::load_from_file(path),
        None => Profile::load_default(),
    }
}

fn compile_engine(profile: Profile) -> Result<Orchestrator> {
    // The built-in hashing embedder keeps semantic profiles usable without
    // an external model backend.
    let backends = Backends::default().with_embeddings(Arc::new(HashEmbedder::default()));
    Ok(Orchestrator::compile(profile, &backends, &PluginRegistry::new())?)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    logger::init_logger(args.quiet, args.debug);

    let valid = match args.command {
        Commands::Check(cmd) => {
            let engine = compile_engine(load_profile(cmd.profile.as_deref())?)?;
            let input = match cmd.text {
                Some(text) => text,
                None => read_input(cmd.input_file.as_deref())?,
            };
            run_check(
                &engine,
                CheckOptions { input, output: cmd.output, json: cmd.json },
            )?
        }
        Commands::Stream(cmd) => {
            let engine = Arc::new(compile_engine(load_profile(cmd.profile.as_deref())?)?);
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            match cmd.input_file.as_deref() {
                Some(path) => {
                    let file = fs::File::open(path)
                        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
                    run_stream(engine, &mut BufReader::new(file), &mut writer)?
                }
                None => {
                    let stdin = io::stdin();
                    run_stream(engine, &mut stdin.lock(), &mut writer)?
                }
            }
        }
    };

    if !valid {
        std::process::exit(1);
    }
    Ok(())
}
