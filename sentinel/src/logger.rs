// sentinel/src/logger.rs
//! Logger bootstrap for the CLI.
//!
//! `RUST_LOG` keeps full control unless the user passed an explicit flag;
//! without either, warnings and errors are shown.

use log::LevelFilter;

pub fn init_logger(quiet: bool, debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if quiet {
        builder.filter_level(LevelFilter::Off);
    } else if debug {
        builder.filter_level(LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Warn);
    }
    let _ = builder.try_init();
}
