//! Logging uses the `log` facade with an `env_logger` backend writing to
//! standard error. The level comes from `RUST_LOG` if it is set, and from the
//! `--quiet` and `--verbose` flags otherwise.
use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initializes logging. Call once, before anything logs.
pub fn init(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    let from_env = env::var_os("RUST_LOG").is_some();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for(verbose, quiet));
    }
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });
    // A second initialization (as in tests) keeps the first logger.
    if builder.try_init().is_ok() && !from_env {
        log::debug!("Logging at level {}", level_for(verbose, quiet));
    }
}

/// `--quiet` wins over `--verbose`; each `-v` raises the level one step above
/// the default of `warn`.
fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
