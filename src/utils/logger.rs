//! Log setup: env_logger with a compact colored prefix.

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Configure CLI logging. Our crate logs at debug when `verbose`, info
/// otherwise; dependencies stay at warn. `RUST_LOG` still overrides both.
pub fn setup_logging(verbose: bool) {
    let crate_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), crate_level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            match record.level() {
                Level::Error => {
                    writeln!(buf, "[{name} {}] {}", "ERROR".red(), record.args())
                }
                Level::Warn => {
                    writeln!(buf, "[{name} {}] {}", "WARN".yellow(), record.args())
                }
                _ => writeln!(buf, "[{name}] {}", record.args()),
            }
        })
        .init();
}
