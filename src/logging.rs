// Logger setup plus conditional logging macros that are only active in debug builds

use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

/// Level for a `-v` count: warnings by default, `-v` info, `-vv` and up debug.
#[must_use]
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Install the global logger.
///
/// With `silent_stderr` set and no log file, nothing is logged unless `RUST_LOG` asks for
/// it; full-screen mode uses this since stderr output would tear the display.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>, silent_stderr: bool) -> io::Result<()> {
    let level = if silent_stderr && log_file.is_none() {
        LevelFilter::Off
    } else {
        level_for(verbosity)
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        });

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // A logger may already be installed, e.g. by a test harness.
    let _ = builder.try_init();
    Ok(())
}
