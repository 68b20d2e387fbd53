//! Log output on stdout, kept clear of the stage spinners in a terminal

use std::fmt::Write as _;

use indicatif::MultiProgress;
use log::{Level, Log, Metadata, Record};

const RESET: &str = "\x1b[0m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[1;31m",
        Level::Warn => "\x1b[33m",
        Level::Info => "\x1b[32m",
        Level::Debug => "\x1b[36m",
        Level::Trace => "\x1b[2m",
    }
}

/// `[LEVEL] message` with the level padded to five columns
fn render(record: &Record, color: bool) -> String {
    let mut line = String::new();
    if color {
        let _ = write!(line, "[{}{:<5}{RESET}]", level_color(record.level()), record.level());
    } else {
        let _ = write!(line, "[{:<5}]", record.level());
    }
    let _ = write!(line, " {}", record.args());
    line
}

/// Logger for terminal runs: filters like env_logger, then prints each line
/// with the spinners suspended so they are redrawn below it.
pub struct ProgressLogger {
    filter: env_logger::Logger,
    bars: MultiProgress,
}

impl ProgressLogger {
    pub fn new(filter: env_logger::Logger, bars: MultiProgress) -> Self {
        Self { filter, bars }
    }

    /// Install as the global logger; a no-op if one is already set
    fn install(self) {
        let max_level = self.filter.filter();
        if log::set_boxed_logger(Box::new(self)).is_ok() {
            log::set_max_level(max_level);
        }
    }
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = render(record, true);
        self.bars.suspend(|| println!("{line}"));
    }

    fn flush(&self) {}
}

/// Default filter for the given verbosity flags
fn default_level(quiet: bool, debug: bool) -> &'static str {
    match (debug, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

/// Initialize logging to stdout.
///
/// With `multi`, lines go through [`ProgressLogger`]. Without it, env_logger
/// writes `<timestamp> [LEVEL] message`. `RUST_LOG` overrides the level
/// derived from `quiet`/`debug`.
pub fn init_logging(quiet: bool, debug: bool, multi: Option<&MultiProgress>) {
    use std::io::Write;

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level(quiet, debug)),
    );

    match multi {
        Some(multi) => ProgressLogger::new(builder.build(), multi.clone()).install(),
        None => {
            let _ = builder
                .target(env_logger::Target::Stdout)
                .format(|buf, record| {
                    writeln!(buf, "{} {}", buf.timestamp_millis(), render(record, false))
                })
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_pad_level() {
        let line = render(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("Fetched 2 rows at offset 0"))
                .build(),
            false,
        );
        assert_eq!(line, "[INFO ] Fetched 2 rows at offset 0");
    }

    #[test]
    fn colored_lines_reset_after_level() {
        let line = render(
            &Record::builder()
                .level(Level::Error)
                .args(format_args!("boom"))
                .build(),
            true,
        );
        assert_eq!(line, "[\x1b[1;31mERROR\x1b[0m] boom");
    }

    #[test]
    fn debug_wins_over_quiet() {
        assert_eq!(default_level(true, true), "debug");
        assert_eq!(default_level(true, false), "warn");
        assert_eq!(default_level(false, false), "info");
    }
}
