//! Logging configuration for the scoring pipeline.

use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::{debug, LevelFilter};
use std::io::Write;

const CRATE_TARGET: &str = "wallet_score";

/// Parse a `[logging] level` value (`off`, `error` .. `trace`, any case)
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

/// Short stage name for a log target: `wallet_score::report::chart` becomes
/// `report::chart`, the binary's own records become `run`.
fn stage(target: &str) -> &str {
    match target.strip_prefix(CRATE_TARGET) {
        | Some("") => "run",
        | Some(rest) => rest.strip_prefix("::").unwrap_or(target),
        | None => target,
    }
}

/// Initialize the logging system.
///
/// `WALLET_SCORE_LOG` overrides `level` with a full `env_logger` filter.
pub fn init_logging(level: &str) {
    let env = Env::default()
        .filter_or("WALLET_SCORE_LOG", level)
        .write_style_or("WALLET_SCORE_LOG_STYLE", "auto");

    Builder::from_env(env)
        .format(|buf, record| {
            let level = record.level();
            let level_color = match level {
                | log::Level::Error => "\x1b[31m", // Red
                | log::Level::Warn => "\x1b[33m",  // Yellow
                | log::Level::Info => "\x1b[32m",  // Green
                | log::Level::Debug => "\x1b[36m", // Cyan
                | log::Level::Trace => "\x1b[35m", // Magenta
            };

            writeln!(
                buf,
                "{} {}{:5}\x1b[0m {:<16} {}",
                Local::now().format("%H:%M:%S%.3f"),
                level_color,
                level,
                stage(record.target()),
                record.args()
            )
        })
        .target(Target::Stderr)
        .try_init()
        .ok();

    debug!("Log filter: {}", level);
}
