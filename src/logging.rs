//! Logger bootstrap for binaries. The library itself only uses the `log` facade.

use std::io::{self, Write};

use env_logger::{fmt::Formatter, Builder, Target};
use log::{Level, LevelFilter};

/// Installs a stderr logger printing `LEVEL [target] message` lines.
///
/// Fails if a global logger is already set.
pub fn init_logger(level: LevelFilter) -> io::Result<()> {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf: &mut Formatter, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                level_tag(record.level()),
                record.target(),
                record.args()
            )
        });

    builder.try_init().map_err(io::Error::other)
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
