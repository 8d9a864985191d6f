use std::{
    fmt::Write as _,
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const RESET: &str = "\x1b[0m";

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

/// Writes `text` wrapped in `color` when the writer accepts escapes.
fn paint(
    writer: &mut Writer<'_>,
    color: &str,
    text: std::fmt::Arguments<'_>,
) -> std::fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "{color}{text}{RESET}")
    } else {
        write!(writer, "{text}")
    }
}

/// One line per event: local timestamp, level, span, `file:line`, fields.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        paint(&mut writer, "\x1b[2m", format_args!("{stamp}"))?;
        writer.write_char(' ')?;
        let level = metadata.level();
        paint(&mut writer, level_color(level), format_args!("{level:>5}"))?;
        writer.write_char(' ')?;

        if let Some(span) = ctx.lookup_current() {
            write!(writer, "{}: ", span.name())?;
        }
        if let (Some(path), Some(line)) = (metadata.file(), metadata.line()) {
            let path = path.trim_start_matches("src/");
            paint(&mut writer, "\x1b[36m", format_args!("{path}:{line}"))?;
            writer.write_char(' ')?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `RUST_LOG` when set, otherwise `level`.
///
/// `level` may be a bare level ("warn") or any `EnvFilter` directive.
pub fn make_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("invalid log level '{level}': {e}")),
    }
}

/// Installs the global subscriber. Fails if one is already set.
///
/// - Stderr: colored when attached to a terminal, plain when piped. Stdout is
///   left to the command's JSON output.
/// - File: appended to when `log_file` is given, never colored.
pub fn init_logging(
    level: &str,
    log_file: Option<&Path>,
) -> Result<()> {
    let filter = make_filter(level)?;

    let file_layer = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LocalFmt)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_filter_rejects_garbage_level() {
        // only meaningful when RUST_LOG is not set for the test run
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(make_filter("plan_core=loud").is_err());
        }
    }

    #[test]
    fn make_filter_accepts_directives() {
        assert!(make_filter("warn,plan_core=debug").is_ok());
    }
}
