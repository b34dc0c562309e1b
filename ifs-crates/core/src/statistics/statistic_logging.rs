//! The global configuration of where and how statistics are written.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::RwLock;

use convert_case::Case;
use convert_case::Casing;

struct StatisticOptions {
    /// Written before every statistic: `{prefix} {name}={value}`
    prefix: &'static str,
    /// Written on a line of its own by [`log_statistic_postfix`]
    after: Option<&'static str>,
    /// The casing applied to the names of the statistics
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("after", &self.after)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<RwLock<StatisticOptions>> = OnceLock::new();

/// Enables the logging of statistics.
///
/// Statistics are written to `writer`, or to stdout if no writer is given, each preceded by
/// `prefix` and with their name converted to `casing` if one is given. Only the first call has an
/// effect.
pub fn configure_statistic_logging(
    prefix: &'static str,
    after: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        RwLock::from(StatisticOptions {
            prefix,
            after,
            casing,
            writer: writer.unwrap_or(Box::new(stdout())),
        })
    });
}

/// Writes the statistic `name` with `value`, if statistic logging has been configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    let Some(options) = STATISTIC_OPTIONS.get() else {
        return;
    };
    if let Ok(mut options) = options.write() {
        let name = match options.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        let prefix = options.prefix;
        let _ = writeln!(options.writer, "{prefix} {name}={value}");
    }
}

/// Writes the closing line after a block of statistics, if one has been configured.
pub fn log_statistic_postfix() {
    let Some(options) = STATISTIC_OPTIONS.get() else {
        return;
    };
    if let Ok(mut options) = options.write() {
        if let Some(after) = options.after {
            let _ = writeln!(options.writer, "{after}");
        }
    }
}

/// Returns whether statistic logging has been configured.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
