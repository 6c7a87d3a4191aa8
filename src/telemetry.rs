use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Workspace crates whose level `--verbose` raises.
const CRATE_TARGETS: &[&str] = &[
    "testcase_forge",
    "artifact_forge",
    "corpus_store",
    "ai_llm_service",
    "ado_publisher",
];

/// RFC3339 UTC timer, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let s = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// `RUST_LOG` if set, otherwise `default`; `level` is applied to workspace crates on top.
pub fn env_filter(default: &str, level: Option<Level>) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if let Some(level) = level {
        for directive in CRATE_TARGETS.iter().filter_map(|t| level_directive(t, level)) {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

fn level_directive(target: &str, level: Level) -> Option<Directive> {
    Directive::from_str(&format!("{target}={}", level.as_str().to_lowercase())).ok()
}

/// Installs the global subscriber. Logs go to stderr so stdout stays parseable.
pub fn init(verbose: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .event_format(
            fmt::format()
                .compact()
                .with_timer(ChronoRfc3339Utc)
                .with_target(true),
        );

    let level = verbose.then_some(Level::DEBUG);
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter("info", level))
        .with(fmt_layer)
        .try_init();
}
