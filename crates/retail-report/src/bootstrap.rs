use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `directive` is an [`EnvFilter`] directive such as `"warn"` or
/// `"report_data=debug"`.  Falls back to `"warn"` when it does not parse.
/// Output goes to stderr so `--view json` keeps stdout clean.
pub fn setup_logging(directive: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(directive))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init()?;

    Ok(())
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
