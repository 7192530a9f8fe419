use clap::Parser;
use std::path::PathBuf;

/// Default location of the transaction log, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "dataset/data-2.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Exploratory sales report over an e-commerce transaction log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "retail-report",
    about = "Exploratory sales report over an e-commerce transaction log",
    version
)]
pub struct Settings {
    /// Path to the transaction CSV
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Output view
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "text", "json"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Show dataset rows with quantity strictly greater than this value
    #[arg(
        long,
        default_value = "0",
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-1000..=1000)
    )]
    pub min_quantity: i64,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Parse an explicit argument list (the first item is the binary name)
    /// and apply the `--debug` override.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Map the Python-style level name to a `tracing` filter directive.
    ///
    /// Unrecognised names pass through unchanged so `EnvFilter` directives
    /// such as `report_data=trace` still work.
    pub fn tracing_level(&self) -> String {
        match self.log_level.to_uppercase().as_str() {
            "DEBUG" => "debug".to_string(),
            "INFO" => "info".to_string(),
            "WARNING" => "warn".to_string(),
            "ERROR" | "CRITICAL" => "error".to_string(),
            _ => self.log_level.clone(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
