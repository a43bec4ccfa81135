//! Environment-driven configuration, read once at startup.

use core::str::FromStr;

use stockroom_observability::LogFormat;

pub const LOG_FORMAT_VAR: &str = "STOCKROOM_LOG_FORMAT";
pub const OUTPUT_VAR: &str = "STOCKROOM_OUTPUT";

/// How listings are written to the console.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human readable line per record.
    #[default]
    Text,
    /// Pretty-printed JSON arrays.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub log_format: LogFormat,
    pub output: OutputFormat,
    /// Problems found while reading the environment. Logging is not set up
    /// yet when config is loaded, so these are reported afterwards.
    pub warnings: Vec<String>,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unknown values fall back to the
    /// default and leave a warning behind.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = CliConfig::default();

        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            match raw.parse() {
                Ok(format) => config.log_format = format,
                Err(err) => config
                    .warnings
                    .push(format!("{LOG_FORMAT_VAR}: {err}; using compact")),
            }
        }

        if let Some(raw) = lookup(OUTPUT_VAR) {
            match raw.parse() {
                Ok(format) => config.output = format,
                Err(err) => config.warnings.push(format!("{OUTPUT_VAR}: {err}; using text")),
            }
        }

        config
    }
}
