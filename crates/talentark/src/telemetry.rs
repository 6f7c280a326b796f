use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Directives used when the configured level is blank: keep the directory and
/// import paths visible without the dependency noise.
const FALLBACK_DIRECTIVES: &str = "info,talentark=debug,talentark_api=debug";

#[derive(Debug)]
pub enum TelemetryError {
    Directive { directive: String, source: ParseError },
    Install(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Directive { directive, .. } => {
                write!(
                    f,
                    "log directive '{directive}' is not valid tracing filter syntax"
                )
            }
            TelemetryError::Install(err) => {
                write!(f, "could not install the log subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Directive { source, .. } => Some(source),
            TelemetryError::Install(err) => Some(&**err),
        }
    }
}

/// Build the filter from the configured directive, falling back to the
/// service defaults when it is blank. `RUST_LOG` is handled by `init` and
/// never reaches this point.
fn build_filter(configured: &str) -> Result<EnvFilter, TelemetryError> {
    let directive = configured.trim();
    let directive = if directive.is_empty() {
        FALLBACK_DIRECTIVES
    } else {
        directive
    };

    EnvFilter::try_new(directive).map_err(|source| TelemetryError::Directive {
        directive: directive.to_string(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Install)
}
