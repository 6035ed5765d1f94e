pub mod fs;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "expense_ledger=info";

/// Initializes the global tracing subscriber. `filter` replaces the default
/// `expense_ledger=info` directive; `RUST_LOG` is honoured either way.
/// Events go to stderr so command output stays clean.
pub fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        if let Err(err) = install_subscriber(filter) {
            eprintln!("expense_ledger: logging disabled: {err}");
        }
    });
}

/// Fails when another global subscriber is already installed.
fn install_subscriber(
    filter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::from_default_env().add_directive(directive(filter));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

fn directive(filter: Option<&str>) -> Directive {
    filter
        .and_then(|raw| raw.parse::<Directive>().ok())
        .unwrap_or_else(default_directive)
}

fn default_directive() -> Directive {
    DEFAULT_DIRECTIVE
        .parse()
        .unwrap_or_else(|_| Directive::from(tracing::level_filters::LevelFilter::INFO))
}
