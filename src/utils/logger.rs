use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const QUIET_DIRECTIVES: &str = "gluon_client=info";
const VERBOSE_DIRECTIVES: &str = "gluon_client=debug,gluon=debug,protocol_smoke=debug,info";

/// `RUST_LOG` wins over the built-in directives when set.
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Human-readable output on stderr so stdout stays clean for query results.
pub fn init_cli_logger(verbose: bool) {
    let directives = if verbose {
        VERBOSE_DIRECTIVES
    } else {
        QUIET_DIRECTIVES
    };

    tracing_subscriber::registry()
        .with(env_filter(directives))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .without_time()
                .compact(),
        )
        .init();
}

/// One JSON object per event, fields flattened, for services embedding
/// the client.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter(QUIET_DIRECTIVES))
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false),
        )
        .init();
}
