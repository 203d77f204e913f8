use tracing_subscriber::layer::{Layer, Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// `RUST_LOG` wins over these.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "users_lambda=debug,info"
    } else {
        "users_lambda=info"
    }
}

fn install<L>(verbose: bool, layer: L)
where
    L: Layer<FilteredRegistry> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry().with(filter).with(layer).init();
}

pub fn init_cli_logger(verbose: bool) {
    install(
        verbose,
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact(),
    );
}

/// One JSON object per line for CloudWatch. Lambda stamps its own time.
pub fn init_lambda_logger() {
    install(false, fmt::layer().with_target(false).without_time().json());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "users_lambda=info");
        assert!(default_directives(true).starts_with("users_lambda=debug"));
        assert!(default_directives(true).parse::<EnvFilter>().is_ok());
    }
}
