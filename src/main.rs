use std::process::ExitCode;

use citycatalyst_cdp::cli::{self, Cli};
use citycatalyst_cdp::ui::output;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let default_filter = if cli.debug {
        "citycatalyst_cdp=debug"
    } else if cli.quiet {
        "citycatalyst_cdp=warn"
    } else {
        "citycatalyst_cdp=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
