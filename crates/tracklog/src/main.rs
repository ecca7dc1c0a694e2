//! tracklog: comment on TargetProcess tickets referenced by git commits
//!
//! This binary walks a repository's first-parent history, extracts ticket
//! references from commit messages, and posts one comment per ticket and
//! commit, idempotently across repeated CI runs.

use clap::Parser;
use tracing::error;

use tracklog::config::Config;

fn main() {
    let config = Config::parse();

    // Logs go to stderr so stdout stays clean for shell consumers
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = tracklog::run(&config) {
        error!("run failed: {e:#}");
        std::process::exit(1);
    }
}
