use clap::Parser;
use cli::Args;
use tracing_subscriber::EnvFilter;

mod artifact_wrapper;
mod cli;

/// Configures tracing with default level INFO,
/// If the environment variable `RUST_LOG` is set, it will be used instead.
/// Events go to stderr so that stdout only carries command output.
fn configure_tracing() {
    let level_filter_layer =
        EnvFilter::builder().with_default_directive(tracing::Level::INFO.into()).from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(level_filter_layer)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    configure_tracing();

    // parse arguments
    let args = Args::parse();
    let output = args.execute()?;
    println!("{output}");

    Ok(())
}
