use timecap::commands::Cli;
use timecap::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

/// The pipeline runs on a single-threaded runtime: timers, captures and
/// network callbacks are cooperatively scheduled on one execution context,
/// matching the components' `spawn_local` tasks.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .init();
    }

    tokio::task::LocalSet::new().run_until(Cli::menu()).await
}
