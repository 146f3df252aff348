use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::FmtSubscriber;

/// Installs a process-wide `tracing` subscriber at `INFO`. Best-effort: a
/// second call (or a host application that already installed its own
/// subscriber) is a no-op rather than a panic.
pub fn init_logger() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    let _ = set_global_default(subscriber);
}
