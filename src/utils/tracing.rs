#[cfg(feature = "debug-tracing")]
use std::sync::Mutex;

#[cfg(feature = "debug-tracing")]
use tracing_appender::non_blocking::WorkerGuard;
#[cfg(feature = "debug-tracing")]
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "debug-tracing")]
static TRACING_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Logs to stderr and to an hourly rolling file under `./logs`.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
#[cfg(feature = "debug-tracing")]
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::hourly("./logs", "modkeep.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(true),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .is_ok();

    if initialized {
        if let Ok(mut slot) = TRACING_GUARD.lock() {
            *slot = Some(guard);
        }
        tracing::info!("tracing initialized");
    }
}

#[cfg(not(feature = "debug-tracing"))]
pub fn init_tracing() {}
