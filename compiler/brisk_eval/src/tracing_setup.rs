use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// Hosts call this once at startup; later calls are no-ops. Nothing is
/// installed when `RUST_LOG` is unset, so embedding applications that
/// bring their own subscriber are left alone.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host may already have set a global subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .try_init();
        }
    });
}
