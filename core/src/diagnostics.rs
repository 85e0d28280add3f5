//! Log collection. The driver logs through `tracing`; [init_logging] routes those events to
//! stderr so that the command lines echoed on stdout remain easy to copy.

use std::io::stderr;
use tracing::{dispatcher::DefaultGuard, subscriber::set_default};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::{EnvFilter, Layer as _, Registry};

pub use tracing_subscriber::filter::ParseError;

/// Starts echoing `tracing` events that pass `log_filter` (an `EnvFilter` directive string such
/// as `"warn"` or `"scout_translate=debug"`) to stderr. Collection stops when the returned guard
/// is dropped.
pub fn init_logging(log_filter: &str) -> Result<DefaultGuard, ParseError> {
    let console_filter = EnvFilter::builder().parse(log_filter)?;
    Ok(set_default(
        Registry::default().with(
            layer()
                .with_target(false)
                .with_writer(stderr)
                .with_filter(console_filter),
        ),
    ))
}
