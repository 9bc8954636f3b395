//! Injected logging capability.
//!
//! The core never reaches for a global logger on its own; it writes through
//! the [`Logger`] held by [`Webauthz`](crate::Webauthz).

/// Log target used by [`LogLogger`].
pub const LOG_TARGET: &str = "webauthz";

/// Sink for the middleware's diagnostic messages.
pub trait Logger: Send + Sync + 'static {
    /// Very fine-grained detail (per-request classification).
    fn trace(&self, message: &str);
    /// Normal operation.
    fn info(&self, message: &str);
    /// Something the operator should look at (rejected tokens).
    fn warn(&self, message: &str);
    /// Validator misbehaviour.
    fn error(&self, message: &str);
}

/// Forwards to the `log` facade under the `webauthz` target.
///
/// Records go wherever the host installed its logger (`env_logger`,
/// `tracing-subscriber`, ...). With no logger installed they are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn trace(&self, message: &str) {
        log::trace!(target: LOG_TARGET, "{message}");
    }

    fn info(&self, message: &str) {
        log::info!(target: LOG_TARGET, "{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!(target: LOG_TARGET, "{message}");
    }

    fn error(&self, message: &str) {
        log::error!(target: LOG_TARGET, "{message}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn trace(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
