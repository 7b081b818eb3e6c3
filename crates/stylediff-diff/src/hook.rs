use tracing::warn;

use crate::error::DiffError;

/// Observer notified when a diff is abandoned in favour of `setStyle`.
pub trait FallbackHook: Send + Sync {
    fn on_fallback(&self, error: &DiffError);
}

/// Default hook: logs the failure as a `tracing` warning.
pub struct TracingFallbackHook;

impl FallbackHook for TracingFallbackHook {
    fn on_fallback(&self, error: &DiffError) {
        warn!(error = %error, "unable to compute style diff; falling back to setStyle");
    }
}

impl<F> FallbackHook for F
where
    F: Fn(&DiffError) + Send + Sync,
{
    fn on_fallback(&self, error: &DiffError) {
        self(error)
    }
}
