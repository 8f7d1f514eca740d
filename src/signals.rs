//! Stop requests for running batches
//!
//! SIGINT, SIGTERM and SIGHUP set a shared flag that the driver checks
//! between albums. An album's click sequence is never interrupted midway; the
//! batch simply ends before the next one starts. A second SIGINT while the
//! flag is already set terminates the process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Shared, cloneable stop flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running batch to stop before its next item.
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear a handled request so the next batch can run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Route SIGINT, SIGTERM and SIGHUP into `stop`.
/// Call this once at program start.
pub fn init_signal_handlers(stop: &StopSignal) -> Result<(), std::io::Error> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::flag;

    // Order matters: the conditional shutdown must see the flag before the
    // same signal sets it, so only a repeated SIGINT exits.
    flag::register_conditional_shutdown(SIGINT, 130, stop.flag())?;
    for sig in [SIGINT, SIGTERM, SIGHUP] {
        flag::register(sig, stop.flag())?;
    }

    info!("Signal handlers installed (SIGINT, SIGTERM, SIGHUP)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_shared_between_clones() {
        let stop = StopSignal::new();
        let other = stop.clone();
        assert!(!other.is_requested());
        stop.request();
        assert!(other.is_requested());
        other.reset();
        assert!(!stop.is_requested());
    }
}
