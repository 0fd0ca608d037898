//! Frame scheduling and cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The host's "run the frame callback once more before the next paint"
/// primitive (a redraw request, an animation-frame callback, a test queue).
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Cancels an animation loop. Clones share the same flag.
///
/// Cancelling stops the next frame from being scheduled; a frame already
/// in progress always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_flag() {
        let handle = CancelHandle::new();
        let other = handle.clone();
        assert!(!other.is_cancelled());
        handle.cancel();
        assert!(other.is_cancelled());
    }
}
