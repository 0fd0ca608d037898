//! Viewport state updated by resize events

/// Renderer pixel density never exceeds this, whatever the display reports
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Size of the drawable surface in logical pixels plus the display's pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Camera aspect ratio
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Pixel density the renderer uses
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.clamp(f64::MIN_POSITIVE, MAX_PIXEL_RATIO)
    }

    /// Renderer output resolution in physical pixels, at least 1x1
    pub fn render_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let scale = |v: u32| ((v as f64 * ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Owns the current viewport and at most one pending resize.
///
/// Resize events may arrive at any time; they are only applied when the
/// loop calls [`ViewportState::take_pending`] at a frame boundary, so a
/// render never sees half of an update.
#[derive(Debug)]
pub struct ViewportState {
    current: Viewport,
    pending: Option<Viewport>,
}

impl ViewportState {
    pub fn new(initial: Viewport) -> Self {
        Self {
            current: initial,
            pending: Some(initial),
        }
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    /// Record a resize. A later resize before the next frame replaces it.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.pending = Some(viewport);
    }

    /// Apply the pending resize, if any, and return it
    pub fn take_pending(&mut self) -> Option<Viewport> {
        let next = self.pending.take()?;
        self.current = next;
        Some(next)
    }
}
