//! Nebula Runtime - Frame loop infrastructure
//!
//! Provides the per-frame building blocks, independent of any window system:
//! - `Clock`: monotonic elapsed time, reset when the loop starts
//! - `FrameScheduler` / `CancelHandle`: the host's "run before next paint" primitive
//! - `AnimationLoop`: Idle → Running → Stopped driver that writes rotations and requests renders
//! - `ViewportState`: resize requests applied at frame boundaries
//! - `OrbitControl` / `FrameRenderer`: seams to the camera controller and render backend
//! - `ViewConfig`: TOML configuration
//! - `GalaxyView`: the mountable component tying it all together

mod animation;
mod clock;
mod config;
mod host;
mod schedule;
mod view;
mod viewport;

pub use animation::{wrap_angle, AnimationLoop, FrameContext, FramePose, LoopState};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CameraConfig, ViewConfig, WindowConfig};
pub use host::{FrameRenderer, OrbitControl};
pub use schedule::{CancelHandle, FrameScheduler};
pub use view::GalaxyView;
pub use viewport::{Viewport, ViewportState, MAX_PIXEL_RATIO};
