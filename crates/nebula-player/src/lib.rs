//! Nebula Player - windowed galaxy viewer
//!
//! Provides the `GalaxyApp` winit application handler that mounts a
//! `GalaxyView` onto a window and drives it with redraw requests.

mod app;

pub use app::{viewport_for, GalaxyApp};
