//! The mountable galaxy view component

use crate::{
    AnimationLoop, CancelHandle, Clock, FrameContext, FramePose, FrameRenderer, FrameScheduler,
    LoopState, OrbitControl, ViewConfig, Viewport, ViewportState,
};
use nebula_core::{NodeId, Result};
use nebula_gen::GalaxyParams;
use nebula_scene::{GalaxyScene, ResourceTracker};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A galaxy scene mounted onto a render target.
///
/// Owns the scene, the animation loop, the camera controller and the
/// renderer for as long as it is mounted. [`GalaxyView::teardown`] stops
/// the loop before anything is released.
pub struct GalaxyView<K, C, R> {
    scene: GalaxyScene,
    params: GalaxyParams,
    animation: AnimationLoop<K>,
    viewport: ViewportState,
    camera: C,
    renderer: R,
    rng: StdRng,
}

impl<K, C, R> GalaxyView<K, C, R>
where
    K: Clock,
    C: OrbitControl,
    R: FrameRenderer<Camera = C>,
{
    /// Build the scene onto `target`. With no render target there is nothing
    /// to draw into, so mounting is a no-op and returns `Ok(None)`.
    pub fn mount(
        target: Option<R>,
        camera: C,
        clock: K,
        viewport: Viewport,
        config: &ViewConfig,
        tracker: Box<dyn ResourceTracker>,
    ) -> Result<Option<Self>> {
        let Some(renderer) = target else {
            log::warn!("[view] no render target, nothing mounted");
            return Ok(None);
        };
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let scene = GalaxyScene::build(&config.galaxy, tracker, &mut rng)?;
        log::info!(
            "[view] mounted {}x{} @{}x",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio()
        );

        Ok(Some(Self {
            scene,
            params: config.galaxy.clone(),
            animation: AnimationLoop::new(clock, config.galaxy.rotation_speed),
            viewport: ViewportState::new(viewport),
            camera,
            renderer,
            rng,
        }))
    }

    /// Ask for the first frame
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> CancelHandle {
        self.animation.start(scheduler)
    }

    /// Run one scheduled frame
    pub fn frame<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> Option<FramePose> {
        let ctx = FrameContext {
            nodes: self.scene.animated(),
            scene: &mut self.scene.graph,
            viewport: &mut self.viewport,
            camera: &mut self.camera,
            renderer: &mut self.renderer,
        };
        self.animation.tick(ctx, scheduler)
    }

    /// Queue a resize for the next frame
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport.on_resize(viewport);
    }

    /// New galaxy with the current parameters; the previous one is released first
    pub fn regenerate(&mut self) -> Result<NodeId> {
        self.scene.regenerate(&self.params, &mut self.rng)
    }

    /// New galaxy with different parameters
    pub fn regenerate_with(&mut self, params: GalaxyParams) -> Result<NodeId> {
        params.validate()?;
        self.animation.set_rotation_speed(params.rotation_speed);
        self.params = params;
        self.regenerate()
    }

    /// Stop the loop, then release every node and renderer resource
    pub fn teardown(mut self) {
        self.animation.stop();
        self.scene.release_all();
        self.renderer.release();
        log::info!("[view] torn down");
    }

    pub fn state(&self) -> LoopState {
        self.animation.state()
    }

    pub fn scene(&self) -> &GalaxyScene {
        &self.scene
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Input handlers feed pointer and wheel motion through here
    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn clock_mut(&mut self) -> &mut K {
        self.animation.clock_mut()
    }
}
