//! The per-frame animation loop

use crate::{CancelHandle, Clock, FrameRenderer, FrameScheduler, OrbitControl, ViewportState};
use nebula_scene::{AnimatedNodes, SceneGraph};
use std::f64::consts::TAU;

/// Lifecycle of an [`AnimationLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Rotations (radians about Y) for one frame, unwrapped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePose {
    /// Seconds since the loop started
    pub elapsed: f64,
    pub sphere: f64,
    pub galaxy: f64,
    pub fog: f64,
    pub wind: f64,
}

impl FramePose {
    /// Galaxy group angular rate in radians per second
    pub const GALAXY_RATE: f64 = 50.0;
    /// Wind group angular rate in radians per second
    pub const WIND_RATE: f64 = 60.0;

    /// Next pose. The sphere turns a fixed step per frame; the groups
    /// follow wall-clock time.
    pub fn advance(previous_sphere: f64, rotation_speed: f32, elapsed: f64) -> Self {
        Self {
            elapsed,
            sphere: previous_sphere + rotation_speed as f64,
            galaxy: elapsed * Self::GALAXY_RATE,
            fog: elapsed,
            wind: elapsed * Self::WIND_RATE,
        }
    }
}

/// Reduce an angle to `[0, TAU)` before narrowing, so f32 transforms keep
/// full precision however long the loop has run
pub fn wrap_angle(angle: f64) -> f32 {
    angle.rem_euclid(TAU) as f32
}

/// Everything one frame touches, borrowed from the owner
pub struct FrameContext<'a, C, R> {
    pub scene: &'a mut SceneGraph,
    pub nodes: AnimatedNodes,
    pub viewport: &'a mut ViewportState,
    pub camera: &'a mut C,
    pub renderer: &'a mut R,
}

/// Drives rotations and renders, one scheduled frame at a time
pub struct AnimationLoop<K> {
    clock: K,
    state: LoopState,
    rotation_speed: f32,
    frames: u64,
    cancel: CancelHandle,
}

impl<K: Clock> AnimationLoop<K> {
    pub fn new(clock: K, rotation_speed: f32) -> Self {
        Self {
            clock,
            state: LoopState::Idle,
            rotation_speed,
            frames: 0,
            cancel: CancelHandle::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames run since `start`
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock_mut(&mut self) -> &mut K {
        &mut self.clock
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f32) {
        self.rotation_speed = rotation_speed;
    }

    /// Handle that stops the loop when cancelled
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Reset the clock and ask for the first frame. Only valid from Idle;
    /// later calls return the existing handle without scheduling again.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> CancelHandle {
        if self.state == LoopState::Idle {
            self.clock.start();
            self.state = LoopState::Running;
            self.frames = 0;
            log::debug!("[loop] started");
            scheduler.request_frame();
        }
        self.cancel.clone()
    }

    /// Cancel and mark stopped. Idempotent.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if self.state != LoopState::Stopped {
            log::debug!("[loop] stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
    }

    /// Run one frame: apply any pending resize, sample the clock, write the
    /// four rotations, update the camera, render, then schedule the next
    /// frame unless cancelled. Returns `None` when the loop is not running.
    pub fn tick<C, R, S>(
        &mut self,
        ctx: FrameContext<'_, C, R>,
        scheduler: &mut S,
    ) -> Option<FramePose>
    where
        C: OrbitControl,
        R: FrameRenderer<Camera = C>,
        S: FrameScheduler + ?Sized,
    {
        if self.state != LoopState::Running {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.stop();
            return None;
        }

        if let Some(viewport) = ctx.viewport.take_pending() {
            ctx.camera.set_aspect(viewport.aspect());
            ctx.renderer.resize(&viewport);
        }

        let elapsed = self.clock.tick();
        let previous = ctx.scene.rotation_y(ctx.nodes.sphere).unwrap_or(0.0) as f64;
        let pose = FramePose::advance(previous, self.rotation_speed, elapsed);

        let nodes = ctx.nodes;
        for (id, angle) in [
            (nodes.sphere, pose.sphere),
            (nodes.galaxy, pose.galaxy),
            (nodes.fog, pose.fog),
            (nodes.wind, pose.wind),
        ] {
            if let Err(e) = ctx.scene.set_rotation_y(id, wrap_angle(angle)) {
                log::warn!("[loop] {}", e);
            }
        }

        ctx.camera.update();
        if let Err(e) = ctx.renderer.render(ctx.scene, ctx.camera) {
            log::error!("[loop] render failed: {}", e);
        }
        self.frames += 1;

        if self.cancel.is_cancelled() {
            self.stop();
        } else {
            scheduler.request_frame();
        }
        Some(pose)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::{FrameRenderer, FrameScheduler, OrbitControl, Viewport};
    use nebula_core::{NebulaError, Result};
    use nebula_scene::SceneGraph;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Call log shared between the test doubles
    pub type Calls = Rc<RefCell<Vec<String>>>;

    #[derive(Default)]
    pub struct QueueScheduler {
        pub requested: usize,
    }

    impl FrameScheduler for QueueScheduler {
        fn request_frame(&mut self) {
            self.requested += 1;
        }
    }

    pub struct StubCamera {
        pub calls: Calls,
        pub aspect: f32,
    }

    impl OrbitControl for StubCamera {
        fn update(&mut self) {
            self.calls.borrow_mut().push("camera.update".into());
        }

        fn set_aspect(&mut self, aspect: f32) {
            self.aspect = aspect;
            self.calls.borrow_mut().push("camera.aspect".into());
        }
    }

    pub struct StubRenderer {
        pub calls: Calls,
        pub fail: bool,
        pub size: Option<(u32, u32)>,
    }

    impl FrameRenderer for StubRenderer {
        type Camera = StubCamera;

        fn resize(&mut self, viewport: &Viewport) {
            self.size = Some(viewport.render_size());
            self.calls.borrow_mut().push("renderer.resize".into());
        }

        fn render(&mut self, _scene: &SceneGraph, _camera: &StubCamera) -> Result<()> {
            self.calls.borrow_mut().push("renderer.render".into());
            if self.fail {
                return Err(NebulaError::Render("device lost".into()));
            }
            Ok(())
        }

        fn release(&mut self) {
            self.calls.borrow_mut().push("renderer.release".into());
        }
    }

    pub fn doubles() -> (StubCamera, StubRenderer, Calls) {
        let calls: Calls = Rc::default();
        (
            StubCamera {
                calls: calls.clone(),
                aspect: 1.0,
            },
            StubRenderer {
                calls: calls.clone(),
                fail: false,
                size: None,
            },
            calls,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::{ManualClock, Viewport};
    use nebula_gen::GalaxyParams;
    use nebula_scene::{GalaxyScene, LogTracker};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        scene: GalaxyScene,
        viewport: ViewportState,
        camera: StubCamera,
        renderer: StubRenderer,
        calls: Calls,
    }

    impl Fixture {
        fn new() -> Self {
            let params = GalaxyParams {
                count: 100,
                ..Default::default()
            };
            let scene = GalaxyScene::build(
                &params,
                Box::new(LogTracker::new()),
                &mut StdRng::seed_from_u64(5),
            )
            .unwrap();
            let (camera, renderer, calls) = doubles();
            Self {
                scene,
                viewport: ViewportState::new(Viewport::new(800, 400, 1.0)),
                camera,
                renderer,
                calls,
            }
        }

        fn ctx(&mut self) -> FrameContext<'_, StubCamera, StubRenderer> {
            FrameContext {
                nodes: self.scene.animated(),
                scene: &mut self.scene.graph,
                viewport: &mut self.viewport,
                camera: &mut self.camera,
                renderer: &mut self.renderer,
            }
        }

        fn renders(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| *c == "renderer.render")
                .count()
        }
    }

    #[test]
    fn pose_advance() {
        let pose = FramePose::advance(1.0, 0.5, 2.0);
        assert_eq!(pose.sphere, 1.5);
        assert_eq!(pose.galaxy, 100.0);
        assert_eq!(pose.fog, 2.0);
        assert_eq!(pose.wind, 120.0);
    }

    #[test]
    fn wrapped_angles_keep_precision_after_a_day() {
        let day = 86_400.0;
        let step = 1.0 / 60.0;
        let a = FramePose::advance(0.0, 0.0, day);
        let b = FramePose::advance(0.0, 0.0, day + step);

        let (wa, wb) = (wrap_angle(a.galaxy), wrap_angle(b.galaxy));
        assert!((0.0..TAU as f32).contains(&wa));
        let delta = (wb - wa).rem_euclid(TAU as f32);
        assert!((delta - (step * FramePose::GALAXY_RATE) as f32).abs() < 1e-4);

        // Narrowing before wrapping loses the step entirely at this magnitude
        let coarse = ((b.galaxy as f32) - (a.galaxy as f32)).abs();
        assert!((coarse - delta).abs() > 1e-2);
    }

    #[test]
    fn tick_before_start_does_nothing() {
        let mut fx = Fixture::new();
        let mut anim = AnimationLoop::new(ManualClock::new(), 4.0);
        let mut sched = QueueScheduler::default();
        assert!(anim.tick(fx.ctx(), &mut sched).is_none());
        assert_eq!(fx.renders(), 0);
        assert_eq!(sched.requested, 0);
    }

    #[test]
    fn start_schedules_first_frame_once() {
        let mut anim = AnimationLoop::new(ManualClock::new(), 4.0);
        let mut sched = QueueScheduler::default();
        anim.start(&mut sched);
        anim.start(&mut sched);
        assert_eq!(anim.state(), LoopState::Running);
        assert_eq!(sched.requested, 1);
    }

    #[test]
    fn rotations_follow_frames_and_time() {
        let mut fx = Fixture::new();
        let nodes = fx.scene.animated();
        let mut anim = AnimationLoop::new(ManualClock::new(), 0.5);
        let mut sched = QueueScheduler::default();
        anim.start(&mut sched);

        let times = [0.016, 0.033, 0.05, 0.75, 1.25];
        for (k, t) in times.iter().enumerate() {
            anim.clock_mut().set(*t);
            let pose = anim.tick(fx.ctx(), &mut sched).unwrap();
            let frame = (k + 1) as f32;

            assert_eq!(pose.sphere, (frame * 0.5) as f64);
            assert_eq!(fx.scene.graph.rotation_y(nodes.sphere), Some(frame * 0.5));
            assert_eq!(fx.scene.graph.rotation_y(nodes.galaxy), Some(wrap_angle(t * 50.0)));
            assert_eq!(fx.scene.graph.rotation_y(nodes.fog), Some(wrap_angle(*t)));
            assert_eq!(fx.scene.graph.rotation_y(nodes.wind), Some(wrap_angle(t * 60.0)));
        }
        assert_eq!(anim.frames(), times.len() as u64);
        assert_eq!(sched.requested, times.len() + 1);
    }

    #[test]
    fn frame_order_is_update_then_render() {
        let mut fx = Fixture::new();
        let mut anim = AnimationLoop::new(ManualClock::new(), 4.0);
        let mut sched = QueueScheduler::default();
        anim.start(&mut sched);
        anim.tick(fx.ctx(), &mut sched);
        anim.tick(fx.ctx(), &mut sched);

        let calls = fx.calls.borrow().clone();
        assert_eq!(
            calls,
            vec![
                "camera.aspect",
                "renderer.resize",
                "camera.update",
                "renderer.render",
                "camera.update",
                "renderer.render",
            ]
        );
        assert_eq!(fx.camera.aspect, 2.0);
    }

    #[test]
    fn resize_lands_on_next_frame() {
        let mut fx = Fixture::new();
        let mut anim = AnimationLoop::new(ManualClock::new(), 4.0);
        let mut sched = QueueScheduler::default();
        anim.start(&mut sched);
        anim.tick(fx.ctx(), &mut sched);

        fx.viewport.on_resize(Viewport::new(1000, 500, 3.0));
        assert_eq!(fx.renderer.size, Some((800, 400)));
        anim.tick(fx.ctx(), &mut sched);
        assert_eq!(fx.renderer.size, Some((2000, 1000)));
    }

    #[test]
    fn no_render_after_cancel() {
        let mut fx = Fixture::new();
        let mut anim = AnimationLoop::new(ManualClock::new(), 4.0);
        let mut sched = QueueScheduler::default();
        let handle = anim.start(&mut sched);
        anim.tick(fx.ctx(), &mut sched);
        assert_eq!(fx.renders(), 1);

        handle.cancel();
        assert!(anim.tick(fx.ctx(), &mut sched).is_none());
        assert!(anim.tick(fx.ctx(), &mut sched).is_none());
        assert_eq!(fx.renders(), 1);
        assert_eq!(anim.state(), LoopState::Stopped);
        assert_eq!(sched.requested, 2);
    }

    #[test]
    fn render_error_keeps_loop_running() {
        let mut fx = Fixture::new();
        fx.renderer.fail = true;
        let mut anim = AnimationLoop::new(ManualClock::new(), 4.0);
        let mut sched = QueueScheduler::default();
        anim.start(&mut sched);
        assert!(anim.tick(fx.ctx(), &mut sched).is_some());
        assert_eq!(anim.state(), LoopState::Running);
        assert_eq!(sched.requested, 2);
    }

    #[test]
    fn stopped_loop_cannot_restart() {
        let mut anim = AnimationLoop::new(ManualClock::new(), 4.0);
        let mut sched = QueueScheduler::default();
        anim.start(&mut sched);
        anim.stop();
        anim.start(&mut sched);
        assert_eq!(anim.state(), LoopState::Stopped);
        assert_eq!(sched.requested, 1);
    }
}
