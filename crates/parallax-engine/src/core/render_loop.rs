use crate::camera::CameraController;
use crate::time::{Clock, FrameTime};

use super::renderer::{FrameStatus, Renderer};

/// Host primitive that calls back once per display refresh.
///
/// Schedules exactly one future frame per call. The host later calls
/// `RenderLoop::on_frame`, which may or may not still be wanted. Every
/// scheduled frame must eventually be delivered; the loop keeps at most one
/// outstanding.
pub trait FrameScheduler {
    fn schedule_next_frame(&mut self);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Handle of a registered per-frame mutator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MutatorId(u64);

/// What a mutator may touch during a frame.
pub struct FrameState<'a, S> {
    pub time: FrameTime,
    pub scene: &'a mut S,
    pub camera: &'a mut CameraController,
}

type Mutator<S> = Box<dyn FnMut(&mut FrameState<'_, S>)>;

/// Result of one executed frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub time: FrameTime,
    pub status: FrameStatus,
}

/// Drives clock, mutators and renderer once per host frame.
///
/// The camera update is registered at construction and therefore always runs
/// before any mutator added later. It cannot be unregistered.
pub struct RenderLoop<S> {
    state: LoopState,
    /// A host callback is scheduled and has not fired yet.
    callback_pending: bool,
    clock: Clock,
    mutators: Vec<(MutatorId, Mutator<S>)>,
    next_id: u64,
    camera_update: MutatorId,
}

impl<S: 'static> RenderLoop<S> {
    pub fn new(clock: Clock) -> Self {
        let mut lp = Self {
            state: LoopState::Stopped,
            callback_pending: false,
            clock,
            mutators: Vec::new(),
            next_id: 0,
            camera_update: MutatorId(0),
        };
        lp.camera_update = lp.register(|frame| frame.camera.update());
        lp
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Id of the built-in camera update.
    #[inline]
    pub fn camera_update(&self) -> MutatorId {
        self.camera_update
    }

    /// Seconds since the loop's clock started.
    pub fn elapsed(&mut self) -> f64 {
        self.clock.elapsed()
    }

    /// Appends a mutator. Mutators run in registration order every frame.
    pub fn register(&mut self, f: impl FnMut(&mut FrameState<'_, S>) + 'static) -> MutatorId {
        let id = MutatorId(self.next_id);
        self.next_id += 1;
        self.mutators.push((id, Box::new(f)));
        id
    }

    /// Removes a mutator. The built-in camera update is refused.
    pub fn unregister(&mut self, id: MutatorId) -> bool {
        if id == self.camera_update {
            log::warn!("refusing to unregister the camera update");
            return false;
        }
        let before = self.mutators.len();
        self.mutators.retain(|(mid, _)| *mid != id);
        self.mutators.len() != before
    }

    /// Starts the loop and schedules the first frame. No-op while running.
    ///
    /// After a `stop` whose callback has not fired yet, that callback becomes
    /// the first frame instead of a second one being scheduled.
    pub fn start(&mut self, host: &mut dyn FrameScheduler) {
        if self.is_running() {
            return;
        }
        log::debug!("render loop started");
        self.state = LoopState::Running;
        self.clock.reset();
        if !self.callback_pending {
            self.schedule(host);
        }
    }

    fn schedule(&mut self, host: &mut dyn FrameScheduler) {
        self.callback_pending = true;
        host.schedule_next_frame();
    }

    /// Stops the loop. A frame the host already scheduled will do nothing.
    pub fn stop(&mut self) {
        if self.is_running() {
            log::debug!("render loop stopped");
        }
        self.state = LoopState::Stopped;
    }

    /// Host frame callback.
    ///
    /// Returns `None` when the loop is stopped. A `Fatal` frame stops the loop
    /// and is not rescheduled.
    pub fn on_frame<R>(
        &mut self,
        scene: &mut S,
        camera: &mut CameraController,
        renderer: &mut R,
        host: &mut dyn FrameScheduler,
    ) -> Option<FrameReport>
    where
        R: Renderer<S> + ?Sized,
    {
        self.callback_pending = false;
        if !self.is_running() {
            return None;
        }

        let time = self.clock.tick();

        let mut frame = FrameState {
            time,
            scene,
            camera,
        };
        for (_, mutator) in &mut self.mutators {
            mutator(&mut frame);
        }

        let status = renderer.render_frame(&*frame.scene, frame.camera.camera());
        match status {
            FrameStatus::Fatal => {
                log::warn!("renderer reported a fatal frame; stopping loop");
                self.state = LoopState::Stopped;
            }
            FrameStatus::Presented | FrameStatus::Skipped => self.schedule(host),
        }

        Some(FrameReport { time, status })
    }
}
