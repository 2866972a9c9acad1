use log::{debug, info};

use crate::{
    config::GalleryConfig,
    engine::cameras::viewpoint::{Pose, ViewpointController},
    frame_loop::input::{InputState, KeyBindings},
    utils::FPSCounter,
};

pub mod input;

/// Whatever draws the scene: receives the pose, then renders a frame.
pub trait SceneBackend {
    type Error;

    fn set_camera_pose(&mut self, pose: &Pose);
    fn render(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule the next frame.
    Continue,
    Stopped,
}

/// One iteration per display refresh: apply held input to the viewpoint,
/// push the pose to the backend and render. Runs until shutdown is requested.
#[derive(Debug)]
pub struct FrameLoop {
    pub input_state: InputState,
    pub bindings: KeyBindings,
    viewpoint: ViewpointController,
    running: bool,
    frames: u64,
    fps_counter: FPSCounter,
}

impl FrameLoop {
    pub fn new(viewpoint: ViewpointController) -> Self {
        Self {
            input_state: InputState::default(),
            bindings: KeyBindings::default(),
            viewpoint,
            running: true,
            frames: 0,
            fps_counter: FPSCounter::default(),
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(ViewpointController::from_config(config))
    }

    pub fn viewpoint(&self) -> &ViewpointController {
        &self.viewpoint
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_fps(&self) -> Option<f64> {
        self.fps_counter.last_fps()
    }

    pub fn request_shutdown(&mut self) {
        if self.running {
            info!("frame loop stopping after {} frames", self.frames);
        }
        self.running = false;
    }

    pub fn run_frame<B: SceneBackend>(&mut self, backend: &mut B) -> Result<FrameOutcome, B::Error> {
        if !self.running {
            return Ok(FrameOutcome::Stopped);
        }

        self.viewpoint.update_frame(&self.input_state, &self.bindings);
        let pose = self.viewpoint.pose();
        debug!("frame {} pose {:?} yaw {:.3}", self.frames, pose.position, pose.yaw);

        backend.set_camera_pose(pose);
        backend.render()?;

        self.frames += 1;
        self.fps_counter.tick();
        Ok(FrameOutcome::Continue)
    }
}
