use std::sync::Arc;

use log::{debug, error, info, warn};
use wgpu::Instance;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    window::{WindowAttributes, WindowId},
};

use crate::{
    audio::{
        AmbientAudio,
        controls::{TransportCommand, TransportControls},
    },
    config::GalleryConfig,
    engine::{
        assets::TextureLoader,
        graphics::renderer::GalleryRenderer,
        scene::{SceneDescription, gallery_scene},
    },
    frame_loop::{FrameLoop, FrameOutcome, input::key_id},
};

pub mod assets;
pub(crate) mod r#async;
pub mod cameras;
pub mod graphics;
pub mod mesh;
pub mod scene;

const WINDOW_TITLE: &str = "Gallery";
const TEXTURE_WORKERS: usize = 2;

/// The running gallery: window, renderer, viewpoint loop and ambient audio.
pub struct Gallery {
    config: GalleryConfig,
    scene: SceneDescription,
    instance: Instance,
    renderer: Option<GalleryRenderer>,
    frame_loop: FrameLoop,
    textures: Option<TextureLoader>,
    audio: Option<AmbientAudio>,
    controls: TransportControls,
}

impl Gallery {
    pub fn new(config: GalleryConfig) -> Self {
        let scene = gallery_scene(&config);
        let frame_loop = FrameLoop::from_config(&config);
        let controls = TransportControls::new(config.audio.volume, config.audio.volume_step);
        Self {
            config,
            scene,
            instance: Instance::default(),
            renderer: None,
            frame_loop,
            textures: None,
            audio: None,
            controls,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        info!("creating window");
        let window = Arc::new(event_loop.create_window(
            WindowAttributes::default().with_title(self.controls.title(WINDOW_TITLE)),
        )?);

        let renderer = GalleryRenderer::new(&self.instance, window, &self.scene, &self.config.camera)?;
        self.renderer = Some(renderer);

        self.request_textures();
        self.open_audio();

        info!("requesting first frame");
        if let Some(renderer) = &self.renderer {
            renderer.window().request_redraw();
        }
        Ok(())
    }

    fn request_textures(&mut self) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        info!("starting texture loader");
        let loader = TextureLoader::new(TEXTURE_WORKERS, renderer.max_texture_dimension());
        for (index, surface) in self.scene.surfaces.iter().enumerate() {
            if let Some(path) = &surface.material.texture {
                debug!("loading {} for {}", path.display(), surface.label);
                loader.load(index, path.clone());
            }
        }
        self.textures = Some(loader);
    }

    fn open_audio(&mut self) {
        match AmbientAudio::open(&self.config.audio.track, self.config.audio.volume) {
            Ok(audio) => self.audio = Some(audio),
            Err(err) => warn!("ambient audio disabled: {err}"),
        }
    }

    fn upload_finished_textures(&mut self) {
        let (Some(loader), Some(renderer)) = (&self.textures, &mut self.renderer) else {
            return;
        };
        for loaded in loader.poll() {
            renderer.apply_texture(loaded.surface, &loaded.image);
        }
    }

    /// Any key, click or touch counts as the gesture that unlocks audio.
    /// Returns true when this gesture started the ambient track.
    fn on_user_gesture(&mut self) -> bool {
        let started = match &mut self.audio {
            Some(audio) => audio.on_user_gesture(),
            None => false,
        };
        self.sync_transport_label();
        started
    }

    fn on_key(&mut self, event: &KeyEvent) {
        let Some(key) = key_id(event.physical_key) else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;
        self.frame_loop.input_state.set_key_state(&key, pressed);

        if !pressed || event.repeat {
            return;
        }
        let started = self.on_user_gesture();
        match TransportControls::command_for_key(&key) {
            // The unlocking press already started playback.
            Some(TransportCommand::TogglePlayback) if started => {}
            Some(command) => self.apply_transport(command),
            None => {}
        }
    }

    fn apply_transport(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::TogglePlayback => {
                if let Some(audio) = &mut self.audio {
                    if let Err(err) = audio.playback.toggle() {
                        debug!("playback toggle rejected: {err}");
                    }
                }
            }
            TransportCommand::StepVolume(steps) => {
                let volume = self.controls.step_volume(steps);
                if let Some(audio) = &mut self.audio {
                    audio.playback.set_volume(volume);
                }
                debug!("volume {volume:.2}");
            }
        }
        self.sync_transport_label();
    }

    fn sync_transport_label(&mut self) {
        if let Some(audio) = &mut self.audio {
            for event in audio.playback.drain_events() {
                self.controls.on_playback_event(event);
            }
        }
        if let Some(renderer) = &self.renderer {
            renderer.window().set_title(&self.controls.title(WINDOW_TITLE));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.upload_finished_textures();

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        match self.frame_loop.run_frame(renderer) {
            Ok(FrameOutcome::Continue) => renderer.window().request_redraw(),
            Ok(FrameOutcome::Stopped) => event_loop.exit(),
            Err(err) => {
                warn!("frame skipped: {err}");
                renderer.window().request_redraw();
            }
        }
    }
}

impl ApplicationHandler for Gallery {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Err(err) = self.init(event_loop) {
            error!("failed to start gallery: {err:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                    renderer.window().request_redraw();
                }
            }
            WindowEvent::CloseRequested => {
                info!("close requested");
                self.frame_loop.request_shutdown();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => self.on_key(&event),
            // Releases that happen while unfocused are never delivered.
            WindowEvent::Focused(false) => self.frame_loop.input_state.release_all(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                self.on_user_gesture();
            }
            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                self.on_user_gesture();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!(
            "shutting down after {} frames (last fps {:?})",
            self.frame_loop.frames(),
            self.frame_loop.last_fps()
        );
        if let Some(audio) = &mut self.audio {
            audio.playback.pause();
        }
        if let Some(loader) = self.textures.take() {
            let undelivered = loader.finish();
            debug!("dropped {} undelivered textures", undelivered.len());
        }
    }
}
