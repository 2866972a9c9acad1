use crate::audio::PlaybackEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    TogglePlayback,
    /// Signed number of slider steps.
    StepVolume(i32),
}

/// Keyboard stand-ins for the play/pause button and volume slider, shown
/// in the window title.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportControls {
    playing: bool,
    volume: f32,
    step: f32,
}

impl TransportControls {
    pub fn new(volume: f32, step: f32) -> Self {
        Self {
            playing: false,
            volume: volume.clamp(0.0, 1.0),
            step,
        }
    }

    pub fn command_for_key(key_id: &str) -> Option<TransportCommand> {
        match key_id {
            "KeyM" => Some(TransportCommand::TogglePlayback),
            "Minus" | "NumpadSubtract" => Some(TransportCommand::StepVolume(-1)),
            "Equal" | "NumpadAdd" => Some(TransportCommand::StepVolume(1)),
            _ => None,
        }
    }

    /// Moves the slider and returns the new volume.
    pub fn step_volume(&mut self, steps: i32) -> f32 {
        let raw = self.volume + steps as f32 * self.step;
        // Snap to the slider grid so repeated steps don't drift.
        let snapped = (raw / self.step).round() * self.step;
        self.volume = snapped.clamp(0.0, 1.0);
        self.volume
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn on_playback_event(&mut self, event: PlaybackEvent) {
        self.playing = event == PlaybackEvent::Play;
    }

    pub fn button_label(&self) -> &'static str {
        if self.playing { "Pause" } else { "Play" }
    }

    pub fn title(&self, base: &str) -> String {
        format!(
            "{base} | [M] {} | [-/+] Volume {:.0}%",
            self.button_label(),
            self.volume * 100.0
        )
    }
}
