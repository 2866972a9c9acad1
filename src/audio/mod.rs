use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use log::{debug, info};
use rodio::{Decoder, OutputStream, Sink};
use thiserror::Error;

pub mod controls;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("playback not permitted before a user gesture")]
    NotPermitted,
    #[error("no audio output: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("failed to create sink: {0}")]
    Sink(#[from] rodio::PlayError),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode track: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Play,
    Pause,
}

/// The transport surface of an audio output.
pub trait PlaybackSink {
    fn play(&self);
    fn pause(&self);
    fn is_paused(&self) -> bool;
    fn set_volume(&self, volume: f32);
}

impl PlaybackSink for Sink {
    fn play(&self) {
        Sink::play(self)
    }

    fn pause(&self) {
        Sink::pause(self)
    }

    fn is_paused(&self) -> bool {
        Sink::is_paused(self)
    }

    fn set_volume(&self, volume: f32) {
        Sink::set_volume(self, volume)
    }
}

#[derive(Debug)]
pub struct AudioPlayback<S> {
    sink: S,
    unlocked: bool,
    looping: bool,
    volume: f32,
    events: Vec<PlaybackEvent>,
}

impl<S: PlaybackSink> AudioPlayback<S> {
    /// Wraps a paused sink holding a looping source.
    pub fn new(sink: S, volume: f32) -> Self {
        sink.pause();
        let volume = volume.clamp(0.0, 1.0);
        sink.set_volume(volume);
        Self {
            sink,
            unlocked: false,
            looping: true,
            volume,
            events: Vec::new(),
        }
    }

    /// Returns true the first time a gesture unlocks playback.
    pub fn unlock(&mut self) -> bool {
        let first = !self.unlocked;
        self.unlocked = true;
        first
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn play(&mut self) -> Result<(), AudioError> {
        if !self.unlocked {
            return Err(AudioError::NotPermitted);
        }
        if self.sink.is_paused() {
            self.sink.play();
            self.events.push(PlaybackEvent::Play);
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if !self.sink.is_paused() {
            self.sink.pause();
            self.events.push(PlaybackEvent::Pause);
        }
    }

    pub fn toggle(&mut self) -> Result<(), AudioError> {
        if self.is_paused() {
            self.play()
        } else {
            self.pause();
            Ok(())
        }
    }

    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.sink.set_volume(self.volume);
    }

    /// Play/pause notifications since the last call.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Output stream plus the ambient track playing on it. The stream must
/// outlive the sink.
pub struct AmbientAudio {
    _stream: OutputStream,
    pub playback: AudioPlayback<Sink>,
}

impl AmbientAudio {
    pub fn open(track: &Path, volume: f32) -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        let file = File::open(track).map_err(|source| AudioError::Open {
            path: track.to_path_buf(),
            source,
        })?;
        let source = Decoder::new_looped(BufReader::new(file))?;

        let playback = AudioPlayback::new(sink, volume);
        playback.sink.append(source);
        info!("ambient track {} ready (paused)", track.display());

        Ok(Self {
            _stream: stream,
            playback,
        })
    }

    /// Called on every key, click or touch. The first one unlocks and starts
    /// playback, returning true; a rejection is ignored.
    pub fn on_user_gesture(&mut self) -> bool {
        if !self.playback.unlock() {
            return false;
        }
        match self.playback.play() {
            Ok(()) => true,
            Err(err) => {
                debug!("ambient playback rejected: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct FakeSink {
        paused: Cell<bool>,
        volume: Cell<f32>,
    }

    impl PlaybackSink for FakeSink {
        fn play(&self) {
            self.paused.set(false);
        }

        fn pause(&self) {
            self.paused.set(true);
        }

        fn is_paused(&self) -> bool {
            self.paused.get()
        }

        fn set_volume(&self, volume: f32) {
            self.volume.set(volume);
        }
    }

    fn playback() -> AudioPlayback<FakeSink> {
        AudioPlayback::new(FakeSink::default(), 0.5)
    }

    #[test]
    fn starts_paused_looping_at_configured_volume() {
        let playback = playback();
        assert!(playback.is_paused());
        assert!(playback.is_looping());
        assert_eq!(playback.volume(), 0.5);
        assert_eq!(playback.sink.volume.get(), 0.5);
    }

    #[test]
    fn play_is_rejected_until_unlocked() {
        let mut playback = playback();
        assert!(!playback.is_unlocked());
        assert!(matches!(playback.play(), Err(AudioError::NotPermitted)));
        assert!(playback.is_paused());
        assert!(playback.drain_events().is_empty());

        assert!(playback.unlock());
        assert!(playback.is_unlocked());
        assert!(!playback.unlock());
        playback.play().unwrap();
        assert!(!playback.is_paused());
        assert_eq!(playback.drain_events(), vec![PlaybackEvent::Play]);
    }

    #[test]
    fn events_only_fire_on_state_changes() {
        let mut playback = playback();
        playback.unlock();
        playback.play().unwrap();
        playback.play().unwrap();
        playback.pause();
        playback.pause();
        assert_eq!(
            playback.drain_events(),
            vec![PlaybackEvent::Play, PlaybackEvent::Pause]
        );
        assert!(playback.drain_events().is_empty());
    }

    #[test]
    fn toggle_flips_state() {
        let mut playback = playback();
        playback.unlock();
        playback.toggle().unwrap();
        assert!(!playback.is_paused());
        playback.toggle().unwrap();
        assert!(playback.is_paused());
    }

    #[test]
    fn volume_is_clamped() {
        let mut playback = playback();
        playback.set_volume(1.7);
        assert_eq!(playback.volume(), 1.0);
        playback.set_volume(-0.2);
        assert_eq!(playback.volume(), 0.0);
        assert_eq!(playback.sink.volume.get(), 0.0);
    }
}
