//! Audio playback boundary.
//!
//! rangekit never plays audio itself. Feedback components own an [`AudioSource`] and enqueue
//! one-shot [`AudioCommand`]s; the host's playback engine drains them from the
//! [`AudioOutput`], possibly on another thread.
//!
//! - **Main thread**: controls and feedback listeners push commands through their sources
//! - **Audio thread**: receives commands via the channel and mixes the clips

use crate::error::{RangeKitError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::cell::Cell;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identity of a clip asset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClipId(Uuid);

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClipId({})", self.0)
    }
}

/// Handle to a sound asset owned by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    id: ClipId,
    name: Arc<str>,
}

impl AudioClip {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: ClipId(Uuid::new_v4()),
            name: name.into(),
        }
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Handle of an [`AudioSource`], unique per [`AudioOutput`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

/// Commands consumed by the host's playback engine.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Start a clip without interrupting anything already playing on the source
    PlayOneShot {
        source: SourceId,
        clip: AudioClip,
        pitch: f32,
        volume: f32,
    },
}

impl AudioCommand {
    pub fn source(&self) -> SourceId {
        match self {
            Self::PlayOneShot { source, .. } => *source,
        }
    }

    pub fn clip(&self) -> &AudioClip {
        match self {
            Self::PlayOneShot { clip, .. } => clip,
        }
    }
}

/// Command queue shared between audio sources and the host's playback engine.
pub struct AudioOutput {
    next_source_id: Cell<u64>,
    command_sender: Sender<AudioCommand>,
    command_receiver: Receiver<AudioCommand>,
}

impl AudioOutput {
    pub fn new() -> Self {
        let (command_sender, command_receiver) = crossbeam_channel::unbounded();
        Self {
            next_source_id: Cell::new(0),
            command_sender,
            command_receiver,
        }
    }

    /// Creates a new source at full volume.
    pub fn create_source(&self) -> AudioSource {
        let id = SourceId(self.next_source_id.get());
        self.next_source_id.set(id.0 + 1);
        log::debug!("Created audio source {}", id);
        AudioSource {
            id,
            volume: 1.0,
            command_sender: self.command_sender.clone(),
        }
    }

    /// Drains every pending command.
    pub fn poll_commands(&self) -> Vec<AudioCommand> {
        self.command_receiver.try_iter().collect()
    }

    /// Returns a receiver for a playback engine running on another thread.
    pub fn receiver(&self) -> Receiver<AudioCommand> {
        self.command_receiver.clone()
    }
}

impl Default for AudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// A per-listener emitter of one-shot sounds.
#[derive(Debug, Clone)]
pub struct AudioSource {
    id: SourceId,
    volume: f32,
    command_sender: Sender<AudioCommand>,
}

impl AudioSource {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0);
    }

    /// Enqueues `clip` at `pitch` and returns immediately. Overlapping plays are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the output and every receiver cloned from it have been dropped.
    pub fn play_one_shot(&self, clip: &AudioClip, pitch: f32) -> Result<()> {
        log::trace!("{}: one-shot '{}' at pitch {:.3}", self.id, clip.name(), pitch);
        self.command_sender
            .send(AudioCommand::PlayOneShot {
                source: self.id,
                clip: clip.clone(),
                pitch,
                volume: self.volume,
            })
            .map_err(|e| RangeKitError::Audio(format!("Failed to send one-shot command: {}", e)))
    }
}
