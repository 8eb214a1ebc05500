//! Notch sounds for a rotator, spaced in degrees.

use super::clock::{Clock, SystemClock};
use super::range_sounds::RangeSounds;
use crate::audio::{AudioOutput, SourceId};
use crate::config::RotatorSoundsConfig;
use crate::control::RangeControl;
use crate::error::{RangeKitError, Result};
use crate::events::ControlId;
use crate::rotator::Rotator;
use std::rc::Rc;

/// [`RangeSounds`] for a [`Rotator`], with notches spaced in degrees.
///
/// The spacing is converted to a normalized `tick_every` from the rotator's angle span when it
/// is attached; re-attach after changing the rotator's bounds to pick up the new span.
pub struct RotatorSounds {
    sounds: RangeSounds,
    degrees_per_notch: f32,
}

impl RotatorSounds {
    /// # Errors
    ///
    /// Returns an error unless `degrees_per_notch` is finite and positive.
    pub fn new(config: RotatorSoundsConfig, output: &AudioOutput) -> Result<Self> {
        Self::with_clock(config, output, Rc::new(SystemClock::new()))
    }

    pub fn with_clock(
        config: RotatorSoundsConfig,
        output: &AudioOutput,
        clock: Rc<dyn Clock>,
    ) -> Result<Self> {
        if !(config.degrees_per_notch.is_finite() && config.degrees_per_notch > 0.0) {
            return Err(RangeKitError::Configuration(format!(
                "degrees_per_notch must be positive, got {}",
                config.degrees_per_notch
            )));
        }
        Ok(Self {
            sounds: RangeSounds::with_clock(config.sounds, output, clock)?,
            degrees_per_notch: config.degrees_per_notch,
        })
    }

    pub fn attach(&mut self, rotator: &Rotator) {
        let span = (rotator.max_angle() - rotator.min_angle()).abs();
        let tick_every = if span > 0.0 {
            self.degrees_per_notch / span
        } else {
            f32::INFINITY
        };
        if let Err(e) = self.sounds.set_tick_every(tick_every) {
            log::warn!("{}: notch spacing unchanged: {}", self.sounds.source_id(), e);
        }
        if self.sounds.attached_to() == Some(rotator.id()) {
            return;
        }
        self.sounds.attach(rotator);
    }

    pub fn detach(&mut self) {
        self.sounds.detach();
    }

    pub fn attached_to(&self) -> Option<ControlId> {
        self.sounds.attached_to()
    }

    pub fn degrees_per_notch(&self) -> f32 {
        self.degrees_per_notch
    }

    /// Normalized movement per notch for the attached rotator.
    pub fn tick_every(&self) -> f32 {
        self.sounds.tick_every()
    }

    pub fn accumulated(&self) -> f32 {
        self.sounds.accumulated()
    }

    pub fn source_id(&self) -> SourceId {
        self.sounds.source_id()
    }
}
