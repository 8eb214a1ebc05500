//! Configuration for rangekit controls and feedback listeners
//!
//! Each struct enumerates the authoring-time fields of one component. External references
//! (joints, grips) are handles rather than plain data and are set on the component itself.

use crate::audio::AudioClip;
use crate::math::Vec3;
use std::time::Duration;

/// Allowed range for [`RotatorConfig::min_angle`], in degrees
pub const MIN_ANGLE_RANGE: (f32, f32) = (-180.0, 0.0);
/// Allowed range for [`RotatorConfig::max_angle`], in degrees
pub const MAX_ANGLE_RANGE: (f32, f32) = (0.0, 180.0);

#[derive(Debug, Clone, PartialEq)]
pub struct RangeConfig {
    /// Value the control starts with, nominally in `[0, 1]`
    pub initial_value: f32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self { initial_value: 0.5 }
    }
}

impl RangeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_value(mut self, value: f32) -> Self {
        self.initial_value = value;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotatorConfig {
    pub range: RangeConfig,
    /// Angle at value 0, in degrees, within [`MIN_ANGLE_RANGE`]
    pub min_angle: f32,
    /// Angle at value 1, in degrees, within [`MAX_ANGLE_RANGE`]
    pub max_angle: f32,
    /// Rotation axis in the moving part's rest frame
    pub axis: Vec3,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            range: RangeConfig::default(),
            min_angle: -90.0,
            max_angle: 90.0,
            axis: Vec3::Y,
        }
    }
}

impl RotatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_value(mut self, value: f32) -> Self {
        self.range.initial_value = value;
        self
    }

    pub fn min_angle(mut self, degrees: f32) -> Self {
        self.min_angle = degrees;
        self
    }

    pub fn max_angle(mut self, degrees: f32) -> Self {
        self.max_angle = degrees;
        self
    }

    pub fn axis(mut self, axis: Vec3) -> Self {
        self.axis = axis;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderConfig {
    pub range: RangeConfig,
    /// Grip position at value 0
    pub start: Vec3,
    /// Grip position at value 1
    pub end: Vec3,
    /// Snap dragged values to `1 / n` increments when set
    pub step_divisions: Option<u32>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            range: RangeConfig::default(),
            start: Vec3::new(-0.5, 0.0, 0.0),
            end: Vec3::new(0.5, 0.0, 0.0),
            step_divisions: None,
        }
    }
}

impl SliderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_value(mut self, value: f32) -> Self {
        self.range.initial_value = value;
        self
    }

    pub fn track(mut self, start: Vec3, end: Vec3) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn step_divisions(mut self, divisions: u32) -> Self {
        self.step_divisions = Some(divisions);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundsConfig {
    /// Played each time accumulated movement passes a notch
    pub pass_notch_clip: Option<AudioClip>,
    /// Played when an interaction starts
    pub grab_clip: Option<AudioClip>,
    /// Played when an interaction ends
    pub release_clip: Option<AudioClip>,
    pub play_tick_sounds: bool,
    /// Accumulated absolute value change that makes a notch
    pub tick_every: f32,
    /// Notch pitch at value 0
    pub start_pitch: f32,
    /// Notch pitch at value 1
    pub end_pitch: f32,
    pub min_time_between_ticks: Duration,
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            pass_notch_clip: None,
            grab_clip: None,
            release_clip: None,
            play_tick_sounds: true,
            tick_every: 0.1,
            start_pitch: 0.75,
            end_pitch: 1.25,
            min_time_between_ticks: Duration::from_millis(10),
        }
    }
}

impl SoundsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass_notch_clip(mut self, clip: AudioClip) -> Self {
        self.pass_notch_clip = Some(clip);
        self
    }

    pub fn grab_clip(mut self, clip: AudioClip) -> Self {
        self.grab_clip = Some(clip);
        self
    }

    pub fn release_clip(mut self, clip: AudioClip) -> Self {
        self.release_clip = Some(clip);
        self
    }

    pub fn play_tick_sounds(mut self, enable: bool) -> Self {
        self.play_tick_sounds = enable;
        self
    }

    pub fn tick_every(mut self, amount: f32) -> Self {
        self.tick_every = amount;
        self
    }

    pub fn pitch_range(mut self, start_pitch: f32, end_pitch: f32) -> Self {
        self.start_pitch = start_pitch;
        self.end_pitch = end_pitch;
        self
    }

    pub fn min_time_between_ticks(mut self, interval: Duration) -> Self {
        self.min_time_between_ticks = interval;
        self
    }
}

/// Rotator flavour of [`SoundsConfig`]: notch spacing is given in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatorSoundsConfig {
    /// Clips, pitch range and tick interval; `tick_every` is derived from `degrees_per_notch`
    pub sounds: SoundsConfig,
    pub degrees_per_notch: f32,
}

impl Default for RotatorSoundsConfig {
    fn default() -> Self {
        Self {
            sounds: SoundsConfig::default(),
            degrees_per_notch: 15.0,
        }
    }
}

impl RotatorSoundsConfig {
    pub fn new(sounds: SoundsConfig) -> Self {
        Self {
            sounds,
            ..Self::default()
        }
    }

    pub fn degrees_per_notch(mut self, degrees: f32) -> Self {
        self.degrees_per_notch = degrees;
        self
    }
}
